use std::fmt::Write as _;

use mpa_core::{EquipmentInfo, ManualEntry};

use super::{attr, esc};

const DEFAULT_MANUAL_TITLE: &str = "Technical Manual";
const DEFAULT_MANUAL_SOURCE: &str = "Unknown Source";

#[must_use]
pub fn equipment(info: &EquipmentInfo) -> String {
    let mut out = String::from("<div class=\"equipment-card\">");
    if let Some(url) = &info.image_url {
        let _ = write!(
            out,
            "<img class=\"equipment-image\" src=\"{}\" alt=\"{} {}\">",
            attr(url),
            attr(&info.make),
            attr(&info.model)
        );
    }
    let _ = write!(
        out,
        "<h3 class=\"equipment-title\">{} {}</h3><p class=\"equipment-media\">{} videos · {} articles</p></div>",
        esc(&info.make),
        esc(&info.model),
        info.video_count,
        info.article_count
    );
    out
}

#[must_use]
pub fn manuals(entries: &[ManualEntry]) -> String {
    if entries.is_empty() {
        return "<p class=\"empty-state\">No manuals found.</p>".to_string();
    }
    let mut out = String::from("<ul class=\"manuals\">");
    for entry in entries {
        let title = entry.title.as_deref().unwrap_or(DEFAULT_MANUAL_TITLE);
        let source = entry.source.as_deref().unwrap_or(DEFAULT_MANUAL_SOURCE);
        let _ = write!(
            out,
            "<li class=\"manual-item\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a><span class=\"manual-source\">{}</span></li>",
            attr(&entry.url),
            esc(title),
            esc(source)
        );
    }
    out.push_str("</ul>");
    out
}
