use std::fmt::Write as _;

use mpa_core::{GenericAlternative, PartRef, ResolvedPart};

use super::{attr, esc, format_price};

fn part_ref_item(out: &mut String, part: &PartRef, class: &str) {
    let _ = write!(
        out,
        "<li class=\"{class}\" data-part-number=\"{}\" data-kind=\"{}\"><span class=\"part-number\">{}</span>",
        attr(&part.part_number),
        attr(&part.kind),
        esc(&part.part_number)
    );
    if let Some(description) = &part.description {
        let _ = write!(out, " <span class=\"part-description\">{}</span>", esc(description));
    }
    out.push_str("</li>");
}

#[must_use]
pub fn resolved_part(part: &ResolvedPart) -> String {
    let mut out = String::from("<div class=\"part-card\">");
    if let Some(url) = &part.image_url {
        let _ = write!(
            out,
            "<img class=\"part-image\" src=\"{}\" alt=\"{}\">",
            attr(url),
            attr(&part.oem_part_number)
        );
    }
    let _ = write!(
        out,
        "<h3 class=\"oem-part-number\">{}</h3><p class=\"part-description\">{}</p>",
        esc(&part.oem_part_number),
        esc(&part.description)
    );
    out.push_str(if part.verified {
        "<span class=\"badge badge-verified\">Verified</span>"
    } else {
        "<span class=\"badge badge-unverified\">Unverified</span>"
    });

    if !part.alternates.is_empty() {
        out.push_str("<h4>Alternate part numbers</h4><ul class=\"alternates\">");
        for alt in &part.alternates {
            part_ref_item(&mut out, alt, "alternate-part selectable");
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}

/// Selection list shown when no OEM part number was resolved. Items carry
/// `data-part-number`; choosing one resumes the search for that part.
#[must_use]
pub fn similar_parts(candidates: &[PartRef]) -> String {
    let mut out = String::from(
        "<div class=\"similar-parts\"><p>No exact match was found. Select the part that matches:</p><ol class=\"similar-list\">",
    );
    for candidate in candidates {
        part_ref_item(&mut out, candidate, "similar-part selectable");
    }
    out.push_str("</ol></div>");
    out
}

/// Comparison table of aftermarket alternatives.
#[must_use]
pub fn generic_alternatives(items: &[GenericAlternative]) -> String {
    if items.is_empty() {
        return "<p class=\"empty-state\">No generic alternatives found.</p>".to_string();
    }
    let mut out = String::from(
        "<table class=\"generic-alternatives\"><thead><tr><th>Part number</th><th>Manufacturer</th><th>Description</th><th>Confidence</th><th>Compatible</th><th>Price</th></tr></thead><tbody>",
    );
    for item in items {
        let compatible = match item.compatible {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "Unchecked",
        };
        let _ = write!(
            out,
            "<tr data-part-number=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.0}%</td><td>{compatible}</td><td>{}</td></tr>",
            attr(&item.part_number),
            esc(&item.part_number),
            esc(item.manufacturer.as_deref().unwrap_or("")),
            esc(item.description.as_deref().unwrap_or("")),
            item.confidence * 100.0,
            esc(&item.price.as_deref().map(format_price).unwrap_or_default())
        );
    }
    out.push_str("</tbody></table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part() -> ResolvedPart {
        ResolvedPart {
            oem_part_number: "HH18HA499".to_string(),
            description: "Hi limit switch".to_string(),
            image_url: None,
            alternates: vec![PartRef::new("LH33ZS003", "alternate")],
            similar_parts: Vec::new(),
            verified: true,
        }
    }

    #[test]
    fn resolved_part_shows_alternates_and_badge() {
        let html = resolved_part(&part());
        assert!(html.contains("<h3 class=\"oem-part-number\">HH18HA499</h3>"));
        assert!(html.contains("badge-verified"));
        assert!(html.contains("data-part-number=\"LH33ZS003\""));
    }

    #[test]
    fn selection_list_uses_data_attributes() {
        let mut candidate = PartRef::new("X\"1", "similar");
        candidate.description = Some("<b>switch</b>".to_string());
        let html = similar_parts(&[candidate]);
        assert!(html.contains("data-part-number=\"X&quot;1\""));
        assert!(html.contains("&lt;b&gt;switch&lt;/b&gt;"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn generic_table_formats_confidence_and_price() {
        let html = generic_alternatives(&[GenericAlternative {
            part_number: "UNI-1".to_string(),
            manufacturer: Some("Supco".to_string()),
            description: None,
            confidence: 0.84,
            price: Some("12.5".to_string()),
            compatible: Some(true),
        }]);
        assert!(html.contains("<td>84%</td><td>Yes</td><td>$12.50</td>"));
    }
}
