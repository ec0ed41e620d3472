//! Pure HTML fragment renderers, one per view region.
//!
//! Every function is deterministic: the same input yields byte-identical
//! markup. All interpolated text goes through [`esc`] or [`attr`].

pub mod catalog;
pub mod icons;
pub mod part;
pub mod price;
pub mod suppliers;

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::progress::ProgressTracker;

pub use catalog::{equipment, manuals};
pub use part::{generic_alternatives, resolved_part, similar_parts};
pub use price::format_price;
pub use suppliers::{suppliers, suppliers_with_icons};

/// Escapes text content.
pub(crate) fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escapes a value placed inside a double-quoted attribute.
pub(crate) fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Placeholder shown in a region while its lookup is in flight.
#[must_use]
pub fn loading(label: &str) -> String {
    format!(
        "<div class=\"loading-skeleton\" aria-busy=\"true\"><span class=\"spinner\"></span> Loading {}…</div>",
        esc(label)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn class(self) -> &'static str {
        match self {
            StatusKind::Info => "status-info",
            StatusKind::Warning => "status-warning",
            StatusKind::Error => "status-error",
        }
    }
}

/// A user-visible status line.
#[must_use]
pub fn status_message(kind: StatusKind, message: &str) -> String {
    format!(
        "<div class=\"status-message {}\" role=\"status\">{}</div>",
        kind.class(),
        esc(message)
    )
}

/// Four-step progress indicator.
#[must_use]
pub fn progress(tracker: &ProgressTracker) -> String {
    let mut out = String::from("<ol class=\"search-progress\">");
    for (stage, status) in tracker.iter() {
        let _ = write!(
            out,
            "<li class=\"progress-step {status}\" data-stage=\"{stage}\">{}</li>",
            stage.label()
        );
    }
    out.push_str("</ol>");
    out
}
