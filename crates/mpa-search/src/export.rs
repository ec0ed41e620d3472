//! CSV export of supplier listings.

use mpa_core::SupplierListing;

const HEADER: [&str; 5] = ["name", "domain", "price", "url", "ai_ranking"];

fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders `listings` as RFC 4180 CSV with a header row and CRLF line ends.
#[must_use]
pub fn suppliers_csv(listings: &[SupplierListing]) -> String {
    let mut out = HEADER.join(",");
    out.push_str("\r\n");
    for listing in listings {
        let ranking = listing.ai_ranking.map(|r| r.to_string()).unwrap_or_default();
        let row = [
            field(&listing.name),
            field(&listing.domain),
            field(listing.price.as_deref().unwrap_or("")),
            field(&listing.url),
            ranking,
        ];
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }
    out
}
