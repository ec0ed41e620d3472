use serde::{Deserialize, Serialize};

/// One supplier offering the active part number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierListing {
    pub name: String,
    pub url: String,
    /// Price exactly as the API returned it, e.g. `"$24.99"` or `"Call for price"`.
    pub price: Option<String>,
    /// Lower-cased host without a leading `www.`.
    pub domain: String,
    pub ai_ranking: Option<u32>,
    /// A purchase recording exists for this domain, so the purchase action is offered.
    pub purchasable: bool,
}

/// Lower-cases a host and strips a leading `www.` so recordings and listings
/// compare equal.
#[must_use]
pub fn normalize_domain(host: &str) -> String {
    let lower = host.trim().to_ascii_lowercase();
    lower
        .strip_prefix("www.")
        .map_or_else(|| lower.clone(), str::to_string)
}
