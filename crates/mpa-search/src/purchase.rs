//! Hands a chosen supplier listing to the external purchase automation.

use mpa_client::{
    ApiClient, NormalizedResponse, PurchaseOptions, PurchaseRequest, RecordingCloneRequest,
};
use mpa_core::{normalize_domain, AutomationSettings, BillingProfile, SupplierListing};
use serde_json::Value;

use crate::error::SearchError;
use crate::merge;

/// What the purchase service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub purchase_id: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    /// The automation ran without placing a real order.
    pub dry_run: bool,
    /// A site recording was replayed instead of the generic flow.
    pub via_recording: bool,
}

/// Options forwarded with every purchase; real orders only when the user
/// confirmed them through the settings store.
#[must_use]
pub fn purchase_options(settings: &AutomationSettings) -> PurchaseOptions {
    PurchaseOptions {
        speed_ms: settings.speed,
        headless: settings.headless,
        max_attempts: settings.max_attempts,
        capture_screenshots: settings.capture_screenshots,
        timeout_ms: u64::try_from(settings.automation_timeout().as_millis()).unwrap_or(u64::MAX),
        dry_run: !settings.real_purchases_enabled(),
    }
}

fn text_field(response: &NormalizedResponse, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match response.get(k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub struct PurchaseService {
    client: ApiClient,
}

impl PurchaseService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds a listing for a supplier URL outside a search, checking the
    /// recordings service for the domain.
    pub async fn listing_for_url(&self, url: &str) -> SupplierListing {
        let domain = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(normalize_domain))
            .unwrap_or_default();
        let recordings = merge::recording_domains(&self.client.available_recordings().await);
        SupplierListing {
            name: domain.clone(),
            url: url.to_string(),
            price: None,
            purchasable: !domain.is_empty() && recordings.contains(&domain),
            domain,
            ai_ranking: None,
        }
    }

    /// Delegates a purchase of `quantity` × `part_number` from `listing`.
    ///
    /// Listings whose domain has a recording replay it through
    /// `/api/recordings/clone`; others go through `/api/purchases`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::MissingProfile`] without a saved billing profile
    /// - [`SearchError::PurchaseRejected`] for an empty part number, a zero
    ///   quantity, or a failed API call
    pub async fn purchase(
        &self,
        listing: &SupplierListing,
        part_number: &str,
        quantity: u32,
        profile: Option<&BillingProfile>,
        settings: &AutomationSettings,
    ) -> Result<PurchaseOutcome, SearchError> {
        let billing_profile_id = profile
            .and_then(|p| p.id)
            .ok_or(SearchError::MissingProfile)?;
        let part_number = part_number.trim();
        if part_number.is_empty() {
            return Err(SearchError::PurchaseRejected(
                "a part number is required".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(SearchError::PurchaseRejected(
                "quantity must be at least 1".to_string(),
            ));
        }

        let options = purchase_options(settings);
        let via_recording = listing.purchasable && !listing.domain.is_empty();
        tracing::info!(
            part_number,
            supplier = %listing.domain,
            quantity,
            dry_run = options.dry_run,
            via_recording,
            "submitting purchase"
        );

        let response = if via_recording {
            self.client
                .clone_recording(&RecordingCloneRequest {
                    recording: &listing.domain,
                    url: &listing.url,
                    part_number,
                    quantity,
                    billing_profile_id,
                    options: &options,
                })
                .await
        } else {
            self.client
                .create_purchase(&PurchaseRequest {
                    part_number,
                    supplier_url: &listing.url,
                    supplier_name: &listing.name,
                    quantity,
                    billing_profile_id,
                    options: &options,
                })
                .await
        };

        if !response.success {
            let reason = response
                .error
                .clone()
                .or_else(|| text_field(&response, &["message"]))
                .unwrap_or_else(|| format!("{} {}", response.status, response.status_text));
            tracing::warn!(part_number, %reason, "purchase rejected");
            return Err(SearchError::PurchaseRejected(reason));
        }

        Ok(PurchaseOutcome {
            purchase_id: text_field(&response, &["purchase_id", "id"]),
            status: text_field(&response, &["status_message", "purchase_status"]),
            message: text_field(&response, &["message"]),
            dry_run: options.dry_run,
            via_recording,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_a_dry_run() {
        let options = purchase_options(&AutomationSettings::default());
        assert!(options.dry_run);
        assert_eq!(options.timeout_ms, 30_000);
        assert_eq!(options.speed_ms, 1000);
    }

    #[test]
    fn slow_speed_raises_timeout() {
        let mut settings = AutomationSettings::default();
        settings.speed = 2500;
        assert_eq!(purchase_options(&settings).timeout_ms, 75_000);
    }
}
