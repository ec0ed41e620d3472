use serde::{Deserialize, Serialize};

/// Billing/shipping profile used to parameterize delegated purchases.
///
/// Owned by the external profile service; the client only keeps the most
/// recently loaded or saved copy for form repopulation.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub card_holder: String,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvv: String,
}

impl BillingProfile {
    /// Last four digits of the card number, for display.
    #[must_use]
    pub fn card_last4(&self) -> Option<&str> {
        let digits = self.card_number.trim();
        if digits.len() < 4 || !digits.is_ascii() {
            return None;
        }
        Some(&digits[digits.len() - 4..])
    }
}

impl std::fmt::Debug for BillingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("postal_code", &self.postal_code)
            .field("country", &self.country)
            .field("card_number", &self.card_last4().map(|d| format!("****{d}")))
            .field("card_cvv", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_card_details() {
        let profile = BillingProfile {
            id: Some(7),
            name: "Pat Doe".to_string(),
            card_number: "4111111111111111".to_string(),
            card_cvv: "123".to_string(),
            ..BillingProfile::default()
        };
        let rendered = format!("{profile:?}");
        assert!(rendered.contains("****1111"));
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("123\""));
    }

    #[test]
    fn deserializes_partial_record() {
        let profile: BillingProfile =
            serde_json::from_value(serde_json::json!({"id": 3, "name": "Shop"})).unwrap();
        assert_eq!(profile.id, Some(3));
        assert_eq!(profile.name, "Shop");
        assert!(profile.card_number.is_empty());
    }
}
