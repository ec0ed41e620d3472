use serde::{Deserialize, Serialize};

/// A candidate part number surfaced as an alternate or a similar part.
///
/// Identity is `part_number`; two refs with the same number are the same
/// candidate regardless of description or image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRef {
    pub part_number: String,
    /// Where the candidate came from: `"alternate"`, `"similar"`, `"original"`,
    /// or whatever label the API supplied.
    pub kind: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl PartRef {
    #[must_use]
    pub fn new(part_number: &str, kind: &str) -> Self {
        Self {
            part_number: part_number.trim().to_string(),
            kind: kind.to_string(),
            description: None,
            image_url: None,
        }
    }
}

/// The part a search settled on, merged from the primary resolution call and
/// the per-part image enrichment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPart {
    pub oem_part_number: String,
    pub description: String,
    pub image_url: Option<String>,
    pub alternates: Vec<PartRef>,
    pub similar_parts: Vec<PartRef>,
    /// Set only from the API's nested `validation.is_valid == true`.
    pub verified: bool,
}

impl ResolvedPart {
    /// Builds an unverified part from a user-selected candidate.
    #[must_use]
    pub fn from_selection(candidate: &PartRef) -> Self {
        Self {
            oem_part_number: candidate.part_number.clone(),
            description: candidate
                .description
                .clone()
                .unwrap_or_else(|| candidate.part_number.clone()),
            image_url: candidate.image_url.clone(),
            alternates: Vec::new(),
            similar_parts: Vec::new(),
            verified: false,
        }
    }

    /// A part is usable for supplier lookup once it carries a non-blank number.
    #[must_use]
    pub fn has_part_number(&self) -> bool {
        !self.oem_part_number.trim().is_empty()
    }

    #[must_use]
    pub fn as_ref_with_kind(&self, kind: &str) -> PartRef {
        PartRef {
            part_number: self.oem_part_number.clone(),
            kind: kind.to_string(),
            description: Some(self.description.clone()),
            image_url: self.image_url.clone(),
        }
    }
}

/// An aftermarket replacement offered for comparison against the OEM part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericAlternative {
    pub part_number: String,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    /// Compatibility confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub price: Option<String>,
    /// `Some` once the compatibility endpoint has been consulted.
    pub compatible: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_never_verified() {
        let mut candidate = PartRef::new(" HH18HA499 ", "similar");
        candidate.description = Some("Limit switch".to_string());
        let part = ResolvedPart::from_selection(&candidate);
        assert_eq!(part.oem_part_number, "HH18HA499");
        assert_eq!(part.description, "Limit switch");
        assert!(!part.verified);
        assert!(part.has_part_number());
    }

    #[test]
    fn selection_without_description_uses_number() {
        let part = ResolvedPart::from_selection(&PartRef::new("LH33ZS003", "alternate"));
        assert_eq!(part.description, "LH33ZS003");
    }

    #[test]
    fn blank_number_is_not_usable() {
        let part = ResolvedPart::from_selection(&PartRef::new("   ", "similar"));
        assert!(!part.has_part_number());
    }
}
