use serde::{Deserialize, Serialize};

/// One product search as submitted from the search form.
///
/// Immutable for the lifetime of a search; the next submit replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub make: String,
    pub model: String,
    pub part_description: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(make: &str, model: &str, part_description: &str) -> Self {
        Self {
            make: make.trim().to_string(),
            model: model.trim().to_string(),
            part_description: part_description.trim().to_string(),
        }
    }

    /// `true` only when make, model, and part description are all non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.make, &self.model, &self.part_description]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields() {
        let q = SearchQuery::new("  Carrier ", "58STA\t", " hi limit switch ");
        assert_eq!(q.make, "Carrier");
        assert_eq!(q.model, "58STA");
        assert_eq!(q.part_description, "hi limit switch");
        assert!(q.is_complete());
    }

    #[test]
    fn blank_field_is_incomplete() {
        assert!(!SearchQuery::new("Carrier", "   ", "switch").is_complete());
        assert!(!SearchQuery::new("", "58STA", "switch").is_complete());
        assert!(!SearchQuery::new("Carrier", "58STA", "").is_complete());
    }
}
