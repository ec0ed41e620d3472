use serde::{Deserialize, Serialize};

/// A technical manual returned by the manuals search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub title: Option<String>,
    pub url: String,
    /// Host or publisher the manual was found on.
    pub source: Option<String>,
}

/// Equipment/model details shown above the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentInfo {
    pub make: String,
    pub model: String,
    pub image_url: Option<String>,
    pub video_count: usize,
    pub article_count: usize,
}

impl EquipmentInfo {
    /// Equipment info with no enrichment data, used when the lookup fails.
    #[must_use]
    pub fn bare(make: &str, model: &str) -> Self {
        Self {
            make: make.to_string(),
            model: model.to_string(),
            image_url: None,
            video_count: 0,
            article_count: 0,
        }
    }
}
