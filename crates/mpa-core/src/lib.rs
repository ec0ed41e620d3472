//! Shared domain types, configuration, and persisted client settings for the
//! Manual Purchase Agent client.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod parts;
pub mod profile;
pub mod query;
pub mod settings;
pub mod suppliers;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{EquipmentInfo, ManualEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use parts::{GenericAlternative, PartRef, ResolvedPart};
pub use profile::BillingProfile;
pub use query::SearchQuery;
pub use settings::{
    AutomationSettings, Confirm, FileStore, KeyValueStore, MemoryStore, SettingsError,
    SettingsStore, SETTINGS_KEY,
};
pub use suppliers::{normalize_domain, SupplierListing};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
