use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the Manual Purchase Agent REST API, e.g. `http://localhost:7777`.
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    pub user_agent: String,
    /// JSON file backing the settings store.
    pub state_path: PathBuf,
    /// Upper bound on manuals rendered per search.
    pub max_manuals: usize,
}
