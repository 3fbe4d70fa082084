use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "IPD Console";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Namespace prefix for every locally persisted preference key.
pub const PREFERENCE_NAMESPACE: &str = "ipd_";

/// Fixed relative path of the duty-roster schema script.
pub const DUTY_ROSTER_SCHEMA: &str = "resources/migrations/duty_roster.sql";

/// Default base URL of the hospital IPD service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/ipd";

/// Default request timeout for IPD service calls.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Get the application data directory (~/IpdConsole/).
///
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("IpdConsole")
}

/// Default relational database targeted by the duty-roster migration.
pub fn hospital_db_path() -> PathBuf {
    app_data_dir().join("hospital.db")
}

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "ipd_lib=debug,ipd_migrate=debug,info"
    } else {
        "ipd_lib=info,warn"
    }
}

/// Connection settings for the IPD service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Read `IPD_API_URL`, `IPD_API_TOKEN` and `IPD_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset, blank or unparseable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_blank("IPD_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            token: non_blank("IPD_API_TOKEN"),
            timeout_secs: non_blank("IPD_API_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }
}
