pub mod api; // IPD service client
pub mod config;
pub mod db; // Local preferences store
pub mod dialog; // Admission entry dialogs
pub mod migration; // Duty roster schema
pub mod models;
pub mod notifications;
pub mod settings;
pub mod tabs; // Read-only clinical tabs

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
