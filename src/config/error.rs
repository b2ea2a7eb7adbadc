//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read settings file '{}': {source}", path.display())]
    FileRead {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the settings JSON.
    #[error("Failed to parse settings JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The settings list no subdomains to manage.
    #[error("Settings must list at least one subdomain to manage")]
    NoSubdomains,

    /// The notification URL does not parse.
    #[error("Invalid notification URL '{url}': {source}")]
    InvalidNotifyUrl {
        /// The URL string from the settings file
        url: String,
        /// Underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// Some but not all of the MQTT fields are present.
    #[error("Incomplete MQTT settings: '{missing}' is required when any mqtt field is set")]
    IncompleteMqtt {
        /// The field that is missing
        missing: &'static str,
    },

    /// Both notifier variants are configured at once.
    #[error("Both 'notifyUrl' and MQTT settings are present; configure exactly one notifier")]
    AmbiguousNotifier,
}
