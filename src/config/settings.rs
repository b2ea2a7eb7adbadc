//! JSON settings file parsing and validation.
//!
//! The settings format keeps the historical camelCase field names so
//! existing `settings.json` files keep working.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Raw settings exactly as they appear in the JSON file.
///
/// All validation happens in [`Settings::from_raw`]; this struct only
/// mirrors the file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawSettings {
    host: String,
    port: u16,
    user: String,
    password: String,
    domain: String,
    sub_domains: Vec<String>,
    #[serde(default)]
    notify_url: Option<String>,
    #[serde(default)]
    mqtt_host: Option<String>,
    #[serde(default)]
    mqtt_port: Option<u16>,
    #[serde(default)]
    mqtt_topic: Option<String>,
}

/// The notifier variant the settings selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierSettings {
    /// Plain-text HTTP POST to this URL.
    Http {
        /// Notification endpoint
        url: url::Url,
    },
    /// MQTT publish to `topic` on the broker at `host:port`.
    Mqtt {
        /// Broker host
        host: String,
        /// Broker port
        port: u16,
        /// Topic the change message is published to
        topic: String,
    },
    /// No notifier configured.
    Disabled,
}

/// Validated settings, immutable for the process lifetime.
#[derive(Debug)]
pub struct Settings {
    /// DirectAdmin panel host
    pub host: String,
    /// DirectAdmin panel port
    pub port: u16,
    /// Panel login
    pub user: String,
    /// Panel password
    pub password: String,
    /// Domain whose zone is managed
    pub domain: String,
    /// Subdomains to keep pointed at the external IP, in order
    pub sub_domains: Vec<String>,
    /// Selected notifier variant
    pub notifier: NotifierSettings,
}

impl Settings {
    /// Loads and validates settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, the JSON
    /// does not parse, no subdomains are listed, the notification URL is
    /// invalid, the MQTT triple is incomplete, or both notifier variants
    /// are configured at once.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let raw: RawSettings = serde_json::from_str(&content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        if raw.sub_domains.is_empty() {
            return Err(ConfigError::NoSubdomains);
        }

        let notifier = resolve_notifier(&raw)?;

        Ok(Self {
            host: raw.host,
            port: raw.port,
            user: raw.user,
            password: raw.password,
            domain: raw.domain,
            sub_domains: raw.sub_domains,
            notifier,
        })
    }
}

/// Picks the notifier variant, rejecting ambiguous or partial setups.
fn resolve_notifier(raw: &RawSettings) -> Result<NotifierSettings, ConfigError> {
    let mqtt_present =
        raw.mqtt_host.is_some() || raw.mqtt_port.is_some() || raw.mqtt_topic.is_some();

    if raw.notify_url.is_some() && mqtt_present {
        return Err(ConfigError::AmbiguousNotifier);
    }

    if let Some(url) = &raw.notify_url {
        let url = url::Url::parse(url).map_err(|e| ConfigError::InvalidNotifyUrl {
            url: url.clone(),
            source: e,
        })?;
        return Ok(NotifierSettings::Http { url });
    }

    if mqtt_present {
        let host = raw
            .mqtt_host
            .clone()
            .ok_or(ConfigError::IncompleteMqtt { missing: "mqttHost" })?;
        let port = raw
            .mqtt_port
            .ok_or(ConfigError::IncompleteMqtt { missing: "mqttPort" })?;
        let topic = raw
            .mqtt_topic
            .clone()
            .ok_or(ConfigError::IncompleteMqtt { missing: "mqttTopic" })?;
        return Ok(NotifierSettings::Mqtt { host, port, topic });
    }

    Ok(NotifierSettings::Disabled)
}

// Startup log line; the password stays out of it.
impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notifier = match &self.notifier {
            NotifierSettings::Http { url } => format!("http ({url})"),
            NotifierSettings::Mqtt { host, port, topic } => {
                format!("mqtt (tcp://{host}:{port}, topic {topic})")
            }
            NotifierSettings::Disabled => "disabled".to_string(),
        };

        write!(
            f,
            "Settings {{ panel: https://{}:{}, user: {}, domain: {}, subdomains: [{}], notifier: {} }}",
            self.host,
            self.port,
            self.user,
            self.domain,
            self.sub_domains.join(", "),
            notifier,
        )
    }
}
