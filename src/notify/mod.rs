//! Change notification side channel.
//!
//! When the external IP changes the reconciler pushes one human-readable
//! message through a notifier before touching DNS. Two delivery
//! mechanisms exist for historical reasons (a plain-text HTTP POST and
//! an MQTT publish), unified behind the [`Notifier`] trait and selected
//! by configuration. Delivery is advisory: the reconciler logs a failed
//! notification and carries on.

mod http;
mod mqtt;


pub use http::HttpNotifier;
pub use mqtt::MqttNotifier;

use thiserror::Error;

use crate::transport::HttpClient;

/// Renders the change message shared by every notifier variant.
///
/// `old_ip` is empty on the first run, which reads a little awkwardly
/// but keeps the message format stable for downstream consumers.
#[must_use]
pub fn change_message(old_ip: &str, new_ip: &str) -> String {
    format!("IP address changed from {old_ip} to {new_ip}.")
}

/// Error type for notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification endpoint could not be reached.
    #[error("Failed to reach notification endpoint: {0}")]
    Http(#[from] crate::transport::HttpError),

    /// The notification endpoint answered with a non-success status.
    #[error("Notification endpoint answered HTTP {status}")]
    NonSuccessStatus {
        /// The status code the endpoint answered with.
        status: ::http::StatusCode,
    },

    /// The MQTT client rejected the publish or disconnect request.
    #[error("MQTT client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The MQTT connection failed while delivering the message.
    #[error("MQTT connection error: {0}")]
    Broker(#[from] rumqttc::ConnectionError),
}

/// Trait for delivering a change notification.
///
/// One operation, one message. Implementations decide the wire format.
pub trait Notifier: Send + Sync {
    /// Delivers a notification that the external IP changed from
    /// `old_ip` (empty on first run) to `new_ip`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails. The caller treats
    /// this as advisory, not fatal.
    fn notify(
        &self,
        old_ip: &str,
        new_ip: &str,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

/// The notifier variant selected by configuration.
///
/// A plain enum rather than a trait object because [`Notifier`] returns
/// an opaque future and is not dyn-compatible.
#[derive(Debug)]
pub enum ConfiguredNotifier<H> {
    /// Plain-text HTTP POST variant.
    Http(HttpNotifier<H>),
    /// MQTT publish variant.
    Mqtt(MqttNotifier),
    /// No notifier configured.
    Disabled,
}

impl<H: HttpClient> Notifier for ConfiguredNotifier<H> {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        match self {
            Self::Http(notifier) => notifier.notify(old_ip, new_ip).await,
            Self::Mqtt(notifier) => notifier.notify(old_ip, new_ip).await,
            Self::Disabled => {
                tracing::debug!("No notifier configured, skipping change notification");
                Ok(())
            }
        }
    }
}
