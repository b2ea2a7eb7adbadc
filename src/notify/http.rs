//! Plain-text HTTP push notifier.

use http::header::CONTENT_TYPE;

use crate::transport::{HttpClient, HttpRequest};

use super::{NotifyError, Notifier, change_message};

/// Notifier that POSTs the change message as `text/plain` to a
/// notification endpoint (historically a telegram relay).
///
/// The endpoint's response body is logged so operators can see what the
/// relay made of the message.
#[derive(Debug, Clone)]
pub struct HttpNotifier<H> {
    client: H,
    url: url::Url,
}

impl<H> HttpNotifier<H> {
    /// Creates a notifier POSTing to `url`.
    #[must_use]
    pub fn new(client: H, url: url::Url) -> Self {
        Self { client, url }
    }

    /// Returns the configured notification URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }
}

impl<H: HttpClient> Notifier for HttpNotifier<H> {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        let request = HttpRequest::post(self.url.clone())
            .with_header(CONTENT_TYPE, http::HeaderValue::from_static("text/plain"))
            .with_body(change_message(old_ip, new_ip).into_bytes());

        let response = self.client.request(request).await?;

        if !response.is_success() {
            return Err(NotifyError::NonSuccessStatus {
                status: response.status,
            });
        }

        if let Some(body) = response.body_text().filter(|b| !b.is_empty()) {
            tracing::info!("Notification endpoint answered: {body}");
        }

        Ok(())
    }
}
