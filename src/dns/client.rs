//! DirectAdmin control-panel API client.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::transport::{HttpClient, HttpRequest, HttpResponse};

use super::{DnsError, ZoneSnapshot};

/// Control-panel CGI endpoint for zone management.
const CONTROL_ENDPOINT: &str = "CMD_API_DNS_CONTROL";

/// Client for a DirectAdmin host's DNS control API.
///
/// All operations target a single configured domain. Requests share the
/// same construction: the control endpoint URL with the domain as query
/// parameter, HTTP Basic credentials, form content type.
///
/// Generic over [`HttpClient`]; production code hands in a
/// [`crate::transport::ReqwestClient`] clone, tests script responses.
pub struct DirectAdminClient<H> {
    client: H,
    base_url: url::Url,
    auth: http::HeaderValue,
    domain: String,
}

// The Authorization header carries the panel credentials; keep it out of
// Debug output.
impl<H> std::fmt::Debug for DirectAdminClient<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectAdminClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &"<REDACTED>")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl<H> DirectAdminClient<H> {
    /// Creates a client for `domain` hosted on the panel at `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Endpoint`] when host, port and domain do not
    /// form a parseable HTTPS URL.
    pub fn new(
        client: H,
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        domain: &str,
    ) -> Result<Self, DnsError> {
        let base_url =
            url::Url::parse(&format!("https://{host}:{port}/{CONTROL_ENDPOINT}?domain={domain}"))?;

        let token = BASE64.encode(format!("{user}:{password}"));
        let auth = http::HeaderValue::from_str(&format!("Basic {token}"))
            .expect("base64 token is valid header text");

        Ok(Self {
            client,
            base_url,
            auth,
            domain: domain.to_string(),
        })
    }

    /// Shared request skeleton: endpoint URL, credentials, form headers.
    fn base_request(&self, method: http::Method) -> HttpRequest {
        HttpRequest::new(method, self.base_url.clone())
            .with_header(AUTHORIZATION, self.auth.clone())
            .with_header(
                CONTENT_TYPE,
                http::HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .with_header(ACCEPT, http::HeaderValue::from_static("*/*"))
    }

    /// Builds the zone-listing request.
    fn list_request(&self) -> HttpRequest {
        self.base_request(http::Method::GET)
    }

    /// Builds the request adding an A record `name` -> `ip`.
    fn add_record_request(&self, name: &str, ip: &str) -> HttpRequest {
        self.base_request(http::Method::POST).with_body(form_body(&[
            ("domain", &self.domain),
            ("action", "add"),
            ("type", "A"),
            ("name", name),
            ("value", ip),
            ("add", "Add"),
        ]))
    }

    /// Builds the request deleting the A record for `name`.
    fn delete_record_request(&self, name: &str) -> HttpRequest {
        self.base_request(http::Method::POST).with_body(form_body(&[
            ("domain", &self.domain),
            ("arecs0", &format!("name={name}")),
            ("delete", "Delete Selected"),
            ("action", "select"),
        ]))
    }
}

impl<H: HttpClient> DirectAdminClient<H> {
    /// Lists the zone and scrapes its A records into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Http`] on transport failure and
    /// [`DnsError::Api`] when the panel answers non-2xx.
    pub async fn list_records(&self) -> Result<ZoneSnapshot, DnsError> {
        let response = self.execute("list", self.list_request()).await?;
        Ok(ZoneSnapshot::parse(&String::from_utf8_lossy(&response.body)))
    }

    /// Adds an A record `name` -> `ip` to the zone.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Http`] on transport failure and
    /// [`DnsError::Api`] when the panel answers non-2xx.
    pub async fn add_record(&self, name: &str, ip: &str) -> Result<(), DnsError> {
        self.execute("add", self.add_record_request(name, ip)).await?;
        Ok(())
    }

    /// Deletes the A record for `name` from the zone.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Http`] on transport failure and
    /// [`DnsError::Api`] when the panel answers non-2xx.
    pub async fn delete_record(&self, name: &str) -> Result<(), DnsError> {
        self.execute("delete", self.delete_record_request(name)).await?;
        Ok(())
    }

    async fn execute(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<HttpResponse, DnsError> {
        let response = self.client.request(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(DnsError::Api {
                operation,
                status: response.status,
            })
        }
    }
}

/// Encodes key/value pairs as an `application/x-www-form-urlencoded` body.
fn form_body(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish().into_bytes()
}
