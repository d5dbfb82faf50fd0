// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction under the fixed `/api`
// base path and uniform response decoding. Endpoint methods live in
// `devices.rs` as inherent methods so this module stays focused on
// transport mechanics.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorDetail;
use crate::transport::TransportConfig;

const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the discovery backend.
///
/// All methods return decoded payloads; non-2xx responses become
/// [`Error::Backend`] and malformed bodies become [`Error::Deserialization`].
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DirectoryClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://localhost:8000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{}", path.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::parse_json(resp).await
    }

    /// Send a GET request and return the raw body.
    pub(crate) async fn get_bytes(&self, url: Url) -> Result<Bytes, Error> {
        debug!("GET {}", url);
        let resp = Self::check_status(self.http.get(url).send().await?).await?;
        Ok(resp.bytes().await?)
    }

    /// Send a bodiless POST request and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).send().await?;
        Self::parse_json(resp).await
    }

    /// Send a POST request whose response body is irrelevant.
    pub(crate) async fn post_discard(
        &self,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::check_status(builder.send().await?).await?;
        Ok(())
    }

    /// Send a multipart POST and decode the response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        debug!("POST (multipart) {}", url);
        let resp = self.http.post(url).multipart(form).send().await?;
        Self::parse_json(resp).await
    }

    // ── Response decoding ────────────────────────────────────────────

    /// Turn a non-2xx response into `Error::Backend`, passing 2xx through.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Backend {
            status: status.as_u16(),
            message: backend_message(&body, status),
        })
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        trace!(len = body.len(), "decoding response body");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// Extract a human-readable message from an error body.
///
/// FastAPI answers `{"detail": "..."}`; anything else is shown as a
/// truncated preview.
fn backend_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(detail) = serde_json::from_str::<ErrorDetail>(body) {
        return match detail.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned();
    }
    preview(body).to_owned()
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
