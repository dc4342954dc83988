//! reqwest-backed transport
//!
//! Joins the request path onto a base URL, applies one network-wide timeout,
//! and turns non-2xx responses into `TransportError::Status` with the body
//! decoded as JSON where possible.

use std::time::Duration;

use tracing::debug;

use crate::request::RequestContext;
use crate::transport::{ApiResponse, Transport, TransportError, TransportFuture};

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Resolve a request path against the base URL. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: RequestContext) -> TransportFuture<'_> {
        Box::pin(async move {
            let RequestContext {
                method,
                path,
                headers,
                params,
                body,
                ..
            } = request;
            let url = self.url_for(&path);

            let mut builder = self
                .client
                .request(method, &url)
                .headers(headers)
                .timeout(self.timeout);
            if !params.is_empty() {
                builder = builder.query(&params);
            }
            if let Some(body) = &body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(map_reqwest_error)?;
            let body = decode_body(&bytes);
            debug!(url = %url, status = status.as_u16(), "response received");

            if status.is_success() {
                Ok(ApiResponse {
                    status: status.as_u16(),
                    body: body.unwrap_or(serde_json::Value::Null),
                })
            } else {
                Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        })
    }
}

/// Decode a response body. Non-JSON text is kept as a JSON string.
fn decode_body(bytes: &[u8]) -> Option<serde_json::Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(serde_json::Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_decode() || e.is_body() {
        TransportError::Decode(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
