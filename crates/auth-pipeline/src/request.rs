//! Per-call request description handed through the pipeline

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// One outgoing call.
///
/// Created fresh by the caller for every request. The pipeline only reads it
/// and adds the `Authorization` header before dispatch.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path relative to the transport's base URL, or an absolute URL
    pub path: String,
    pub headers: HeaderMap,
    /// Query string parameters, in order
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// When set, no bearer credential is read or attached (login call)
    pub skip_auth: bool,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            params: Vec::new(),
            body: None,
            skip_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the call as unauthenticated.
    pub fn without_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}
