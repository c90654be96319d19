//! HTTP Transport Abstraction
//!
//! The resource layer and the query executor only need one capability from
//! the network: send a request, get a JSON response back. That capability is
//! the [`HttpTransport`] trait. Two implementations ship with the crate:
//!
//! - [`ReqwestTransport`] - real HTTP via `reqwest` (feature `http-client`)
//! - [`InMemoryTransport`] - canned responses, records every request
//!
//! Paths are always relative to the transport's base URL and start with `/`.

pub mod error;
pub mod form;
pub mod memory;
#[cfg(feature = "http-client")]
pub mod reqwest_transport;

pub use error::TransportError;
pub use form::{FormData, FormValue};
pub use memory::InMemoryTransport;
#[cfg(feature = "http-client")]
pub use reqwest_transport::ReqwestTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Content type sent with multipart bodies
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(FormData),
}

/// A request handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: FormData) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Value of the first header named `name` (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A decoded response. `body` is `Value::Null` when the server sent nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response transport used by every network-facing component
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the decoded response.
    ///
    /// Implementations must report non-2xx answers as
    /// [`TransportError::Status`] rather than as a successful response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
