//! `reqwest`-backed transport
//!
//! Joins the configured base URL with the request path, sends the body as
//! JSON or multipart, and decodes the answer as JSON. Non-2xx answers become
//! [`TransportError::Status`] carrying the raw body text.

use super::{
    FormData, FormValue, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    TransportError,
};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// HTTP transport using a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport from validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        config
            .validate()
            .map_err(TransportError::invalid_request)?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn multipart(form: FormData) -> Result<Form, TransportError> {
        let mut multipart = Form::new();
        for (name, value) in form.fields().iter().cloned() {
            multipart = match value {
                FormValue::Text(text) => multipart.text(name, text),
                FormValue::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut part = Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = content_type {
                        part = part
                            .mime_str(&mime)
                            .map_err(|e| TransportError::invalid_request(e.to_string()))?;
                    }
                    multipart.part(name, part)
                }
            };
        }
        Ok(multipart)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url(&request.path);
        let is_multipart = matches!(request.body, RequestBody::Multipart(_));
        let mut builder = self
            .http
            .request(Self::method(request.method), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        for (name, value) in &request.headers {
            // reqwest writes its own multipart content type with the boundary
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(Self::multipart(form)?),
        };

        tracing::debug!("{} {}", request.method, url);
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| TransportError::decode(format!("response body: {}", e)))?
        };

        Ok(HttpResponse::new(status.as_u16(), body))
    }
}
