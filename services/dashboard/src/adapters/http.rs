//! services/dashboard/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `HttpTransport` port from the `core` crate, backed by `reqwest`.

use async_trait::async_trait;
use reqwest::{multipart, Client, Method};
use smartdoc_core::domain::FileType;
use smartdoc_core::ports::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, PortError, PortResult, RequestBody,
};
use std::time::Duration;

const USER_AGENT: &str = concat!("smartdoc-dashboard/", env!("CARGO_PKG_VERSION"));

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `HttpTransport` port with a pooled
/// `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport` whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

//=========================================================================================
// `HttpTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> PortResult<HttpResponse> {
        let mut builder = self.client.request(method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json),
            RequestBody::Multipart { field, file } => {
                // Pickers that report no type fall back to the extension's type.
                let mime = if file.declared_type.is_empty() {
                    file.extension()
                        .and_then(FileType::from_extension)
                        .map(|t| t.mime())
                        .unwrap_or("application/octet-stream")
                        .to_string()
                } else {
                    file.declared_type.clone()
                };
                let part = multipart::Part::bytes(file.contents.to_vec())
                    .file_name(file.name.clone())
                    .mime_str(&mime)
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                builder.multipart(multipart::Form::new().part(field, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}
