//! services/dashboard/src/web/fetch.rs
//!
//! The authenticated fetch wrapper. Every API call after sign-in goes through
//! here so the bearer token is attached in one place and an expired session
//! is torn down in one place.

use smartdoc_core::ports::{HttpRequest, HttpResponse, HttpTransport, PortResult};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::web::session::SessionGuard;

#[derive(Clone)]
pub struct AuthedClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    guard: SessionGuard,
}

impl AuthedClient {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>, guard: SessionGuard) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            guard,
        }
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Joins an `/api/...` path onto the configured base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request` with the bearer token.
    ///
    /// * No stored token: logs out and returns `Ok(None)` without sending.
    /// * 401: logs out, then still hands the response back.
    /// * Transport failure: `Err`, the session is left alone.
    pub async fn fetch_with_auth(&self, request: HttpRequest) -> PortResult<Option<HttpResponse>> {
        let Some(token) = self.guard.token() else {
            warn!("No token for {} {}, signing out", request.method.as_str(), request.url);
            self.guard.logout();
            return Ok(None);
        };

        let method = request.method;
        let url = request.url.clone();
        let request = request.with_header("Authorization", format!("Bearer {}", token));

        let response = self.transport.send(request).await?;
        debug!("{} {} -> {}", method.as_str(), url, response.status);

        if response.is_unauthorized() {
            warn!("Server rejected the session on {} {}", method.as_str(), url);
            self.guard.logout();
        }
        Ok(Some(response))
    }

    pub async fn get(&self, path: &str) -> PortResult<Option<HttpResponse>> {
        self.fetch_with_auth(HttpRequest::get(self.url(path))).await
    }

    pub async fn delete(&self, path: &str) -> PortResult<Option<HttpResponse>> {
        self.fetch_with_auth(HttpRequest::delete(self.url(path))).await
    }

    /// Unauthenticated send, for the sign-in endpoints.
    pub async fn send_public(&self, request: HttpRequest) -> PortResult<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        debug!("{} {} -> {}", method.as_str(), url, response.status);
        Ok(response)
    }
}
