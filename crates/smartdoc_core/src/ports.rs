//! crates/smartdoc_core/src/ports.rs
//!
//! Defines the contracts (traits) between the dashboard's page logic and the
//! outside world: persistent storage, navigation, dialogs, the rendered page
//! and the network. Browsers, terminals and test fakes all plug in here.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::domain::{Route, UploadFile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Could not decode payload: {0}")]
    Decode(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// HTTP Request / Response Values
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    /// An already-serialized JSON document.
    Json(String),
    /// A multipart form with a single file part.
    Multipart { field: String, file: UploadFile },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, RequestBody::Empty)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url, RequestBody::Empty)
    }

    pub fn post_json(url: impl Into<String>, json: String) -> Self {
        Self::new(HttpMethod::Post, url, RequestBody::Json(json))
    }

    pub fn post_file(url: impl Into<String>, field: impl Into<String>, file: UploadFile) -> Self {
        Self::new(
            HttpMethod::Post,
            url,
            RequestBody::Multipart {
                field: field.into(),
                file,
            },
        )
    }

    /// Sets a header, replacing any existing value with the same
    /// case-insensitive name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Mirrors the browser's `response.ok`: any 2xx status.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

//=========================================================================================
// Dialog Values
//=========================================================================================

/// A blocking yes/no question with destructive framing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
    /// Notices with a delay close themselves; the others wait for the user.
    pub auto_close: Option<Duration>,
}

impl Notice {
    pub fn success(title: &str, text: &str, auto_close: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.to_string(),
            text: text.to_string(),
            auto_close: Some(auto_close),
        }
    }

    pub fn error(title: &str, text: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            text: text.to_string(),
            auto_close: None,
        }
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Key/value persistent storage, as the browser's local storage offers it.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

pub trait Navigator: Send + Sync {
    /// Leaves the current page for `route`. The switch happens after the
    /// current flow yields, so callers keep running until they return.
    fn navigate(&self, route: Route);
}

#[async_trait]
pub trait DialogService: Send + Sync {
    /// Resolves once the user picked an answer.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;

    /// Shows a notice, replacing any dialog already open, and resolves when
    /// it closes.
    async fn notify(&self, notice: &Notice);

    /// Opens an indeterminate progress dialog the user cannot dismiss.
    fn show_progress(&self, title: &str, message: &str);
}

/// The live page the renderers bind into, addressed by element id.
pub trait PageView: Send + Sync {
    fn set_text(&self, element_id: &str, text: &str);
    fn set_html(&self, element_id: &str, html: &str);
    fn set_visible(&self, element_id: &str, visible: bool);
    fn set_class(&self, element_id: &str, class: &str, enabled: bool);
    fn set_style(&self, element_id: &str, property: &str, value: &str);
    /// Clears a file input so the same file can be picked again.
    fn reset_input(&self, element_id: &str);
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request as-is. Any HTTP status is a successful send; only
    /// failing to get a response at all is an error.
    async fn send(&self, request: HttpRequest) -> PortResult<HttpResponse>;
}
