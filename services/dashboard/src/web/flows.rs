//! services/dashboard/src/web/flows.rs
//!
//! The mutation flows: delete a user, delete a document, upload a document.
//! Each one confirms or validates first, calls the API, reports the result in
//! a dialog and then reloads the affected views. Nothing is updated locally.

use smartdoc_core::domain::{FileType, UploadFile};
use smartdoc_core::ports::{ConfirmPrompt, DialogService, HttpRequest, HttpResponse, Notice, PageView};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::web::{
    fetch::AuthedClient,
    format::format_file_size,
    loaders::{Refresh, Scope},
    records::{decode, ErrorEnvelope},
};

const GENERIC_ERROR: &str = "An error occurred";
const FILE_INPUT_ID: &str = "fileInput";

/// How a flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// Client-side validation refused the input; nothing was sent.
    Rejected(UploadRejection),
    /// The server answered with a failure; carries the text shown.
    ServerError(String),
    /// The request never got an answer, or the answer was unreadable.
    TransportError,
    /// No session, or the server rejected it. The guard already navigated.
    SignedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    InvalidType,
    TooLarge,
}

/// Client-side checks run before an upload leaves the page. Type comes
/// first: a declared MIME type must be PDF or plain text; a file without
/// one is judged by its extension.
pub fn validate_upload(file: &UploadFile, max_bytes: u64) -> Result<FileType, UploadRejection> {
    let file_type = if file.declared_type.is_empty() {
        file.extension().and_then(FileType::from_extension)
    } else {
        FileType::from_mime(&file.declared_type)
    };
    let file_type = file_type.ok_or(UploadRejection::InvalidType)?;

    if file.size > max_bytes {
        return Err(UploadRejection::TooLarge);
    }
    Ok(file_type)
}

#[derive(Debug, Clone, Copy)]
enum Target {
    User(i64),
    Document(i64),
}

impl Target {
    fn path(&self) -> String {
        match self {
            Self::User(id) => format!("/api/admin/users/{}", id),
            Self::Document(id) => format!("/api/documents/{}", id),
        }
    }

    fn prompt(&self, scope: Scope) -> ConfirmPrompt {
        match self {
            Self::User(_) => ConfirmPrompt {
                title: "Delete User?".to_string(),
                text: "This will delete the user and all their documents!".to_string(),
                confirm_label: "Yes, delete user!".to_string(),
            },
            Self::Document(_) => ConfirmPrompt {
                title: match scope {
                    Scope::Admin => "Delete Document?",
                    Scope::Member => "Are you sure?",
                }
                .to_string(),
                text: "You won't be able to revert this!".to_string(),
                confirm_label: "Yes, delete it!".to_string(),
            },
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Document(_) => "document",
        }
    }
}

pub struct MutationFlows {
    scope: Scope,
    client: AuthedClient,
    dialogs: Arc<dyn DialogService>,
    view: Arc<dyn PageView>,
    refresh: Arc<dyn Refresh>,
    max_upload_bytes: u64,
    notice_delay: Duration,
}

impl MutationFlows {
    pub fn new(
        scope: Scope,
        client: AuthedClient,
        dialogs: Arc<dyn DialogService>,
        view: Arc<dyn PageView>,
        refresh: Arc<dyn Refresh>,
        max_upload_bytes: u64,
        notice_delay: Duration,
    ) -> Self {
        Self {
            scope,
            client,
            dialogs,
            view,
            refresh,
            max_upload_bytes,
            notice_delay,
        }
    }

    /// Deleting a user also removes their documents, so all three views reload.
    pub async fn delete_user(&self, user_id: i64) -> FlowOutcome {
        self.delete(Target::User(user_id)).await
    }

    pub async fn delete_document(&self, document_id: i64) -> FlowOutcome {
        self.delete(Target::Document(document_id)).await
    }

    async fn delete(&self, target: Target) -> FlowOutcome {
        if !self.dialogs.confirm(&target.prompt(self.scope)).await {
            return FlowOutcome::Cancelled;
        }

        let response = match self.client.delete(&target.path()).await {
            Ok(Some(response)) => response,
            Ok(None) => return FlowOutcome::SignedOut,
            Err(e) => {
                error!("Failed to delete {}: {}", target.noun(), e);
                self.show_error("Error", GENERIC_ERROR).await;
                return FlowOutcome::TransportError;
            }
        };

        if response.is_ok() {
            info!("Deleted {} via {}", target.noun(), target.path());
            let text = format!("{} has been deleted.", capitalize(target.noun()));
            self.dialogs
                .notify(&Notice::success("Deleted!", &text, self.notice_delay))
                .await;
            match target {
                Target::User(_) => {
                    futures::join!(
                        self.refresh.refresh_users(),
                        self.refresh.refresh_documents(),
                        self.refresh.refresh_stats()
                    );
                }
                Target::Document(_) => {
                    futures::join!(
                        self.refresh.refresh_documents(),
                        self.refresh.refresh_stats()
                    );
                }
            }
            return FlowOutcome::Completed;
        }

        if response.is_unauthorized() {
            return FlowOutcome::SignedOut;
        }
        let fallback = format!("Could not delete {}", target.noun());
        self.report_failure(&response, "Error", &fallback).await
    }

    pub async fn upload(&self, file: UploadFile) -> FlowOutcome {
        match validate_upload(&file, self.max_upload_bytes) {
            Ok(_) => {}
            Err(UploadRejection::InvalidType) => {
                warn!("Refusing upload of '{}' ({:?})", file.name, file.declared_type);
                self.show_error("Invalid File Type", "Please upload a PDF or TXT file")
                    .await;
                return FlowOutcome::Rejected(UploadRejection::InvalidType);
            }
            Err(UploadRejection::TooLarge) => {
                warn!("Refusing upload of '{}': {} bytes", file.name, file.size);
                let text = format!(
                    "File size should not exceed {}",
                    format_file_size(self.max_upload_bytes)
                );
                self.show_error("File Too Large", &text).await;
                return FlowOutcome::Rejected(UploadRejection::TooLarge);
            }
        }

        self.dialogs
            .show_progress("Analyzing Document...", "This may take a few moments");

        let name = file.name.clone();
        let request = HttpRequest::post_file(self.client.url("/api/documents/upload"), "file", file);
        let response = match self.client.fetch_with_auth(request).await {
            Ok(Some(response)) => response,
            Ok(None) => return FlowOutcome::SignedOut,
            Err(e) => {
                error!("Upload of '{}' failed: {}", name, e);
                self.show_error("Error", "An error occurred during upload").await;
                return FlowOutcome::TransportError;
            }
        };

        if response.is_ok() {
            info!("Uploaded '{}'", name);
            self.dialogs
                .notify(&Notice::success(
                    "Success!",
                    "Document analyzed successfully",
                    self.notice_delay,
                ))
                .await;
            futures::join!(
                self.refresh.refresh_documents(),
                self.refresh.refresh_stats()
            );
            self.view.reset_input(FILE_INPUT_ID);
            return FlowOutcome::Completed;
        }

        if response.is_unauthorized() {
            return FlowOutcome::SignedOut;
        }
        match decode::<ErrorEnvelope>(&response.body) {
            Ok(body) => {
                let text = body
                    .error
                    .unwrap_or_else(|| "Could not upload document".to_string());
                self.show_error("Upload Failed", &text).await;
                FlowOutcome::ServerError(text)
            }
            Err(e) => {
                error!("Unreadable upload response: {}", e);
                self.show_error("Error", "An error occurred during upload").await;
                FlowOutcome::TransportError
            }
        }
    }

    /// Shows the server's `error` text, or `fallback` when it sent none.
    async fn report_failure(&self, response: &HttpResponse, title: &str, fallback: &str) -> FlowOutcome {
        match decode::<ErrorEnvelope>(&response.body) {
            Ok(body) => {
                let text = body.error.unwrap_or_else(|| fallback.to_string());
                warn!("Server refused request ({}): {}", response.status, text);
                self.show_error(title, &text).await;
                FlowOutcome::ServerError(text)
            }
            Err(e) => {
                error!("Unreadable error response ({}): {}", response.status, e);
                self.show_error("Error", GENERIC_ERROR).await;
                FlowOutcome::TransportError
            }
        }
    }

    async fn show_error(&self, title: &str, text: &str) {
        self.dialogs.notify(&Notice::error(title, text)).await;
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
