//! Tests for the delete and upload flows against a stubbed API.

mod common;

use async_trait::async_trait;
use bytes::Bytes;
use common::{document, Harness};
use dashboard_lib::adapters::DialogEvent;
use dashboard_lib::web::flows::MutationFlows;
use dashboard_lib::web::loaders::Refresh;
use dashboard_lib::web::{FlowOutcome, MemberPage, Scope, UploadRejection};
use serde_json::json;
use smartdoc_core::domain::{Route, UploadFile};
use smartdoc_core::ports::{HttpMethod, NoticeKind, RequestBody};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct CountingRefresh {
    documents: AtomicUsize,
    stats: AtomicUsize,
    users: AtomicUsize,
}

impl CountingRefresh {
    fn counts(&self) -> (usize, usize, usize) {
        (
            self.documents.load(Ordering::SeqCst),
            self.stats.load(Ordering::SeqCst),
            self.users.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl Refresh for CountingRefresh {
    async fn refresh_documents(&self) {
        self.documents.fetch_add(1, Ordering::SeqCst);
    }

    async fn refresh_stats(&self) {
        self.stats.fetch_add(1, Ordering::SeqCst);
    }

    async fn refresh_users(&self) {
        self.users.fetch_add(1, Ordering::SeqCst);
    }
}

fn flows(h: &Harness) -> (MutationFlows, Arc<CountingRefresh>) {
    flows_for(h, Scope::Admin)
}

fn flows_for(h: &Harness, scope: Scope) -> (MutationFlows, Arc<CountingRefresh>) {
    let refresh = Arc::new(CountingRefresh::default());
    let flows = MutationFlows::new(
        scope,
        h.state.client(),
        h.state.dialogs.clone(),
        h.state.view.clone(),
        refresh.clone(),
        16 * 1024 * 1024,
        Duration::from_millis(1),
    );
    (flows, refresh)
}

// ============================================================================
// delete
// ============================================================================

#[tokio::test]
async fn confirmed_document_delete_notifies_and_refreshes_once() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport
        .route(HttpMethod::Delete, "/api/documents/42", 200, json!({}));
    let (flows, refresh) = flows(&h);

    assert_eq!(flows.delete_document(42).await, FlowOutcome::Completed);

    assert_eq!(h.transport.count(HttpMethod::Delete, "/api/documents/42"), 1);
    let sent = &h.transport.requests()[0];
    assert_eq!(sent.header("authorization"), Some("Bearer t0k3n"));

    let notices = h.dialogs.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].title, "Deleted!");
    assert_eq!(notices[0].text, "Document has been deleted.");
    assert_eq!(notices[0].auto_close, Some(Duration::from_millis(1)));

    assert_eq!(refresh.counts(), (1, 1, 0));
}

#[tokio::test]
async fn user_delete_refreshes_all_three_views() {
    let h = Harness::new(true);
    h.sign_in(true);
    h.transport
        .route(HttpMethod::Delete, "/api/admin/users/7", 200, json!({}));
    let (flows, refresh) = flows(&h);

    assert_eq!(flows.delete_user(7).await, FlowOutcome::Completed);
    assert_eq!(h.dialogs.notices()[0].text, "User has been deleted.");
    assert_eq!(refresh.counts(), (1, 1, 1));
}

#[tokio::test]
async fn server_refusal_shows_its_error_text() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport.route(
        HttpMethod::Delete,
        "/api/documents/42",
        404,
        json!({"error": "not found"}),
    );
    let (flows, refresh) = flows(&h);

    assert_eq!(
        flows.delete_document(42).await,
        FlowOutcome::ServerError("not found".into())
    );
    let notices = h.dialogs.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].text, "not found");
    assert_eq!(refresh.counts(), (0, 0, 0));
}

#[tokio::test]
async fn refusal_without_error_text_uses_fallback() {
    let h = Harness::new(true);
    h.sign_in(true);
    h.transport
        .route(HttpMethod::Delete, "/api/admin/users/3", 403, json!({}));
    let (flows, _) = flows(&h);

    assert_eq!(
        flows.delete_user(3).await,
        FlowOutcome::ServerError("Could not delete user".into())
    );
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let h = Harness::new(false);
    h.sign_in(false);
    let (flows, refresh) = flows(&h);

    assert_eq!(flows.delete_document(42).await, FlowOutcome::Cancelled);
    assert!(h.transport.requests().is_empty());
    assert_eq!(h.dialogs.confirmations(), 1);
    assert!(h.dialogs.notices().is_empty());
    assert_eq!(refresh.counts(), (0, 0, 0));
}

#[tokio::test]
async fn member_page_asks_its_own_confirmation() {
    let h = Harness::new(false);
    h.sign_in(false);
    let (flows, _) = flows_for(&h, Scope::Member);

    assert_eq!(flows.delete_document(42).await, FlowOutcome::Cancelled);
    match &h.dialogs.events()[0] {
        DialogEvent::Confirm { prompt, .. } => assert_eq!(prompt.title, "Are you sure?"),
        other => panic!("expected a confirmation, got {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_delete_signs_out_once_without_dialog() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport.route(
        HttpMethod::Delete,
        "/api/documents/42",
        401,
        json!({"error": "expired"}),
    );
    let (flows, refresh) = flows(&h);

    assert_eq!(flows.delete_document(42).await, FlowOutcome::SignedOut);
    assert_eq!(h.token(), None);
    assert_eq!(h.navigator.routes(), vec![Route::Login]);
    assert!(h.dialogs.notices().is_empty());
    assert_eq!(refresh.counts(), (0, 0, 0));
}

#[tokio::test]
async fn unreachable_server_reports_generic_error() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport.go_offline();
    let (flows, _) = flows(&h);

    assert_eq!(flows.delete_document(1).await, FlowOutcome::TransportError);
    assert_eq!(h.dialogs.notices()[0].text, "An error occurred");
    assert_eq!(h.token().as_deref(), Some("t0k3n"));
}

// ============================================================================
// upload
// ============================================================================

#[tokio::test]
async fn oversized_upload_is_refused_before_sending() {
    let h = Harness::new(true);
    h.sign_in(false);
    let (flows, _) = flows(&h);
    let big = UploadFile::new(
        "big.pdf",
        "application/pdf",
        Bytes::from(vec![0u8; 20 * 1024 * 1024]),
    );

    assert_eq!(
        flows.upload(big).await,
        FlowOutcome::Rejected(UploadRejection::TooLarge)
    );
    assert!(h.transport.requests().is_empty());
    let notices = h.dialogs.notices();
    assert_eq!(notices[0].title, "File Too Large");
    assert_eq!(notices[0].text, "File size should not exceed 16 MB");
}

#[tokio::test]
async fn wrong_type_upload_is_refused_before_sending() {
    let h = Harness::new(true);
    h.sign_in(false);
    let (flows, _) = flows(&h);
    let docx = UploadFile::new(
        "notes.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Bytes::from_static(b"PK"),
    );

    assert_eq!(
        flows.upload(docx).await,
        FlowOutcome::Rejected(UploadRejection::InvalidType)
    );
    assert!(h.transport.requests().is_empty());
    assert_eq!(h.dialogs.notices()[0].text, "Please upload a PDF or TXT file");
}

#[tokio::test]
async fn accepted_upload_posts_file_and_reloads_dashboard() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport.route(
        HttpMethod::Post,
        "/api/documents/upload",
        201,
        json!({"message": "ok"}),
    );
    h.transport.route(
        HttpMethod::Get,
        "/api/documents",
        200,
        json!({"documents": [document(1, Some("positive"))]}),
    );
    let page = MemberPage::new(&h.state);
    let file = UploadFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello"));

    assert_eq!(page.upload(file).await, FlowOutcome::Completed);

    let upload = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.method == HttpMethod::Post)
        .expect("upload request");
    match &upload.body {
        RequestBody::Multipart { field, file } => {
            assert_eq!(field, "file");
            assert_eq!(file.name, "notes.txt");
        }
        other => panic!("unexpected body: {:?}", other),
    }
    assert_eq!(upload.header("Authorization"), Some("Bearer t0k3n"));

    let events = h.dialogs.events();
    assert!(matches!(&events[0], DialogEvent::Progress { title, .. } if title == "Analyzing Document..."));
    assert_eq!(h.dialogs.notices()[0].text, "Document analyzed successfully");

    // Documents and stats both reload from the member documents endpoint.
    assert_eq!(h.transport.count(HttpMethod::Get, "/api/documents"), 2);
    assert_eq!(h.view.resets("fileInput"), 1);
    assert_eq!(h.view.text("positiveDocs").as_deref(), Some("1"));
}

#[tokio::test]
async fn failed_upload_shows_server_text_and_keeps_input() {
    let h = Harness::new(true);
    h.sign_in(false);
    h.transport.route(
        HttpMethod::Post,
        "/api/documents/upload",
        400,
        json!({"error": "Could not extract text"}),
    );
    let (flows, refresh) = flows(&h);
    let file = UploadFile::new("scan.pdf", "application/pdf", Bytes::from_static(b"%PDF"));

    assert_eq!(
        flows.upload(file).await,
        FlowOutcome::ServerError("Could not extract text".into())
    );
    let notices = h.dialogs.notices();
    assert_eq!(notices[0].title, "Upload Failed");
    assert_eq!(h.view.resets("fileInput"), 0);
    assert_eq!(refresh.counts(), (0, 0, 0));
}

#[tokio::test]
async fn upload_without_session_goes_to_login() {
    let h = Harness::new(true);
    let (flows, _) = flows(&h);
    let file = UploadFile::new("a.txt", "text/plain", Bytes::from_static(b"x"));

    assert_eq!(flows.upload(file).await, FlowOutcome::SignedOut);
    assert!(h.transport.requests().is_empty());
    assert_eq!(h.navigator.routes(), vec![Route::Login]);
}
