//! Shared fixtures for the dashboard integration tests: a transport that
//! answers from a routing table and records what it was sent, plus an
//! `AppState` wired to in-memory adapters.

#![allow(dead_code)]

use async_trait::async_trait;
use dashboard_lib::adapters::{HeadlessDialogs, MemorySessionStore, RecordingNavigator, SnapshotView};
use dashboard_lib::config::Config;
use dashboard_lib::web::AppState;
use smartdoc_core::ports::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, PortError, PortResult, SessionStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://api.test";

/// Answers `(method, path)` pairs with canned responses. Unrouted requests
/// get a 404 with an `error` body.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(HttpMethod, String), (u16, String)>>,
    offline: Mutex<bool>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn route(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{}{}", BASE_URL, path);
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> PortResult<HttpResponse> {
        self.seen.lock().unwrap().push(request.clone());
        if *self.offline.lock().unwrap() {
            return Err(PortError::Transport("connection refused".into()));
        }
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let routes = self.routes.lock().unwrap();
        let (status, body) = routes
            .get(&(request.method, path))
            .cloned()
            .unwrap_or((404, r#"{"error":"not routed"}"#.to_string()));
        Ok(HttpResponse::new(status, body))
    }
}

pub struct Harness {
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub dialogs: Arc<HeadlessDialogs>,
    pub view: Arc<SnapshotView>,
    pub transport: Arc<StubTransport>,
    pub state: AppState,
}

impl Harness {
    pub fn new(assume_yes: bool) -> Self {
        let store = Arc::new(MemorySessionStore::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let dialogs = Arc::new(HeadlessDialogs::new(assume_yes));
        let view = Arc::new(SnapshotView::default());
        let transport = Arc::new(StubTransport::default());
        let config = Config {
            api_url: BASE_URL.to_string(),
            notice_delay: Duration::from_millis(1),
            ..Config::default()
        };
        let state = AppState {
            store: store.clone(),
            navigator: navigator.clone(),
            dialogs: dialogs.clone(),
            view: view.clone(),
            transport: transport.clone(),
            config: Arc::new(config),
        };
        Self {
            store,
            navigator,
            dialogs,
            view,
            transport,
            state,
        }
    }

    pub fn sign_in(&self, is_admin: bool) {
        self.store.set("token", "t0k3n").unwrap();
        let user = serde_json::json!({
            "id": 1,
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "is_admin": is_admin,
            "created_at": "2024-01-05T09:30:00"
        });
        self.store.set("user", &user.to_string()).unwrap();
    }

    pub fn token(&self) -> Option<String> {
        self.store.get("token").unwrap()
    }
}

pub fn document(id: i64, sentiment: Option<&str>) -> serde_json::Value {
    let analysis = sentiment.map(|label| {
        serde_json::json!({
            "sentiment": label,
            "sentiment_score": 0.8,
            "summary": "A short summary.",
            "key_points": r#"["first","second"]"#,
            "word_count": 120
        })
    });
    serde_json::json!({
        "id": id,
        "filename": format!("report-{}.pdf", id),
        "user_id": 1,
        "file_type": "pdf",
        "file_size": 2048,
        "uploaded_at": "2024-01-05T09:30:00",
        "analysis": analysis
    })
}
