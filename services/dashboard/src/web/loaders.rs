//! services/dashboard/src/web/loaders.rs
//!
//! The per-view data loaders. Each one issues a single authenticated GET,
//! decodes the body and binds it into the page. Failures are logged and leave
//! whatever is on screen untouched.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use smartdoc_core::ports::PageView;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::web::{
    fetch::AuthedClient,
    records::{decode, DocumentsEnvelope, StatsEnvelope, UsersEnvelope},
    render,
    sequence::RequestSequence,
    stats,
};

/// Which dashboard the loaders feed. It picks the endpoints and element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Admin,
    Member,
}

/// How a single load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    /// A newer load of the same view was started; this response was dropped.
    Stale,
    /// No session, or the server rejected it. The guard already navigated.
    SignedOut,
    Failed,
}

/// What a mutation flow needs to resynchronise the page afterwards.
#[async_trait]
pub trait Refresh: Send + Sync {
    async fn refresh_documents(&self);
    async fn refresh_stats(&self);
    async fn refresh_users(&self);
}

#[derive(Default)]
struct Sequences {
    stats: RequestSequence,
    users: RequestSequence,
    documents: RequestSequence,
}

pub struct Loaders {
    client: AuthedClient,
    view: Arc<dyn PageView>,
    scope: Scope,
    seq: Sequences,
}

impl Loaders {
    pub fn new(client: AuthedClient, view: Arc<dyn PageView>, scope: Scope) -> Self {
        Self {
            client,
            view,
            scope,
            seq: Sequences::default(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub async fn load_stats(&self) -> LoadOutcome {
        match self.scope {
            Scope::Admin => {
                let envelope: StatsEnvelope =
                    match self.fetch("/api/admin/stats", &self.seq.stats, "stats").await {
                        Ok(envelope) => envelope,
                        Err(outcome) => return outcome,
                    };
                stats::bind_admin_stats(self.view.as_ref(), &envelope.stats.to_domain());
            }
            Scope::Member => {
                let envelope: DocumentsEnvelope =
                    match self.fetch("/api/documents", &self.seq.stats, "stats").await {
                        Ok(envelope) => envelope,
                        Err(outcome) => return outcome,
                    };
                let documents = match envelope.to_domain() {
                    Ok(documents) => documents,
                    Err(e) => {
                        error!("Error loading stats: {}", e);
                        return LoadOutcome::Failed;
                    }
                };
                let snapshot = stats::derive_member_stats(&documents);
                stats::bind_member_stats(self.view.as_ref(), &snapshot);
            }
        }
        LoadOutcome::Rendered
    }

    /// Admin only; the member page has no users table.
    pub async fn load_users(&self) -> LoadOutcome {
        if self.scope != Scope::Admin {
            debug!("Skipping users load outside the admin page");
            return LoadOutcome::Failed;
        }
        let envelope: UsersEnvelope =
            match self.fetch("/api/admin/users", &self.seq.users, "users").await {
                Ok(envelope) => envelope,
                Err(outcome) => return outcome,
            };
        let users = envelope.to_domain();
        self.view
            .set_html("usersTableBody", &render::users_table_body(&users));
        LoadOutcome::Rendered
    }

    pub async fn load_documents(&self) -> LoadOutcome {
        let path = match self.scope {
            Scope::Admin => "/api/admin/documents",
            Scope::Member => "/api/documents",
        };
        let envelope: DocumentsEnvelope =
            match self.fetch(path, &self.seq.documents, "documents").await {
                Ok(envelope) => envelope,
                Err(outcome) => return outcome,
            };
        let documents = match envelope.to_domain() {
            Ok(documents) => documents,
            Err(e) => {
                error!("Error loading documents: {}", e);
                return LoadOutcome::Failed;
            }
        };
        match self.scope {
            Scope::Admin => self.view.set_html(
                "documentsTableBody",
                &render::documents_table_body(&documents),
            ),
            Scope::Member => self
                .view
                .set_html("documentsContainer", &render::document_cards(&documents)),
        }
        LoadOutcome::Rendered
    }

    /// GETs `path` and decodes the body, or says why nothing should render.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        seq: &RequestSequence,
        what: &str,
    ) -> Result<T, LoadOutcome> {
        let ticket = seq.issue();

        let response = match self.client.get(path).await {
            Ok(Some(response)) => response,
            Ok(None) => return Err(LoadOutcome::SignedOut),
            Err(e) => {
                error!("Error loading {}: {}", what, e);
                return Err(LoadOutcome::Failed);
            }
        };

        if !seq.is_current(ticket) {
            debug!("Discarding stale {} response", what);
            return Err(LoadOutcome::Stale);
        }
        if response.is_unauthorized() {
            return Err(LoadOutcome::SignedOut);
        }
        if !response.is_ok() {
            warn!("Loading {} returned status {}", what, response.status);
            return Err(LoadOutcome::Failed);
        }

        decode::<T>(&response.body).map_err(|e| {
            error!("Error loading {}: {}", what, e);
            LoadOutcome::Failed
        })
    }
}

#[async_trait]
impl Refresh for Loaders {
    async fn refresh_documents(&self) {
        self.load_documents().await;
    }

    async fn refresh_stats(&self) {
        self.load_stats().await;
    }

    async fn refresh_users(&self) {
        self.load_users().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySessionStore, RecordingNavigator, SnapshotView};
    use crate::web::session::{SessionGuard, TOKEN_KEY};
    use smartdoc_core::ports::{HttpRequest, HttpResponse, HttpTransport, PortResult, SessionStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Holds the first call until `gate` is notified, answering every call
    /// with a document list named after its call index.
    struct GatedTransport {
        calls: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl HttpTransport for GatedTransport {
        async fn send(&self, _request: HttpRequest) -> PortResult<HttpResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                self.gate.notified().await;
            }
            let body = format!(
                r#"{{"documents":[{{"id":{0},"filename":"call-{0}.txt","user_id":1,"file_type":"txt","file_size":1,"uploaded_at":"2024-01-01T00:00:00","analysis":null}}]}}"#,
                call
            );
            Ok(HttpResponse::new(200, body))
        }
    }

    #[tokio::test]
    async fn late_response_of_superseded_load_is_dropped() {
        let store = Arc::new(MemorySessionStore::default());
        store.set(TOKEN_KEY, "t").unwrap();
        let guard = SessionGuard::new(store, Arc::new(RecordingNavigator::default()));
        let transport = Arc::new(GatedTransport {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        });
        let view = Arc::new(SnapshotView::default());
        let loaders = Loaders::new(
            AuthedClient::new("http://api.test", transport.clone(), guard),
            view.clone(),
            Scope::Member,
        );

        let first = loaders.load_documents();
        let second = async {
            let outcome = loaders.load_documents().await;
            transport.gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, LoadOutcome::Stale);
        assert_eq!(second, LoadOutcome::Rendered);
        let html = view.html("documentsContainer").unwrap();
        assert!(html.contains("call-1.txt"));
        assert!(!html.contains("call-0.txt"));
    }
}
