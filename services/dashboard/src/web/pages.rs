//! services/dashboard/src/web/pages.rs
//!
//! Page bootstraps. Each page is gated by the session guard, binds the
//! signed-in user's name and fires its initial loads together.

use smartdoc_core::domain::{Session, UploadFile};
use smartdoc_core::ports::{DialogService, HttpRequest, Notice, PageView};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::web::{
    fetch::AuthedClient,
    flows::{FlowOutcome, MutationFlows},
    loaders::{LoadOutcome, Loaders, Scope},
    nav::{ViewController, ADMIN_SECTIONS, MEMBER_SECTIONS},
    records::{decode, AuthEnvelope, ErrorEnvelope, LoginRequest, RegisterRequest},
    session::SessionGuard,
    state::AppState,
};

const USER_NAME_ID: &str = "userName";

fn bind_user_name(guard: &SessionGuard, view: &dyn PageView) {
    match guard.current_user() {
        Some(user) => view.set_text(USER_NAME_ID, &user.full_name),
        None => warn!("Signed in without a stored profile"),
    }
}

fn build(state: &AppState, scope: Scope) -> (SessionGuard, Arc<Loaders>, MutationFlows) {
    let client = state.client();
    let loaders = Arc::new(Loaders::new(client.clone(), state.view.clone(), scope));
    let flows = MutationFlows::new(
        scope,
        client.clone(),
        state.dialogs.clone(),
        state.view.clone(),
        loaders.clone(),
        state.config.max_upload_bytes,
        state.config.notice_delay,
    );
    (client.guard().clone(), loaders, flows)
}

//=========================================================================================
// Admin Page
//=========================================================================================

pub struct AdminPage {
    guard: SessionGuard,
    view: Arc<dyn PageView>,
    pub loaders: Arc<Loaders>,
    pub flows: MutationFlows,
    pub nav: ViewController,
}

impl AdminPage {
    pub fn new(state: &AppState) -> Self {
        let (guard, loaders, flows) = build(state, Scope::Admin);
        Self {
            guard,
            view: state.view.clone(),
            loaders,
            flows,
            nav: ViewController::new(state.view.clone(), ADMIN_SECTIONS),
        }
    }

    /// Returns `None` when the guard turned the visitor away; otherwise the
    /// outcomes of the stats, users and documents loads.
    pub async fn boot(&self) -> Option<[LoadOutcome; 3]> {
        if !self.guard.require_admin() {
            return None;
        }
        bind_user_name(&self.guard, self.view.as_ref());
        info!("Booting admin page");

        let (stats, users, documents) = futures::join!(
            self.loaders.load_stats(),
            self.loaders.load_users(),
            self.loaders.load_documents()
        );
        Some([stats, users, documents])
    }

    pub fn logout(&self) {
        self.guard.logout();
    }
}

//=========================================================================================
// Member Dashboard Page
//=========================================================================================

pub struct MemberPage {
    guard: SessionGuard,
    view: Arc<dyn PageView>,
    pub loaders: Arc<Loaders>,
    pub flows: MutationFlows,
    pub nav: ViewController,
}

impl MemberPage {
    pub fn new(state: &AppState) -> Self {
        let (guard, loaders, flows) = build(state, Scope::Member);
        Self {
            guard,
            view: state.view.clone(),
            loaders,
            flows,
            nav: ViewController::new(state.view.clone(), MEMBER_SECTIONS),
        }
    }

    /// Returns `None` when the guard turned the visitor away; otherwise the
    /// outcomes of the documents and stats loads.
    pub async fn boot(&self) -> Option<[LoadOutcome; 2]> {
        if !self.guard.require_auth() {
            return None;
        }
        bind_user_name(&self.guard, self.view.as_ref());
        info!("Booting member dashboard");

        let (documents, stats) =
            futures::join!(self.loaders.load_documents(), self.loaders.load_stats());
        Some([documents, stats])
    }

    /// A file dropped on, or picked through, the upload zone.
    pub async fn upload(&self, file: UploadFile) -> FlowOutcome {
        self.flows.upload(file).await
    }

    pub fn logout(&self) {
        self.guard.logout();
    }
}

//=========================================================================================
// Auth (Login / Register) Page
//=========================================================================================

pub struct AuthPage {
    client: AuthedClient,
    dialogs: Arc<dyn DialogService>,
}

impl AuthPage {
    pub fn new(state: &AppState) -> Self {
        Self {
            client: state.client(),
            dialogs: state.dialogs.clone(),
        }
    }

    /// Sends a visitor who is already signed in to their dashboard.
    pub fn on_load(&self) -> bool {
        self.client.guard().redirect_if_signed_in()
    }

    pub async fn login(&self, email: &str, password: &str) -> FlowOutcome {
        let body = match serde_json::to_string(&LoginRequest { email, password }) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode login request: {}", e);
                return FlowOutcome::TransportError;
            }
        };
        self.submit("/api/auth/login", body, "Login Failed", "Login failed")
            .await
    }

    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> FlowOutcome {
        let body = match serde_json::to_string(&RegisterRequest {
            email,
            password,
            full_name,
        }) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode registration request: {}", e);
                return FlowOutcome::TransportError;
            }
        };
        self.submit(
            "/api/auth/register",
            body,
            "Registration Failed",
            "Registration failed",
        )
        .await
    }

    async fn submit(&self, path: &str, body: String, title: &str, fallback: &str) -> FlowOutcome {
        let request = HttpRequest::post_json(self.client.url(path), body)
            .with_header("Content-Type", "application/json");

        let response = match self.client.send_public(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Sign-in request failed: {}", e);
                self.show_error("Error", "An error occurred").await;
                return FlowOutcome::TransportError;
            }
        };

        if !response.is_ok() {
            let text = decode::<ErrorEnvelope>(&response.body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| fallback.to_string());
            warn!("Sign-in refused ({}): {}", response.status, text);
            self.show_error(title, &text).await;
            return FlowOutcome::ServerError(text);
        }

        let session = match decode::<AuthEnvelope>(&response.body) {
            Ok(envelope) => Session {
                token: envelope.access_token,
                user: envelope.user.to_domain(),
            },
            Err(e) => {
                error!("Unreadable sign-in response: {}", e);
                self.show_error("Error", "An error occurred").await;
                return FlowOutcome::TransportError;
            }
        };

        let guard = self.client.guard();
        if let Err(e) = guard.begin_session(&session) {
            error!("Could not store session: {}", e);
            self.show_error("Error", "An error occurred").await;
            return FlowOutcome::TransportError;
        }
        guard.redirect_if_signed_in();
        FlowOutcome::Completed
    }

    async fn show_error(&self, title: &str, text: &str) {
        self.dialogs.notify(&Notice::error(title, text)).await;
    }
}
