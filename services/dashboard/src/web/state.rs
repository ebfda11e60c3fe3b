//! services/dashboard/src/web/state.rs
//!
//! Defines the shared state every page is built from.

use crate::config::Config;
use crate::web::{fetch::AuthedClient, session::SessionGuard};
use smartdoc_core::ports::{DialogService, HttpTransport, Navigator, PageView, SessionStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Pages)
//=========================================================================================

/// The ports and configuration a page needs, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub dialogs: Arc<dyn DialogService>,
    pub view: Arc<dyn PageView>,
    pub transport: Arc<dyn HttpTransport>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store.clone(), self.navigator.clone())
    }

    pub fn client(&self) -> AuthedClient {
        AuthedClient::new(&self.config.api_url, self.transport.clone(), self.guard())
    }
}
