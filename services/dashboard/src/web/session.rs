//! services/dashboard/src/web/session.rs
//!
//! The session/auth guard: reads the bearer token and user profile from
//! client storage and gates pages on them. Everything here is synchronous and
//! never touches the network.

use smartdoc_core::domain::{Route, Session, UserProfile};
use smartdoc_core::ports::{Navigator, PortError, PortResult, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

use crate::web::records::UserRecord;

/// Storage key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read token from storage: {}", e);
                None
            }
        }
    }

    /// The stored profile, or `None` when it is missing or unreadable.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = match self.store.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read user profile from storage: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(record) => Some(record.to_domain()),
            Err(e) => {
                warn!("Stored user profile is not valid JSON: {}", e);
                None
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user: self.current_user()?,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|u| u.is_admin).unwrap_or(false)
    }

    /// Returns `false` after redirecting to the login page when nobody is
    /// signed in. Callers must stop on `false`.
    pub fn require_auth(&self) -> bool {
        if !self.is_authenticated() {
            info!("No session, redirecting to login");
            self.navigator.navigate(Route::Login);
            return false;
        }
        true
    }

    pub fn require_admin(&self) -> bool {
        if !self.is_authenticated() || !self.is_admin() {
            info!("Admin page requested without an admin session, redirecting to login");
            self.navigator.navigate(Route::Login);
            return false;
        }
        true
    }

    /// Clears both keys and goes to the login page. Safe to repeat.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }
        info!("Session cleared");
        self.navigator.navigate(Route::Login);
    }

    /// Persists a fresh session. Both keys are written or neither is.
    pub fn begin_session(&self, session: &Session) -> PortResult<()> {
        let user_json = serde_json::to_string(&UserRecord::from_domain(&session.user))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.store.set(TOKEN_KEY, &session.token)?;
        if let Err(e) = self.store.set(USER_KEY, &user_json) {
            if let Err(rollback) = self.store.remove(TOKEN_KEY) {
                warn!("Could not roll back token after failed profile write: {}", rollback);
            }
            return Err(e);
        }
        info!("Session started for user {}", session.user.id);
        Ok(())
    }

    /// The page a signed-in user belongs on.
    pub fn home_route(&self) -> Route {
        if self.is_admin() {
            Route::Admin
        } else {
            Route::Dashboard
        }
    }

    /// On the login page, sends an already signed-in visitor to their home
    /// page. Returns whether it navigated.
    pub fn redirect_if_signed_in(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.navigator.navigate(self.home_route());
        true
    }
}
