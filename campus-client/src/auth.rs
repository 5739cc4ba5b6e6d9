//! Login, session restore, and teardown orchestration.
//!
//! One `AuthService` per identity space ties the gateway, the session
//! store, and the navigator together. All failure paths leave storage
//! untouched or fully cleared; there is no partial state.

use std::sync::Arc;

use crate::error::ClientResult;
use crate::http::ApiGateway;
use crate::navigator::Navigator;
use crate::session::{Identity, Session, StaffIdentity, StudentIdentity};
use crate::store::SessionStore;

pub struct AuthService<I: Identity> {
    gateway: Arc<dyn ApiGateway>,
    store: SessionStore<I>,
    navigator: Arc<dyn Navigator>,
}

impl<I: Identity> AuthService<I> {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        store: SessionStore<I>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            gateway,
            store,
            navigator,
        }
    }

    pub fn store(&self) -> &SessionStore<I> {
        &self.store
    }

    /// Restores a persisted session at startup and re-attaches its
    /// identity to the gateway. Unusable stored state reads as logged
    /// out.
    pub fn restore(&self) -> Option<Session<I>> {
        let session = self.store.load()?;
        self.gateway.set_auth(session.identity.auth_context());
        Some(session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Ends the session: best-effort server notification, full local
    /// teardown, then the login route. Safe to call when already
    /// logged out.
    pub async fn logout(&self) {
        if self.store.is_authenticated() {
            if let Err(err) = self.gateway.logout().await {
                tracing::debug!(error = %err, "Logout request failed, clearing locally");
            }
        }
        self.gateway.clear_auth();
        self.store.clear();
        self.navigator.redirect(I::LOGIN_ROUTE);
    }

    /// 401 handler: the server no longer honors the session, so drop
    /// it locally and land on the login route.
    pub fn handle_unauthorized(&self) {
        self.gateway.clear_auth();
        self.store.clear();
        self.navigator.redirect(I::LOGIN_ROUTE);
    }

    fn establish(&self, identity: I) -> ClientResult<Session<I>> {
        let session = Session::new(identity);
        self.store.save(&session)?;
        self.gateway.set_auth(session.identity.auth_context());
        Ok(session)
    }
}

impl AuthService<StaffIdentity> {
    /// Staff login: authenticate, validate the returned identity,
    /// persist it, then land on the role's own dashboard. On any
    /// failure nothing is persisted.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<Session<StaffIdentity>> {
        let response = self.gateway.login(username, password).await?;
        let identity = StaffIdentity::from_login(response)?;
        let session = self.establish(identity)?;
        self.navigator.redirect(session.identity.default_route());
        Ok(session)
    }
}

impl AuthService<StudentIdentity> {
    /// Student login, landing on the portal.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<Session<StudentIdentity>> {
        let response = self.gateway.student_login(username, password).await?;
        let identity = StudentIdentity::from_login(response)?;
        let session = self.establish(identity)?;
        self.navigator.redirect(session.identity.default_route());
        Ok(session)
    }
}
