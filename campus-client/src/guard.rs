//! Role-gated rendering decisions.
//!
//! Guards never fail loudly: every unauthorized outcome is a redirect
//! and the protected content is simply not produced. A role mismatch
//! redirects to the actor's own landing route, not to an error page.

use shared::policy::StaffRole;

use crate::navigator::Navigator;
use crate::session::{Identity, Session, StaffIdentity, StudentIdentity};

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// Before the first evaluation; nothing renders.
    #[default]
    Unauthenticated,
    /// Session present and role admitted.
    AuthorizedRender,
    /// Redirect issued; the page body is never produced.
    RedirectingUnauthorized,
}

impl GuardState {
    pub fn renders(&self) -> bool {
        matches!(self, Self::AuthorizedRender)
    }
}

/// Staff route guard with an explicit role allow-list.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed: Vec<StaffRole>,
}

impl RouteGuard {
    /// Guard admitting a single role.
    pub fn single(role: StaffRole) -> Self {
        Self {
            allowed: vec![role],
        }
    }

    /// Guard admitting any of the listed roles.
    pub fn any_of(roles: &[StaffRole]) -> Self {
        Self {
            allowed: roles.to_vec(),
        }
    }

    pub fn admits(&self, role: StaffRole) -> bool {
        self.allowed.contains(&role)
    }

    /// Decides whether the guarded page renders.
    ///
    /// No session redirects to the staff login route; a session with a
    /// role outside the allow-list redirects to that role's own landing
    /// route. Re-run on every navigation and identity change.
    pub fn evaluate(
        &self,
        session: Option<&Session<StaffIdentity>>,
        navigator: &dyn Navigator,
    ) -> GuardState {
        let Some(session) = session else {
            navigator.redirect(StaffIdentity::LOGIN_ROUTE);
            return GuardState::RedirectingUnauthorized;
        };

        if self.admits(session.identity.role) {
            GuardState::AuthorizedRender
        } else {
            navigator.redirect(session.identity.default_route());
            GuardState::RedirectingUnauthorized
        }
    }
}

/// Student portal guard.
///
/// A separate identity space: a staff session never satisfies it, and
/// its unauthenticated redirect targets the student login route, never
/// the staff landing page.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentGuard;

impl StudentGuard {
    pub fn evaluate(
        &self,
        session: Option<&Session<StudentIdentity>>,
        navigator: &dyn Navigator,
    ) -> GuardState {
        match session {
            Some(_) => GuardState::AuthorizedRender,
            None => {
                navigator.redirect(StudentIdentity::LOGIN_ROUTE);
                GuardState::RedirectingUnauthorized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{staff_identity, student_identity, RecordingNavigator};

    #[test]
    fn test_matching_role_renders() {
        let navigator = RecordingNavigator::new();
        let session = Session::new(staff_identity(StaffRole::Manager, Some(3)));

        let state = RouteGuard::single(StaffRole::Manager).evaluate(Some(&session), &navigator);

        assert_eq!(state, GuardState::AuthorizedRender);
        assert!(state.renders());
        assert!(navigator.routes().is_empty());
    }

    #[test]
    fn test_no_session_redirects_to_staff_login() {
        let navigator = RecordingNavigator::new();

        let state = RouteGuard::single(StaffRole::Manager).evaluate(None, &navigator);

        assert_eq!(state, GuardState::RedirectingUnauthorized);
        assert_eq!(navigator.routes(), vec!["/"]);
    }

    #[test]
    fn test_role_mismatch_redirects_to_own_dashboard() {
        let navigator = RecordingNavigator::new();
        let session = Session::new(staff_identity(StaffRole::Manager, Some(3)));

        // manager landing on the admin page goes home, not to an error
        let state = RouteGuard::single(StaffRole::Admin).evaluate(Some(&session), &navigator);

        assert_eq!(state, GuardState::RedirectingUnauthorized);
        assert_eq!(navigator.routes(), vec!["/dashboard/manager"]);
    }

    #[test]
    fn test_allow_list_admits_each_listed_role() {
        let guard = RouteGuard::any_of(&[StaffRole::Admin, StaffRole::Manager]);
        let navigator = RecordingNavigator::new();

        let admin = Session::new(staff_identity(StaffRole::Admin, None));
        let manager = Session::new(staff_identity(StaffRole::Manager, Some(3)));
        let trainer = Session::new(staff_identity(StaffRole::Trainer, Some(3)));

        assert_eq!(
            guard.evaluate(Some(&admin), &navigator),
            GuardState::AuthorizedRender
        );
        assert_eq!(
            guard.evaluate(Some(&manager), &navigator),
            GuardState::AuthorizedRender
        );
        assert_eq!(
            guard.evaluate(Some(&trainer), &navigator),
            GuardState::RedirectingUnauthorized
        );
        assert_eq!(navigator.routes(), vec!["/dashboard/trainer"]);
    }

    #[test]
    fn test_student_guard_redirects_to_student_login() {
        let navigator = RecordingNavigator::new();

        let state = StudentGuard.evaluate(None, &navigator);
        assert_eq!(state, GuardState::RedirectingUnauthorized);
        assert_eq!(navigator.routes(), vec!["/student/login"]);

        let session = Session::new(student_identity());
        assert_eq!(
            StudentGuard.evaluate(Some(&session), &navigator),
            GuardState::AuthorizedRender
        );
    }

    #[test]
    fn test_initial_state_renders_nothing() {
        assert_eq!(GuardState::default(), GuardState::Unauthenticated);
        assert!(!GuardState::default().renders());
    }
}
