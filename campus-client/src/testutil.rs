//! Shared fixtures for the unit tests.

use std::sync::Mutex;

use shared::policy::{self, StaffRole};

use crate::navigator::Navigator;
use crate::session::{StaffIdentity, StudentIdentity};

/// Navigator double that records every redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.routes.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

/// Unsigned token with the given `exp` claim. Only the payload matters
/// to the client; signatures are the server's concern.
pub fn make_token(exp: u64) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
    format!("{header}.{payload}.unsigned")
}

pub fn staff_identity(role: StaffRole, branch_id: Option<i64>) -> StaffIdentity {
    StaffIdentity {
        id: "11".into(),
        username: "mira".into(),
        display_name: None,
        role,
        branch_id,
        permissions: policy::permissions_for(role.as_role())
            .iter()
            .map(|permission| permission.to_string())
            .collect(),
        token: make_token(9_999_999_999),
    }
}

pub fn student_identity() -> StudentIdentity {
    StudentIdentity {
        id: "55".into(),
        username: "anna".into(),
        name: "Anna Lee".into(),
        branch_id: 3,
        token: make_token(9_999_999_999),
    }
}
