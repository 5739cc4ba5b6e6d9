//! Client-side identity and session types.
//!
//! Staff and students live in separate identity spaces: separate
//! storage keys, separate login routes, separate token types. The
//! [`Identity`] trait captures the per-space differences so the
//! session store and auth service stay generic over both.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::client::{LoginResponse, StudentLoginResponse};
use shared::policy::{self, Role, StaffRole, STAFF_LOGIN_ROUTE, STUDENT_LOGIN_ROUTE};
use thiserror::Error;

use crate::http::AuthContext;

/// Which identity space a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Staff,
    Student,
}

/// Shape problems in a stored or freshly returned identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("not a staff role")]
    NotStaff,
}

/// A persistable identity.
///
/// The associated constants drive the generic session store: which
/// storage key holds the blob, which mirror entries sit beside it,
/// what gets swept on logout, and where to land after teardown.
pub trait Identity: Serialize + DeserializeOwned + Clone + Send + Sync {
    const KIND: SessionKind;
    /// Storage key holding the serialized session.
    const PRIMARY_KEY: &'static str;
    /// Login route to land on after logout or a 401.
    const LOGIN_ROUTE: &'static str;

    fn id(&self) -> &str;
    fn token(&self) -> &str;

    /// Shape check applied on load and before persisting.
    fn validate(&self) -> Result<(), SessionError>;

    /// Convenience entries mirrored beside the session blob.
    fn side_entries(&self) -> Vec<(&'static str, String)>;

    /// Keys removed on logout, in addition to the namespace sweep.
    fn clear_keys() -> &'static [&'static str];

    /// Cache key prefix owned by this identity, swept on logout.
    fn cache_namespace() -> Option<&'static str>;

    /// Request identity attached to the HTTP gateway for this session.
    fn auth_context(&self) -> AuthContext;
}

/// Authenticated staff member as held on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffIdentity {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub role: StaffRole,
    pub branch_id: Option<i64>,
    pub permissions: Vec<String>,
    pub token: String,
}

impl StaffIdentity {
    /// Builds the identity from a login response, rejecting student
    /// roles and incomplete payloads. Nothing is persisted here.
    pub fn from_login(response: LoginResponse) -> Result<Self, SessionError> {
        let role = StaffRole::try_from(response.user.role).map_err(|_| SessionError::NotStaff)?;
        let identity = Self {
            id: response.user.id,
            username: response.user.username,
            display_name: response.user.display_name,
            role,
            branch_id: response.user.branch_id,
            permissions: response.user.permissions,
            token: response.token,
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Landing route for this staff member's role.
    pub fn default_route(&self) -> &'static str {
        policy::default_route_for(self.role.as_role())
    }

    /// Permission check over the granted set, mirroring the server's
    /// wildcard rule: exact match or `"*"`, never prefix matching.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|granted| granted == policy::WILDCARD || granted == permission)
    }
}

impl Identity for StaffIdentity {
    const KIND: SessionKind = SessionKind::Staff;
    const PRIMARY_KEY: &'static str = "user";
    const LOGIN_ROUTE: &'static str = STAFF_LOGIN_ROUTE;

    fn id(&self) -> &str {
        &self.id
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.id.trim().is_empty() {
            return Err(SessionError::MissingField("id"));
        }
        if self.token.trim().is_empty() {
            return Err(SessionError::MissingField("token"));
        }
        // Non-admin staff always belong to exactly one branch.
        if self.role != StaffRole::Admin && self.branch_id.is_none() {
            return Err(SessionError::MissingField("branchId"));
        }
        Ok(())
    }

    fn side_entries(&self) -> Vec<(&'static str, String)> {
        vec![("userRole", self.role.as_str().to_string())]
    }

    fn clear_keys() -> &'static [&'static str] {
        &["user", "userRole"]
    }

    fn cache_namespace() -> Option<&'static str> {
        None
    }

    fn auth_context(&self) -> AuthContext {
        AuthContext::staff(
            &self.token,
            &self.id,
            self.role.as_str(),
            self.branch_id,
        )
    }
}

/// Authenticated student as held by the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentIdentity {
    pub id: String,
    pub username: String,
    pub name: String,
    pub branch_id: i64,
    pub token: String,
}

impl StudentIdentity {
    pub fn from_login(response: StudentLoginResponse) -> Result<Self, SessionError> {
        let identity = Self {
            id: response.student.id,
            username: response.student.username,
            name: response.student.name,
            branch_id: response.student.branch_id,
            token: response.token,
        };
        identity.validate()?;
        Ok(identity)
    }

    pub fn default_route(&self) -> &'static str {
        policy::default_route_for(Role::Student)
    }
}

impl Identity for StudentIdentity {
    const KIND: SessionKind = SessionKind::Student;
    const PRIMARY_KEY: &'static str = "student";
    const LOGIN_ROUTE: &'static str = STUDENT_LOGIN_ROUTE;

    fn id(&self) -> &str {
        &self.id
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.id.trim().is_empty() {
            return Err(SessionError::MissingField("id"));
        }
        if self.token.trim().is_empty() {
            return Err(SessionError::MissingField("token"));
        }
        Ok(())
    }

    fn side_entries(&self) -> Vec<(&'static str, String)> {
        vec![("studentToken", self.token.clone())]
    }

    fn clear_keys() -> &'static [&'static str] {
        &["student", "studentToken"]
    }

    fn cache_namespace() -> Option<&'static str> {
        Some("student:")
    }

    fn auth_context(&self) -> AuthContext {
        // Students send only the bearer token; identity headers are a
        // staff-flow convention.
        AuthContext::bearer(&self.token)
    }
}

/// A live session: the validated identity plus when it was established.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session<I> {
    pub identity: I,
    /// Unix seconds at session creation.
    pub issued_at: u64,
}

impl<I: Identity> Session<I> {
    pub fn new(identity: I) -> Self {
        Self {
            identity,
            issued_at: unix_now(),
        }
    }

    /// True when the embedded token carries an `exp` claim in the past.
    /// Tokens without a readable `exp` are left for the server to judge.
    pub fn is_expired(&self) -> bool {
        match parse_jwt_exp(self.identity.token()) {
            Some(exp) => exp <= unix_now(),
            None => false,
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Reads the `exp` claim out of a JWT payload without verifying the
/// signature. Verification is the server's job; this only decides
/// whether a cached token is worth presenting at all.
pub fn parse_jwt_exp(token: &str) -> Option<u64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
    payload.get("exp")?.as_u64()
}
