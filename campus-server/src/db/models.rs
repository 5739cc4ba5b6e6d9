//! Server-side row types
//!
//! Rows that carry secrets (password hashes) live here and never cross
//! into the shared wire models. Role columns stay TEXT in rows and are
//! parsed at the boundary.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::error::{AppError, AppResult};
use shared::models::StaffMember;
use shared::policy::StaffRole;

/// Staff row, including the credential hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: String,
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

impl StaffRow {
    pub fn staff_role(&self) -> AppResult<StaffRole> {
        self.role
            .parse()
            .map_err(|_| AppError::internal(format!("staff {} has invalid role", self.id)))
    }

    /// Strip the hash for wire use.
    pub fn into_member(self) -> AppResult<StaffMember> {
        let role = self.staff_role()?;
        Ok(StaffMember {
            id: self.id,
            username: self.username,
            display_name: self.display_name,
            role,
            branch_id: self.branch_id,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Student credential row for portal login.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudentAuthRow {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Argon2id hash with a fresh salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

/// Constant-time verify against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_staff_row_role_parsing() {
        let row = StaffRow {
            id: 1,
            username: "m".into(),
            password_hash: "h".into(),
            display_name: None,
            role: "manager".into(),
            branch_id: Some(1),
            is_active: true,
            created_at: 0,
        };
        assert_eq!(row.staff_role().unwrap(), StaffRole::Manager);

        let bad = StaffRow {
            role: "wizard".into(),
            ..row
        };
        assert!(bad.staff_role().is_err());
    }
}
