//! Student entity and DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    /// Portal login name, unique across branches.
    pub username: String,
    pub phone: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    /// Enrollment date, `YYYY-MM-DD`.
    pub enrolled_on: String,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreate {
    pub name: String,
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    pub enrolled_on: String,
    /// Ignored for branch-scoped actors (their own branch is used);
    /// required for admins.
    pub branch_id: Option<i64>,
    /// Set to register despite a name+phone duplicate warning.
    #[serde(default)]
    pub allow_duplicate: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// List filters; everything optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    /// Matches name, username, or phone as a substring.
    pub q: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}
