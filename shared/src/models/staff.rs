//! Staff account DTOs
//!
//! Wire-facing only: the password hash never leaves the server's row
//! type, so there is no `FromRow` here.

use crate::policy::StaffRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub role: StaffRole,
    /// `None` for admins (global scope), required otherwise.
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: StaffRole,
    pub branch_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub display_name: Option<String>,
    pub role: Option<StaffRole>,
    pub branch_id: Option<i64>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}
