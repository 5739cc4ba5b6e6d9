//! Trainer entity and DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    /// Admin-only; scoped actors always create in their own branch.
    pub branch_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub is_active: Option<bool>,
}
