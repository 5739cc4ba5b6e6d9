//! Auth wire types shared between server handlers and client gateways.
//!
//! Wire JSON uses camelCase field names.

use crate::policy::Role;
use serde::{Deserialize, Serialize};

/// Advisory identity headers attached by staff clients. The server
/// cross-checks them against the bearer token and never trusts them
/// on their own.
pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_USER_ROLE: &str = "x-user-role";
pub const HEADER_USER_BRANCH: &str = "x-user-branch";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated staff identity as returned by login and `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub role: Role,
    pub branch_id: Option<i64>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoginRequest {
    pub username: String,
    pub password: String,
}

/// Student identity for the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub branch_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoginResponse {
    pub token: String,
    pub student: StudentInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_wire_shape() {
        let user = UserInfo {
            id: "101".into(),
            username: "mira".into(),
            display_name: None,
            role: Role::Manager,
            branch_id: Some(3),
            permissions: vec!["students.read".into()],
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "manager");
        assert_eq!(json["branchId"], 3);
        assert!(json.get("displayName").is_none());
    }

    #[test]
    fn test_login_response_round_trip() {
        let body = r#"{
            "token": "t.ok.en",
            "user": {
                "id": "7",
                "username": "root",
                "role": "admin",
                "branchId": null,
                "permissions": ["*"]
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.user.role, Role::Admin);
        assert_eq!(resp.user.branch_id, None);
        assert_eq!(resp.user.permissions, vec!["*"]);
    }
}
