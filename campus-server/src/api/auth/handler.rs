//! Login, identity echo, logout
//!
//! Failed logins take the same path and the same time as successful
//! ones as far as the caller can tell: one fixed delay, one unified
//! "Invalid username or password" regardless of which check failed.

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::models::verify_password;
use crate::db::repository::{StaffRepository, StudentRepository};
use crate::security_log;
use axum::extract::State;
use axum::{Extension, Json};
use shared::client::{
    LoginRequest, LoginResponse, StudentInfo, StudentLoginRequest, StudentLoginResponse, UserInfo,
};
use shared::error::{AppError, AppResult};
use shared::policy::permissions_for;
use std::time::Duration;

/// Flat response time for auth attempts, masking lookup/verify timing.
const AUTH_FIXED_DELAY_MS: u64 = 500;

pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = authenticate_staff(&state, &req).await;
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    match outcome {
        Ok(resp) => {
            security_log!("LOGIN_SUCCESS", user = %req.username, role = %resp.user.role);
            Ok(Json(resp))
        }
        Err(e) => {
            security_log!("LOGIN_FAILED", user = %req.username);
            tracing::warn!(user = %req.username, "staff login failed");
            Err(e)
        }
    }
}

async fn authenticate_staff(state: &ServerState, req: &LoginRequest) -> AppResult<LoginResponse> {
    let row = StaffRepository::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or_else(AppError::invalid_credentials)?;
    if !verify_password(&req.password, &row.password_hash) {
        return Err(AppError::invalid_credentials());
    }
    // Disabled accounts fail identically to bad passwords.
    if !row.is_active {
        return Err(AppError::invalid_credentials());
    }

    let role = row.staff_role()?.as_role();
    let permissions = permissions_for(role);
    let token =
        state
            .jwt
            .generate_staff_token(row.id, &row.username, role, row.branch_id, permissions)?;

    Ok(LoginResponse {
        token,
        user: UserInfo {
            id: row.id.to_string(),
            username: row.username,
            display_name: row.display_name,
            role,
            branch_id: row.branch_id,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        },
    })
}

pub async fn student_login(
    State(state): State<ServerState>,
    Json(req): Json<StudentLoginRequest>,
) -> AppResult<Json<StudentLoginResponse>> {
    let outcome = authenticate_student(&state, &req).await;
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    match outcome {
        Ok(resp) => {
            security_log!("STUDENT_LOGIN_SUCCESS", user = %req.username);
            Ok(Json(resp))
        }
        Err(e) => {
            security_log!("STUDENT_LOGIN_FAILED", user = %req.username);
            Err(e)
        }
    }
}

async fn authenticate_student(
    state: &ServerState,
    req: &StudentLoginRequest,
) -> AppResult<StudentLoginResponse> {
    let row = StudentRepository::find_auth(&state.pool, req.username.trim())
        .await?
        .ok_or_else(AppError::invalid_credentials)?;
    if !verify_password(&req.password, &row.password_hash) {
        return Err(AppError::invalid_credentials());
    }
    if !row.is_active {
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt
        .generate_student_token(row.id, &row.username, row.branch_id)?;
    Ok(StudentLoginResponse {
        token,
        student: StudentInfo {
            id: row.id.to_string(),
            username: row.username,
            name: row.name,
            branch_id: row.branch_id,
        },
    })
}

/// Echo the verified staff identity. The single source of truth for
/// session restore.
pub async fn me(actor: Option<Extension<CurrentActor>>) -> AppResult<Json<UserInfo>> {
    let Extension(actor) = actor.ok_or_else(AppError::unauthorized)?;
    Ok(Json(UserInfo {
        id: actor.id.clone(),
        username: actor.username.clone(),
        display_name: None,
        role: actor.role,
        branch_id: actor.branch_id,
        permissions: actor.permissions.clone(),
    }))
}

/// Tokens are stateless; logout exists for the audit trail. Clients
/// drop their stored session.
pub async fn logout(actor: Option<Extension<CurrentActor>>) -> Json<serde_json::Value> {
    if let Some(Extension(actor)) = actor {
        security_log!("LOGOUT", user = %actor.username);
    }
    Json(serde_json::json!({ "message": "Logged out" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Server;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shared::models::StaffCreate;
    use shared::policy::StaffRole;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_staff_login_and_me_round_trip() {
        let state = crate::core::ServerState::for_tests().await;
        let branch = crate::db::repository::BranchRepository::create(
            &state.pool,
            shared::models::BranchCreate {
                name: "North".into(),
                address: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        StaffRepository::create(
            &state.pool,
            StaffCreate {
                username: "mira".into(),
                password: "staffpw1".into(),
                display_name: None,
                role: StaffRole::Manager,
                branch_id: Some(branch.id),
            },
        )
        .await
        .unwrap();

        let app = Server::build_router(state);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"mira","password":"staffpw1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user"]["role"], "manager");
        assert_eq!(body["user"]["branchId"], branch.id);
        let token = body["token"].as_str().unwrap().to_string();

        let me = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
        let body = body_json(me).await;
        assert_eq!(body["username"], "mira");
        assert_eq!(body["permissions"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_failed_login_is_uniform() {
        let state = crate::core::ServerState::for_tests().await;
        let app = Server::build_router(state);

        // Unknown user and (if it existed) wrong password produce the
        // same envelope.
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"ghost","password":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], 1002);
        assert_eq!(body["message"], "Invalid username or password");
    }
}
