//! Request authentication middleware
//!
//! `require_auth` runs on every `/api` request: it validates the bearer
//! token, cross-checks the identity headers against it, and stores the
//! resulting identity in request extensions. Route-level guards
//! (`require_permission`, `require_admin`, `require_student`) only look
//! at extensions and never re-parse the token.
//!
//! Identity headers (`x-user-id`, `x-user-role`, `x-user-branch`) are
//! advisory, never authoritative: a missing header is fine, a header
//! that disagrees with the verified token is a 401.

use crate::auth::jwt::{CurrentActor, CurrentStudent, JwtService, TOKEN_TYPE_STUDENT};
use crate::core::ServerState;
use crate::security_log;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use shared::error::{AppError, AppResult};

pub use shared::client::{HEADER_USER_BRANCH, HEADER_USER_ID, HEADER_USER_ROLE};

/// Routes reachable without a token.
const PUBLIC_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/student/login", "/api/health"];

fn is_public(path: &str) -> bool {
    !path.starts_with("/api") || PUBLIC_ROUTES.contains(&path)
}

pub async fn require_auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    // CORS preflights and non-API paths pass through untouched.
    if request.method() == Method::OPTIONS || is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let path = request.uri().path().to_string();
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match JwtService::extract_from_header(auth_header) {
        Ok(t) => t,
        Err(e) => {
            security_log!("MISSING_TOKEN", path = %path);
            return Err(e);
        }
    };

    let claims = match state.jwt.validate_token(token) {
        Ok(c) => c,
        Err(e) => {
            security_log!("INVALID_TOKEN", path = %path, code = e.code.code());
            return Err(e);
        }
    };

    if claims.token_type == TOKEN_TYPE_STUDENT {
        let student = CurrentStudent::try_from(claims)?;
        request.extensions_mut().insert(student);
        return Ok(next.run(request).await);
    }

    let actor = CurrentActor::try_from(claims)?;
    if let Err(e) = check_identity_headers(&request, &actor) {
        security_log!(
            "IDENTITY_MISMATCH",
            path = %path,
            user = %actor.username,
            "identity headers disagree with token"
        );
        return Err(e);
    }
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Compare any identity headers the client sent against the verified
/// token. Absent headers are not checked.
fn check_identity_headers(request: &Request, actor: &CurrentActor) -> AppResult<()> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };

    if let Some(id) = header(HEADER_USER_ID) {
        if id != actor.id {
            return Err(AppError::identity_mismatch());
        }
    }
    if let Some(role) = header(HEADER_USER_ROLE) {
        if role != actor.role.as_str() {
            return Err(AppError::identity_mismatch());
        }
    }
    if let Some(branch) = header(HEADER_USER_BRANCH) {
        let claimed = actor.branch_id.map(|b| b.to_string());
        if claimed.as_deref() != Some(branch) {
            return Err(AppError::identity_mismatch());
        }
    }
    Ok(())
}

/// Gate a route on a single permission.
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn Future<Output = AppResult<Response>> + Send>>
+ Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let actor = request
                .extensions()
                .get::<CurrentActor>()
                .ok_or_else(AppError::unauthorized)?;
            if !actor.has_permission(permission) {
                security_log!(
                    "PERMISSION_DENIED",
                    user = %actor.username,
                    permission = permission
                );
                return Err(AppError::permission_denied(permission));
            }
            Ok(next.run(request).await)
        })
    }
}

/// Any staff identity, no specific permission.
pub async fn require_staff(request: Request, next: Next) -> AppResult<Response> {
    if request.extensions().get::<CurrentActor>().is_none() {
        return Err(AppError::unauthorized());
    }
    Ok(next.run(request).await)
}

/// Admin-only routes.
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    let actor = request
        .extensions()
        .get::<CurrentActor>()
        .ok_or_else(AppError::unauthorized)?;
    if !actor.is_admin() {
        security_log!("ADMIN_REQUIRED", user = %actor.username);
        return Err(AppError::admin_required());
    }
    Ok(next.run(request).await)
}

/// Portal routes: a student token is required, a staff token is not an
/// acceptable substitute.
pub async fn require_student(request: Request, next: Next) -> AppResult<Response> {
    if request.extensions().get::<CurrentStudent>().is_none() {
        security_log!("STUDENT_TOKEN_REQUIRED", path = %request.uri().path());
        return Err(AppError::unauthorized());
    }
    Ok(next.run(request).await)
}
