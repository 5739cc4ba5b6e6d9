//! HTTP API
//!
//! One module per resource, each exposing `router()`. Read and write
//! routes are split so permission middleware attaches per verb group;
//! `require_auth` itself is applied globally by the server builder.

pub mod attendance;
pub mod auth;
pub mod branches;
pub mod fees;
pub mod health;
pub mod portal;
pub mod reports;
pub mod staff;
pub mod students;
pub mod trainers;

use crate::auth::CurrentActor;
use crate::db::repository::BranchRepository;
use axum::Router;
use shared::error::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::core::ServerState;

/// Resolve which branch a create lands in.
///
/// Scoped actors always write into their own branch; naming any other
/// branch is refused, not silently corrected. Admins must name one.
/// Either way the branch has to exist and be active.
pub(crate) async fn resolve_target_branch(
    pool: &SqlitePool,
    actor: &CurrentActor,
    requested: Option<i64>,
) -> AppResult<i64> {
    let branch_id = match actor.scope() {
        Some(own) => {
            if requested.is_some_and(|r| r != own) {
                return Err(AppError::branch_forbidden());
            }
            own
        }
        None => requested.ok_or_else(|| AppError::required_field("branchId"))?,
    };
    let branch = BranchRepository::get(pool, branch_id).await?;
    if !branch.is_active {
        return Err(AppError::new(ErrorCode::BranchDisabled));
    }
    Ok(branch_id)
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(students::router())
        .merge(trainers::router())
        .merge(attendance::router())
        .merge(fees::router())
        .merge(branches::router())
        .merge(staff::router())
        .merge(reports::router())
        .merge(portal::router())
}
