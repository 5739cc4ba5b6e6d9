//! Branch handlers
//!
//! Mutations are admin-only. Reads are scoped: a branch-bound actor can
//! fetch their own branch record, admins the whole directory.

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::BranchRepository;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::error::{AppError, AppResult};
use shared::models::{Branch, BranchCreate, BranchUpdate};

pub async fn list_branches(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
) -> AppResult<Json<Vec<Branch>>> {
    let branches = match actor.scope() {
        Some(branch_id) => vec![BranchRepository::get(&state.pool, branch_id).await?],
        None => BranchRepository::list(&state.pool).await?,
    };
    Ok(Json(branches))
}

pub async fn get_branch(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<Branch>> {
    if let Some(branch_id) = actor.scope() {
        if branch_id != id {
            return Err(AppError::branch_forbidden());
        }
    }
    let branch = BranchRepository::get(&state.pool, id).await?;
    Ok(Json(branch))
}

pub async fn create_branch(
    State(state): State<ServerState>,
    Json(req): Json<BranchCreate>,
) -> AppResult<Json<Branch>> {
    let branch = BranchRepository::create(&state.pool, req).await?;
    tracing::info!(id = branch.id, name = %branch.name, "branch created");
    Ok(Json(branch))
}

pub async fn update_branch(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(req): Json<BranchUpdate>,
) -> AppResult<Json<Branch>> {
    let branch = BranchRepository::update(&state.pool, id, req).await?;
    Ok(Json(branch))
}

pub async fn delete_branch(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    BranchRepository::deactivate(&state.pool, id).await?;
    tracing::info!(id, "branch deactivated");
    Ok(Json(serde_json::json!({ "id": id })))
}
