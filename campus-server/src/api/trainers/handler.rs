//! Trainer handlers

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::TrainerRepository;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{Trainer, TrainerCreate, TrainerUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_trainers(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Query(query): Query<TrainerListQuery>,
) -> AppResult<Json<Vec<Trainer>>> {
    let trainers =
        TrainerRepository::list(&state.pool, actor.scope(), query.include_inactive).await?;
    Ok(Json(trainers))
}

pub async fn get_trainer(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<Trainer>> {
    let trainer = TrainerRepository::get(&state.pool, actor.scope(), id).await?;
    Ok(Json(trainer))
}

pub async fn create_trainer(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Json(req): Json<TrainerCreate>,
) -> AppResult<Json<Trainer>> {
    let branch_id = crate::api::resolve_target_branch(&state.pool, &actor, req.branch_id).await?;
    let trainer = TrainerRepository::create(&state.pool, branch_id, req).await?;
    tracing::info!(id = trainer.id, branch = branch_id, "trainer added");
    Ok(Json(trainer))
}

pub async fn update_trainer(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
    Json(req): Json<TrainerUpdate>,
) -> AppResult<Json<Trainer>> {
    let trainer = TrainerRepository::update(&state.pool, actor.scope(), id, req).await?;
    Ok(Json(trainer))
}

pub async fn delete_trainer(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    TrainerRepository::deactivate(&state.pool, actor.scope(), id).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}
