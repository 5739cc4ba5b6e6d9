//! Student handlers
//!
//! The scope always comes from the authenticated actor. Query and body
//! parameters never widen what an actor can see or touch.

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::StudentRepository;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use shared::error::AppResult;
use shared::models::{Student, StudentCreate, StudentQuery, StudentUpdate};

pub async fn list_students(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<Vec<Student>>> {
    let students = StudentRepository::list(&state.pool, actor.scope(), &query).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<Student>> {
    let student = StudentRepository::get(&state.pool, actor.scope(), id).await?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Json(req): Json<StudentCreate>,
) -> AppResult<Json<Student>> {
    let branch_id = crate::api::resolve_target_branch(&state.pool, &actor, req.branch_id).await?;
    let student = StudentRepository::create(&state.pool, branch_id, req).await?;
    tracing::info!(id = student.id, branch = branch_id, "student registered");
    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
    Json(req): Json<StudentUpdate>,
) -> AppResult<Json<Student>> {
    let student = StudentRepository::update(&state.pool, actor.scope(), id, req).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    StudentRepository::deactivate(&state.pool, actor.scope(), id).await?;
    tracing::info!(id, "student deactivated");
    Ok(Json(serde_json::json!({ "id": id })))
}
