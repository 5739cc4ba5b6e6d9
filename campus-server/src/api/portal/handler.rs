//! Portal handlers: a student's own data, nothing else.

use crate::auth::CurrentStudent;
use crate::core::ServerState;
use crate::db::repository::{AttendanceRepository, FeeRepository, StudentRepository};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{AttendanceRecord, Student, StudentStatement};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn profile(
    State(state): State<ServerState>,
    Extension(student): Extension<CurrentStudent>,
) -> AppResult<Json<Student>> {
    let id = student.student_id()?;
    let profile = StudentRepository::get(&state.pool, None, id).await?;
    Ok(Json(profile))
}

pub async fn attendance(
    State(state): State<ServerState>,
    Extension(student): Extension<CurrentStudent>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let id = student.student_id()?;
    let records = AttendanceRepository::for_student(
        &state.pool,
        id,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await?;
    Ok(Json(records))
}

pub async fn fees(
    State(state): State<ServerState>,
    Extension(student): Extension<CurrentStudent>,
) -> AppResult<Json<StudentStatement>> {
    let id = student.student_id()?;
    let statement = FeeRepository::statement_for_student(&state.pool, id).await?;
    Ok(Json(statement))
}
