//! Attendance handlers

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::AttendanceRepository;
use crate::utils::time::{is_future, parse_date};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AttendanceQuery, AttendanceRecord, AttendanceWithStudent, MarkAttendanceRequest};

pub async fn list_attendance(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceWithStudent>>> {
    let records = AttendanceRepository::list(&state.pool, actor.scope(), &query).await?;
    Ok(Json(records))
}

/// Mark or correct a student's attendance for one date.
pub async fn mark_attendance(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Json(req): Json<MarkAttendanceRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let date = parse_date(&req.date)?;
    if is_future(date) {
        return Err(AppError::new(ErrorCode::AttendanceDateInFuture));
    }
    let marked_by: i64 = actor.id.parse().map_err(|_| AppError::invalid_token())?;

    let record = AttendanceRepository::mark(&state.pool, actor.scope(), marked_by, &req).await?;
    tracing::debug!(
        student = record.student_id,
        date = %record.date,
        status = %record.status,
        "attendance marked"
    );
    Ok(Json(record))
}
