//! Staff account handlers (admin surface)

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::StaffRepository;
use crate::security_log;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{StaffCreate, StaffMember, StaffUpdate};

pub async fn list_staff(State(state): State<ServerState>) -> AppResult<Json<Vec<StaffMember>>> {
    let staff = StaffRepository::list(&state.pool).await?;
    Ok(Json(staff))
}

pub async fn create_staff(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Json(req): Json<StaffCreate>,
) -> AppResult<Json<StaffMember>> {
    let member = StaffRepository::create(&state.pool, req).await?;
    security_log!(
        "STAFF_CREATED",
        by = %actor.username,
        account = %member.username,
        role = %member.role
    );
    Ok(Json(member))
}

pub async fn update_staff(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
    Json(req): Json<StaffUpdate>,
) -> AppResult<Json<StaffMember>> {
    // Deactivating yourself goes through delete, which refuses; the
    // same rule applies to an is_active edit.
    if actor.id == id.to_string() && req.is_active == Some(false) {
        return Err(AppError::new(ErrorCode::StaffCannotDeleteSelf));
    }
    let member = StaffRepository::update(&state.pool, id, req).await?;
    security_log!("STAFF_UPDATED", by = %actor.username, account = %member.username);
    Ok(Json(member))
}

pub async fn delete_staff(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    if actor.id == id.to_string() {
        return Err(AppError::new(ErrorCode::StaffCannotDeleteSelf));
    }
    StaffRepository::deactivate(&state.pool, id).await?;
    security_log!("STAFF_DEACTIVATED", by = %actor.username, id = id);
    Ok(Json(serde_json::json!({ "id": id })))
}
