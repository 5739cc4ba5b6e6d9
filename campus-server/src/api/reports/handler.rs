//! Report handlers

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::report::{BranchBreakdown, DashboardSummary};
use crate::db::repository::ReportRepository;
use crate::utils::time::{current_month_bounds_millis, today_string};
use axum::extract::State;
use axum::{Extension, Json};
use shared::error::AppResult;

pub async fn dashboard(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
) -> AppResult<Json<DashboardSummary>> {
    let summary = ReportRepository::dashboard(
        &state.pool,
        actor.scope(),
        &today_string(),
        current_month_bounds_millis(),
    )
    .await?;
    Ok(Json(summary))
}

pub async fn branch_breakdown(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<BranchBreakdown>>> {
    let breakdown = ReportRepository::branch_breakdown(&state.pool).await?;
    Ok(Json(breakdown))
}
