//! Fee handlers

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::FeeRepository;
use crate::security_log;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{Fee, FeeCreate, FeeStatus, FeeWithStudent, Payment, PaymentCreate};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeListQuery {
    pub status: Option<FeeStatus>,
    pub student_id: Option<i64>,
}

/// Fee plus the payment that settled (part of) it, returned from the
/// payment endpoint so the client refreshes in one round trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub fee: Fee,
    pub payment: Payment,
}

pub async fn list_fees(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Query(query): Query<FeeListQuery>,
) -> AppResult<Json<Vec<FeeWithStudent>>> {
    let fees =
        FeeRepository::list(&state.pool, actor.scope(), query.status, query.student_id).await?;
    Ok(Json(fees))
}

pub async fn get_fee(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<Fee>> {
    let fee = FeeRepository::get(&state.pool, actor.scope(), id).await?;
    Ok(Json(fee))
}

pub async fn create_fee(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Json(req): Json<FeeCreate>,
) -> AppResult<Json<Fee>> {
    let fee = FeeRepository::create(&state.pool, actor.scope(), req).await?;
    tracing::info!(id = fee.id, student = fee.student_id, amount = fee.amount_cents, "fee raised");
    Ok(Json(fee))
}

pub async fn record_payment(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
    Json(req): Json<PaymentCreate>,
) -> AppResult<Json<PaymentOutcome>> {
    let received_by: i64 = actor.id.parse().map_err(|_| AppError::invalid_token())?;
    let (fee, payment) =
        FeeRepository::record_payment(&state.pool, actor.scope(), id, req, received_by).await?;
    security_log!(
        "PAYMENT_RECORDED",
        user = %actor.username,
        fee = fee.id,
        amount = payment.amount_cents
    );
    Ok(Json(PaymentOutcome { fee, payment }))
}

pub async fn list_payments(
    State(state): State<ServerState>,
    Extension(actor): Extension<CurrentActor>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = FeeRepository::payments_for_fee(&state.pool, actor.scope(), id).await?;
    Ok(Json(payments))
}
