//! Trainer repository

use crate::utils::validation::{
    validate_email_format, validate_optional_text, validate_required_text, MAX_NAME_LEN,
    MAX_TEXT_LEN,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Trainer, TrainerCreate, TrainerUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_TRAINER: &str =
    "SELECT id, branch_id, name, phone, email, specialty, is_active, created_at FROM trainers";

pub struct TrainerRepository;

impl TrainerRepository {
    pub async fn list(
        pool: &SqlitePool,
        scope: Option<i64>,
        include_inactive: bool,
    ) -> AppResult<Vec<Trainer>> {
        let sql = format!(
            "{SELECT_TRAINER} \
             WHERE (?1 IS NULL OR branch_id = ?1) AND (?2 = 1 OR is_active = 1) \
             ORDER BY name"
        );
        let trainers = sqlx::query_as::<_, Trainer>(&sql)
            .bind(scope)
            .bind(include_inactive)
            .fetch_all(pool)
            .await?;
        Ok(trainers)
    }

    pub async fn get(pool: &SqlitePool, scope: Option<i64>, id: i64) -> AppResult<Trainer> {
        let sql = format!("{SELECT_TRAINER} WHERE id = ?1 AND (?2 IS NULL OR branch_id = ?2)");
        sqlx::query_as::<_, Trainer>(&sql)
            .bind(id)
            .bind(scope)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TrainerNotFound))
    }

    pub async fn create(
        pool: &SqlitePool,
        branch_id: i64,
        req: TrainerCreate,
    ) -> AppResult<Trainer> {
        let name = validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        let phone = validate_optional_text(req.phone.as_deref(), "phone", MAX_TEXT_LEN)?;
        let email = validate_email_format(req.email.as_deref())?;
        let specialty = validate_optional_text(req.specialty.as_deref(), "specialty", MAX_TEXT_LEN)?;

        let id = snowflake_id();
        sqlx::query(
            "INSERT INTO trainers (id, branch_id, name, phone, email, specialty, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        )
        .bind(id)
        .bind(branch_id)
        .bind(&name)
        .bind(&phone)
        .bind(&email)
        .bind(&specialty)
        .bind(now_millis())
        .execute(pool)
        .await?;

        Self::get(pool, None, id).await
    }

    pub async fn update(
        pool: &SqlitePool,
        scope: Option<i64>,
        id: i64,
        req: TrainerUpdate,
    ) -> AppResult<Trainer> {
        Self::get(pool, scope, id).await?;

        let name = match req.name.as_deref() {
            Some(n) => Some(validate_required_text(n, "name", MAX_NAME_LEN)?),
            None => None,
        };
        let email = match req.email.as_deref() {
            Some(_) => validate_email_format(req.email.as_deref())?,
            None => None,
        };

        sqlx::query(
            "UPDATE trainers SET \
             name = COALESCE(?2, name), \
             phone = COALESCE(?3, phone), \
             email = COALESCE(?4, email), \
             specialty = COALESCE(?5, specialty), \
             is_active = COALESCE(?6, is_active) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(&req.phone)
        .bind(email)
        .bind(&req.specialty)
        .bind(req.is_active)
        .execute(pool)
        .await?;

        Self::get(pool, scope, id).await
    }

    pub async fn deactivate(pool: &SqlitePool, scope: Option<i64>, id: i64) -> AppResult<()> {
        Self::get(pool, scope, id).await?;
        sqlx::query("UPDATE trainers SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
