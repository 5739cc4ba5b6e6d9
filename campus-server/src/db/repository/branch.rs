//! Branch repository
//!
//! Branches are the scoping unit for everything else, so they are not
//! themselves branch-scoped: admins manage them, scoped staff may read
//! the list (names for display).

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Branch, BranchCreate, BranchUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_BRANCH: &str =
    "SELECT id, name, address, phone, is_active, created_at FROM branches";

pub struct BranchRepository;

impl BranchRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(&format!("{SELECT_BRANCH} ORDER BY name"))
            .fetch_all(pool)
            .await?;
        Ok(branches)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<Branch> {
        sqlx::query_as::<_, Branch>(&format!("{SELECT_BRANCH} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BranchNotFound))
    }

    pub async fn create(pool: &SqlitePool, req: BranchCreate) -> AppResult<Branch> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::required_field("name"));
        }
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM branches WHERE name = ?1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            return Err(AppError::new(ErrorCode::BranchNameExists));
        }

        let id = snowflake_id();
        sqlx::query(
            "INSERT INTO branches (id, name, address, phone, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        )
        .bind(id)
        .bind(name)
        .bind(&req.address)
        .bind(&req.phone)
        .bind(now_millis())
        .execute(pool)
        .await?;

        Self::get(pool, id).await
    }

    pub async fn update(pool: &SqlitePool, id: i64, req: BranchUpdate) -> AppResult<Branch> {
        // Existence first, for a precise error.
        Self::get(pool, id).await?;

        if let Some(name) = req.name.as_deref().map(str::trim) {
            if name.is_empty() {
                return Err(AppError::required_field("name"));
            }
            let clash: Option<i64> =
                sqlx::query_scalar("SELECT id FROM branches WHERE name = ?1 AND id != ?2")
                    .bind(name)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
            if clash.is_some() {
                return Err(AppError::new(ErrorCode::BranchNameExists));
            }
        }

        sqlx::query(
            "UPDATE branches SET \
             name = COALESCE(?2, name), \
             address = COALESCE(?3, address), \
             phone = COALESCE(?4, phone), \
             is_active = COALESCE(?5, is_active) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(&req.address)
        .bind(&req.phone)
        .bind(req.is_active)
        .execute(pool)
        .await?;

        Self::get(pool, id).await
    }

    /// Deactivate a branch. Refused while it still has active students.
    pub async fn deactivate(pool: &SqlitePool, id: i64) -> AppResult<()> {
        Self::get(pool, id).await?;

        let active_students: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE branch_id = ?1 AND is_active = 1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        if active_students > 0 {
            return Err(
                AppError::new(ErrorCode::BranchHasStudents).with_detail("students", active_students)
            );
        }

        sqlx::query("UPDATE branches SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn branch_req(name: &str) -> BranchCreate {
        BranchCreate {
            name: name.to_string(),
            address: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = DbService::connect_memory().await.unwrap();
        let branch = BranchRepository::create(&pool, branch_req("North")).await.unwrap();
        assert_eq!(branch.name, "North");
        assert!(branch.is_active);

        let fetched = BranchRepository::get(&pool, branch.id).await.unwrap();
        assert_eq!(fetched, branch);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let pool = DbService::connect_memory().await.unwrap();
        BranchRepository::create(&pool, branch_req("North")).await.unwrap();
        let err = BranchRepository::create(&pool, branch_req("North"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BranchNameExists);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let pool = DbService::connect_memory().await.unwrap();
        let branch = BranchRepository::create(&pool, branch_req("North")).await.unwrap();
        let updated = BranchRepository::update(
            &pool,
            branch.id,
            BranchUpdate {
                phone: Some("555-0101".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "North");
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));
    }

    #[tokio::test]
    async fn test_get_missing_is_branch_not_found() {
        let pool = DbService::connect_memory().await.unwrap();
        let err = BranchRepository::get(&pool, 12345).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BranchNotFound);
    }

    #[tokio::test]
    async fn test_deactivate_empty_branch() {
        let pool = DbService::connect_memory().await.unwrap();
        let branch = BranchRepository::create(&pool, branch_req("South")).await.unwrap();
        BranchRepository::deactivate(&pool, branch.id).await.unwrap();
        let fetched = BranchRepository::get(&pool, branch.id).await.unwrap();
        assert!(!fetched.is_active);
    }
}
