//! Staff account repository
//!
//! Admin-only surface. The invariant enforced here: non-admin roles
//! always carry a branch, admins never need one.

use crate::db::models::{hash_password, StaffRow};
use crate::utils::validation::{
    validate_optional_text, validate_password, validate_required_text, MAX_NAME_LEN,
    MAX_USERNAME_LEN,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{StaffCreate, StaffMember, StaffUpdate};
use shared::policy::StaffRole;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_STAFF: &str = "SELECT id, username, password_hash, display_name, role, branch_id, \
     is_active, created_at FROM staff";

pub struct StaffRepository;

impl StaffRepository {
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> AppResult<Option<StaffRow>> {
        let row = sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} WHERE username = ?1"))
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<StaffRow> {
        sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))
    }

    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} ORDER BY username"))
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(StaffRow::into_member).collect()
    }

    pub async fn create(pool: &SqlitePool, req: StaffCreate) -> AppResult<StaffMember> {
        let username = validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
        validate_password(&req.password)?;
        let display_name =
            validate_optional_text(req.display_name.as_deref(), "displayName", MAX_NAME_LEN)?;
        let branch_id = Self::check_branch_requirement(pool, req.role, req.branch_id).await?;

        if Self::find_by_username(pool, &username).await?.is_some() {
            return Err(AppError::new(ErrorCode::StaffUsernameExists));
        }

        let id = snowflake_id();
        let hash = hash_password(&req.password)?;
        sqlx::query(
            "INSERT INTO staff (id, username, password_hash, display_name, role, branch_id, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        )
        .bind(id)
        .bind(&username)
        .bind(&hash)
        .bind(&display_name)
        .bind(req.role.as_str())
        .bind(branch_id)
        .bind(now_millis())
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await?.into_member()
    }

    pub async fn update(pool: &SqlitePool, id: i64, req: StaffUpdate) -> AppResult<StaffMember> {
        let current = Self::find_by_id(pool, id).await?;

        // Role/branch move as a pair so the invariant holds mid-edit.
        let new_role = match req.role {
            Some(r) => r,
            None => current.staff_role()?,
        };
        let new_branch = match req.branch_id {
            Some(b) => Some(b),
            None => current.branch_id,
        };
        let branch_id = Self::check_branch_requirement(pool, new_role, new_branch).await?;

        let display_name =
            validate_optional_text(req.display_name.as_deref(), "displayName", MAX_NAME_LEN)?;
        let password_hash = match req.password.as_deref() {
            Some(p) => {
                validate_password(p)?;
                Some(hash_password(p)?)
            }
            None => None,
        };

        sqlx::query(
            "UPDATE staff SET \
             display_name = COALESCE(?2, display_name), \
             role = ?3, \
             branch_id = ?4, \
             password_hash = COALESCE(?5, password_hash), \
             is_active = COALESCE(?6, is_active) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(display_name)
        .bind(new_role.as_str())
        .bind(branch_id)
        .bind(password_hash)
        .bind(req.is_active)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await?.into_member()
    }

    pub async fn deactivate(pool: &SqlitePool, id: i64) -> AppResult<()> {
        Self::find_by_id(pool, id).await?;
        sqlx::query("UPDATE staff SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Admins carry no branch; everyone else needs an existing one.
    async fn check_branch_requirement(
        pool: &SqlitePool,
        role: StaffRole,
        branch_id: Option<i64>,
    ) -> AppResult<Option<i64>> {
        if role.is_admin() {
            return Ok(None);
        }
        let branch_id = branch_id.ok_or_else(|| AppError::new(ErrorCode::StaffBranchRequired))?;
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM branches WHERE id = ?1")
            .bind(branch_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::new(ErrorCode::BranchNotFound));
        }
        Ok(Some(branch_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::BranchRepository;
    use crate::db::DbService;
    use shared::models::BranchCreate;

    async fn setup() -> (SqlitePool, i64) {
        let pool = DbService::connect_memory().await.unwrap();
        let branch = BranchRepository::create(
            &pool,
            BranchCreate {
                name: "North".into(),
                address: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        (pool, branch.id)
    }

    fn staff_req(username: &str, role: StaffRole, branch_id: Option<i64>) -> StaffCreate {
        StaffCreate {
            username: username.to_string(),
            password: "staffpw1".to_string(),
            display_name: None,
            role,
            branch_id,
        }
    }

    #[tokio::test]
    async fn test_create_scoped_staff() {
        let (pool, branch) = setup().await;
        let member =
            StaffRepository::create(&pool, staff_req("mira", StaffRole::Manager, Some(branch)))
                .await
                .unwrap();
        assert_eq!(member.role, StaffRole::Manager);
        assert_eq!(member.branch_id, Some(branch));
    }

    #[tokio::test]
    async fn test_non_admin_without_branch_is_rejected() {
        let (pool, _) = setup().await;
        let err = StaffRepository::create(&pool, staff_req("mira", StaffRole::Manager, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffBranchRequired);
    }

    #[tokio::test]
    async fn test_admin_branch_is_dropped() {
        let (pool, branch) = setup().await;
        // A stray branch on an admin request is ignored, not stored.
        let member =
            StaffRepository::create(&pool, staff_req("root", StaffRole::Admin, Some(branch)))
                .await
                .unwrap();
        assert_eq!(member.branch_id, None);
    }

    #[tokio::test]
    async fn test_unknown_branch_is_rejected() {
        let (pool, _) = setup().await;
        let err = StaffRepository::create(
            &pool,
            staff_req("mira", StaffRole::Receptionist, Some(987654)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BranchNotFound);
    }

    #[tokio::test]
    async fn test_username_clash() {
        let (pool, branch) = setup().await;
        StaffRepository::create(&pool, staff_req("mira", StaffRole::Manager, Some(branch)))
            .await
            .unwrap();
        let err =
            StaffRepository::create(&pool, staff_req("mira", StaffRole::Trainer, Some(branch)))
                .await
                .unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffUsernameExists);
    }

    #[tokio::test]
    async fn test_role_change_to_admin_clears_branch() {
        let (pool, branch) = setup().await;
        let member =
            StaffRepository::create(&pool, staff_req("mira", StaffRole::Manager, Some(branch)))
                .await
                .unwrap();

        let promoted = StaffRepository::update(
            &pool,
            member.id,
            StaffUpdate {
                role: Some(StaffRole::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(promoted.role, StaffRole::Admin);
        assert_eq!(promoted.branch_id, None);
    }

    #[tokio::test]
    async fn test_demoting_admin_requires_branch() {
        let (pool, _) = setup().await;
        let admin = StaffRepository::create(&pool, staff_req("root", StaffRole::Admin, None))
            .await
            .unwrap();
        let err = StaffRepository::update(
            &pool,
            admin.id,
            StaffUpdate {
                role: Some(StaffRole::Trainer),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffBranchRequired);
    }
}
