//! Student repository
//!
//! All reads and writes are scope-aware. A `Some(branch)` scope makes
//! students of other branches indistinguishable from nonexistent ones.

use crate::db::models::{hash_password, StudentAuthRow};
use crate::utils::validation::{
    normalize_name, normalize_phone, validate_email_format, validate_optional_text,
    validate_password, validate_required_text, MAX_NAME_LEN, MAX_TEXT_LEN, MAX_USERNAME_LEN,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Student, StudentCreate, StudentQuery, StudentUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_STUDENT: &str = "SELECT id, branch_id, name, username, phone, guardian_phone, \
     email, enrolled_on, is_active, created_at FROM students";

pub struct StudentRepository;

impl StudentRepository {
    pub async fn list(
        pool: &SqlitePool,
        scope: Option<i64>,
        query: &StudentQuery,
    ) -> AppResult<Vec<Student>> {
        let pattern = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{q}%"));
        let sql = format!(
            "{SELECT_STUDENT} \
             WHERE (?1 IS NULL OR branch_id = ?1) \
             AND (?2 IS NULL OR name LIKE ?2 OR username LIKE ?2 OR phone LIKE ?2) \
             AND (?3 = 1 OR is_active = 1) \
             ORDER BY name"
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(scope)
            .bind(pattern)
            .bind(query.include_inactive)
            .fetch_all(pool)
            .await?;
        Ok(students)
    }

    pub async fn get(pool: &SqlitePool, scope: Option<i64>, id: i64) -> AppResult<Student> {
        let sql = format!("{SELECT_STUDENT} WHERE id = ?1 AND (?2 IS NULL OR branch_id = ?2)");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(scope)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StudentNotFound))
    }

    /// Register a student in `branch_id`.
    ///
    /// Duplicate detection compares normalized name + phone within the
    /// branch and refuses unless `allow_duplicate` is set; the portal
    /// username must be unique system-wide.
    pub async fn create(
        pool: &SqlitePool,
        branch_id: i64,
        req: StudentCreate,
    ) -> AppResult<Student> {
        let name = validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        let username = validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
        validate_password(&req.password)?;
        let phone = validate_optional_text(req.phone.as_deref(), "phone", MAX_TEXT_LEN)?;
        let guardian_phone =
            validate_optional_text(req.guardian_phone.as_deref(), "guardianPhone", MAX_TEXT_LEN)?;
        let email = validate_email_format(req.email.as_deref())?;
        crate::utils::time::parse_date(&req.enrolled_on)?;

        let username_taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM students WHERE username = ?1")
                .bind(&username)
                .fetch_optional(pool)
                .await?;
        if username_taken.is_some() {
            return Err(AppError::new(ErrorCode::StudentUsernameExists));
        }

        if !req.allow_duplicate {
            if let Some(existing) = Self::find_duplicate(pool, branch_id, &name, phone.as_deref())
                .await?
            {
                return Err(AppError::duplicate_student().with_detail("existingId", existing));
            }
        }

        let id = snowflake_id();
        let hash = hash_password(&req.password)?;
        sqlx::query(
            "INSERT INTO students \
             (id, branch_id, name, username, password_hash, phone, guardian_phone, email, \
              enrolled_on, is_active, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
        )
        .bind(id)
        .bind(branch_id)
        .bind(&name)
        .bind(&username)
        .bind(&hash)
        .bind(&phone)
        .bind(&guardian_phone)
        .bind(&email)
        .bind(req.enrolled_on.trim())
        .bind(now_millis())
        .execute(pool)
        .await?;

        Self::get(pool, None, id).await
    }

    /// Active student in the branch whose normalized name and phone both
    /// match, if any.
    async fn find_duplicate(
        pool: &SqlitePool,
        branch_id: i64,
        name: &str,
        phone: Option<&str>,
    ) -> AppResult<Option<i64>> {
        let candidates: Vec<(i64, String, Option<String>)> = sqlx::query_as(
            "SELECT id, name, phone FROM students WHERE branch_id = ?1 AND is_active = 1",
        )
        .bind(branch_id)
        .fetch_all(pool)
        .await?;

        let target_name = normalize_name(name);
        let target_phone = phone.map(normalize_phone).unwrap_or_default();
        Ok(candidates
            .into_iter()
            .find(|(_, n, p)| {
                normalize_name(n) == target_name
                    && p.as_deref().map(normalize_phone).unwrap_or_default() == target_phone
            })
            .map(|(id, _, _)| id))
    }

    pub async fn update(
        pool: &SqlitePool,
        scope: Option<i64>,
        id: i64,
        req: StudentUpdate,
    ) -> AppResult<Student> {
        Self::get(pool, scope, id).await?;

        let name = match req.name.as_deref() {
            Some(n) => Some(validate_required_text(n, "name", MAX_NAME_LEN)?),
            None => None,
        };
        let email = match req.email.as_deref() {
            Some(_) => validate_email_format(req.email.as_deref())?,
            None => None,
        };
        let password_hash = match req.password.as_deref() {
            Some(p) => {
                validate_password(p)?;
                Some(hash_password(p)?)
            }
            None => None,
        };

        sqlx::query(
            "UPDATE students SET \
             name = COALESCE(?2, name), \
             phone = COALESCE(?3, phone), \
             guardian_phone = COALESCE(?4, guardian_phone), \
             email = COALESCE(?5, email), \
             password_hash = COALESCE(?6, password_hash), \
             is_active = COALESCE(?7, is_active) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(&req.phone)
        .bind(&req.guardian_phone)
        .bind(email)
        .bind(password_hash)
        .bind(req.is_active)
        .execute(pool)
        .await?;

        Self::get(pool, scope, id).await
    }

    /// Soft delete; history stays intact.
    pub async fn deactivate(pool: &SqlitePool, scope: Option<i64>, id: i64) -> AppResult<()> {
        Self::get(pool, scope, id).await?;
        sqlx::query("UPDATE students SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Credential row for portal login. Unscoped: usernames are global.
    pub async fn find_auth(
        pool: &SqlitePool,
        username: &str,
    ) -> AppResult<Option<StudentAuthRow>> {
        let row = sqlx::query_as::<_, StudentAuthRow>(
            "SELECT id, branch_id, name, username, password_hash, is_active \
             FROM students WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::BranchRepository;
    use crate::db::DbService;
    use shared::models::BranchCreate;

    async fn setup() -> (SqlitePool, i64, i64) {
        let pool = DbService::connect_memory().await.unwrap();
        let b1 = BranchRepository::create(
            &pool,
            BranchCreate {
                name: "North".into(),
                address: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        let b2 = BranchRepository::create(
            &pool,
            BranchCreate {
                name: "South".into(),
                address: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        (pool, b1.id, b2.id)
    }

    fn student_req(name: &str, username: &str, phone: Option<&str>) -> StudentCreate {
        StudentCreate {
            name: name.to_string(),
            username: username.to_string(),
            password: "student1".to_string(),
            phone: phone.map(String::from),
            guardian_phone: None,
            email: None,
            enrolled_on: "2026-01-15".to_string(),
            branch_id: None,
            allow_duplicate: false,
        }
    }

    #[tokio::test]
    async fn test_scoped_list_never_shows_other_branches() {
        let (pool, b1, b2) = setup().await;
        StudentRepository::create(&pool, b1, student_req("Anna Lee", "anna", None))
            .await
            .unwrap();
        StudentRepository::create(&pool, b2, student_req("Ben Ode", "ben", None))
            .await
            .unwrap();

        // Branch-1 manager: only branch-1 students, Ben invisible.
        let scoped = StudentRepository::list(&pool, Some(b1), &StudentQuery::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].name, "Anna Lee");
        assert!(scoped.iter().all(|s| s.branch_id == b1));

        // Admin: both branches.
        let all = StudentRepository::list(&pool, None, &StudentQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_scoped_get_treats_foreign_branch_as_missing() {
        let (pool, b1, b2) = setup().await;
        let ben = StudentRepository::create(&pool, b2, student_req("Ben Ode", "ben", None))
            .await
            .unwrap();

        let err = StudentRepository::get(&pool, Some(b1), ben.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StudentNotFound);

        // Same id is visible with the right scope and to admins.
        assert!(StudentRepository::get(&pool, Some(b2), ben.id).await.is_ok());
        assert!(StudentRepository::get(&pool, None, ben.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_username_is_unique_across_branches() {
        let (pool, b1, b2) = setup().await;
        StudentRepository::create(&pool, b1, student_req("Anna Lee", "anna", None))
            .await
            .unwrap();
        let err = StudentRepository::create(&pool, b2, student_req("Other Anna", "anna", None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StudentUsernameExists);
    }

    #[tokio::test]
    async fn test_duplicate_detection_and_override() {
        let (pool, b1, b2) = setup().await;
        StudentRepository::create(
            &pool,
            b1,
            student_req("Anna Lee", "anna", Some("+1 555-0101")),
        )
        .await
        .unwrap();

        // Same person spelled differently, same branch: refused.
        let err = StudentRepository::create(
            &pool,
            b1,
            student_req("anna   lee", "anna2", Some("(555) 0101")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateStudent);

        // Same name+phone in another branch is a different registration.
        StudentRepository::create(
            &pool,
            b2,
            student_req("Anna Lee", "anna3", Some("555 0101")),
        )
        .await
        .unwrap();

        // Explicit override within the branch.
        let mut dup = student_req("Anna Lee", "anna4", Some("5550101"));
        dup.allow_duplicate = true;
        StudentRepository::create(&pool, b1, dup).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_matches_name_username_phone() {
        let (pool, b1, _) = setup().await;
        StudentRepository::create(&pool, b1, student_req("Anna Lee", "alee", Some("5550101")))
            .await
            .unwrap();
        StudentRepository::create(&pool, b1, student_req("Ben Ode", "ben", Some("5550202")))
            .await
            .unwrap();

        for q in ["Anna", "alee", "0101"] {
            let found = StudentRepository::list(
                &pool,
                Some(b1),
                &StudentQuery {
                    q: Some(q.to_string()),
                    include_inactive: false,
                },
            )
            .await
            .unwrap();
            assert_eq!(found.len(), 1, "query {q}");
            assert_eq!(found[0].username, "alee");
        }
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_default_list() {
        let (pool, b1, _) = setup().await;
        let anna = StudentRepository::create(&pool, b1, student_req("Anna Lee", "anna", None))
            .await
            .unwrap();
        StudentRepository::deactivate(&pool, Some(b1), anna.id)
            .await
            .unwrap();

        let active = StudentRepository::list(&pool, Some(b1), &StudentQuery::default())
            .await
            .unwrap();
        assert!(active.is_empty());

        let all = StudentRepository::list(
            &pool,
            Some(b1),
            &StudentQuery {
                q: None,
                include_inactive: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let (pool, b1, _) = setup().await;
        let anna = StudentRepository::create(&pool, b1, student_req("Anna Lee", "anna", None))
            .await
            .unwrap();

        StudentRepository::update(
            &pool,
            Some(b1),
            anna.id,
            StudentUpdate {
                password: Some("newpass99".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let auth = StudentRepository::find_auth(&pool, "anna")
            .await
            .unwrap()
            .unwrap();
        assert!(crate::db::models::verify_password("newpass99", &auth.password_hash));
        assert!(!crate::db::models::verify_password("student1", &auth.password_hash));
    }
}
