//! Reporting aggregates
//!
//! The dashboard is the same shape for every staff role; only the scope
//! differs. Admins additionally get a per-branch breakdown. The
//! reference date and month window come in as parameters so handlers
//! pass the real clock and tests pass fixed values.

use serde::Serialize;
use shared::error::AppResult;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCounts {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_students: i64,
    pub active_trainers: i64,
    pub attendance_today: AttendanceCounts,
    pub outstanding_cents: i64,
    pub collected_this_month_cents: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BranchBreakdown {
    pub branch_id: i64,
    pub branch_name: String,
    pub active_students: i64,
    pub outstanding_cents: i64,
}

pub struct ReportRepository;

impl ReportRepository {
    pub async fn dashboard(
        pool: &SqlitePool,
        scope: Option<i64>,
        today: &str,
        month_bounds_millis: (i64, i64),
    ) -> AppResult<DashboardSummary> {
        let active_students: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE is_active = 1 AND (?1 IS NULL OR branch_id = ?1)",
        )
        .bind(scope)
        .fetch_one(pool)
        .await?;

        let active_trainers: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM trainers WHERE is_active = 1 AND (?1 IS NULL OR branch_id = ?1)",
        )
        .bind(scope)
        .fetch_one(pool)
        .await?;

        let status_counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM attendance \
             WHERE date = ?1 AND (?2 IS NULL OR branch_id = ?2) GROUP BY status",
        )
        .bind(today)
        .bind(scope)
        .fetch_all(pool)
        .await?;
        let mut attendance_today = AttendanceCounts::default();
        for (status, count) in status_counts {
            match status.as_str() {
                "present" => attendance_today.present = count,
                "absent" => attendance_today.absent = count,
                "late" => attendance_today.late = count,
                _ => {}
            }
        }

        let outstanding_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents - paid_cents), 0) FROM fees \
             WHERE status != 'paid' AND (?1 IS NULL OR branch_id = ?1)",
        )
        .bind(scope)
        .fetch_one(pool)
        .await?;

        let (month_start, month_end) = month_bounds_millis;
        let collected_this_month_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(p.amount_cents), 0) \
             FROM payments p JOIN fees f ON f.id = p.fee_id \
             WHERE p.created_at >= ?1 AND p.created_at < ?2 \
             AND (?3 IS NULL OR f.branch_id = ?3)",
        )
        .bind(month_start)
        .bind(month_end)
        .bind(scope)
        .fetch_one(pool)
        .await?;

        Ok(DashboardSummary {
            active_students,
            active_trainers,
            attendance_today,
            outstanding_cents,
            collected_this_month_cents,
        })
    }

    /// Per-branch totals, admin view.
    pub async fn branch_breakdown(pool: &SqlitePool) -> AppResult<Vec<BranchBreakdown>> {
        let rows = sqlx::query_as::<_, BranchBreakdown>(
            "SELECT b.id AS branch_id, b.name AS branch_name, \
             (SELECT COUNT(*) FROM students s WHERE s.branch_id = b.id AND s.is_active = 1) \
                 AS active_students, \
             (SELECT COALESCE(SUM(f.amount_cents - f.paid_cents), 0) FROM fees f \
                 WHERE f.branch_id = b.id AND f.status != 'paid') AS outstanding_cents \
             FROM branches b WHERE b.is_active = 1 ORDER BY b.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{
        AttendanceRepository, BranchRepository, FeeRepository, StudentRepository,
    };
    use crate::db::DbService;
    use shared::models::{
        AttendanceStatus, BranchCreate, FeeCreate, MarkAttendanceRequest, PaymentCreate,
        StudentCreate,
    };
    use shared::util::now_millis;

    async fn seed() -> (SqlitePool, i64, i64) {
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
        .unwrap()
        .id;
        let b2 = BranchRepository::create(
            &pool,
            BranchCreate {
                name: "South".into(),
                address: None,
                phone: None,
            },
        )
        .await
        .unwrap()
        .id;

        for (branch, name, username) in
            [(b1, "Anna Lee", "anna"), (b1, "Ben Ode", "ben"), (b2, "Cal Ito", "cal")]
        {
            StudentRepository::create(
                &pool,
                branch,
                StudentCreate {
                    name: name.into(),
                    username: username.into(),
                    password: "student1".into(),
                    phone: None,
                    guardian_phone: None,
                    email: None,
                    enrolled_on: "2026-01-15".into(),
                    branch_id: None,
                    allow_duplicate: false,
                },
            )
            .await
            .unwrap();
        }
        (pool, b1, b2)
    }

    async fn student_id(pool: &SqlitePool, username: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM students WHERE username = ?1")
            .bind(username)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_is_scoped_per_branch() {
        let (pool, b1, b2) = seed().await;
        let anna = student_id(&pool, "anna").await;
        let cal = student_id(&pool, "cal").await;

        AttendanceRepository::mark(
            &pool,
            Some(b1),
            1,
            &MarkAttendanceRequest {
                student_id: anna,
                date: "2026-03-02".into(),
                status: AttendanceStatus::Present,
                note: None,
            },
        )
        .await
        .unwrap();

        let fee = FeeRepository::create(
            &pool,
            Some(b1),
            FeeCreate {
                student_id: anna,
                description: "Tuition".into(),
                amount_cents: 10000,
                due_on: None,
            },
        )
        .await
        .unwrap();
        FeeRepository::record_payment(
            &pool,
            Some(b1),
            fee.id,
            PaymentCreate {
                amount_cents: 4000,
                method: None,
                note: None,
            },
            1,
        )
        .await
        .unwrap();
        FeeRepository::create(
            &pool,
            Some(b2),
            FeeCreate {
                student_id: cal,
                description: "Tuition".into(),
                amount_cents: 2000,
                due_on: None,
            },
        )
        .await
        .unwrap();

        let now = now_millis();
        let window = (now - 1000, now + 1000);

        let b1_view = ReportRepository::dashboard(&pool, Some(b1), "2026-03-02", window)
            .await
            .unwrap();
        assert_eq!(b1_view.active_students, 2);
        assert_eq!(b1_view.attendance_today.present, 1);
        assert_eq!(b1_view.outstanding_cents, 6000);
        assert_eq!(b1_view.collected_this_month_cents, 4000);

        let b2_view = ReportRepository::dashboard(&pool, Some(b2), "2026-03-02", window)
            .await
            .unwrap();
        assert_eq!(b2_view.active_students, 1);
        assert_eq!(b2_view.attendance_today.present, 0);
        assert_eq!(b2_view.outstanding_cents, 2000);
        assert_eq!(b2_view.collected_this_month_cents, 0);

        // Admin view is the sum of both.
        let global = ReportRepository::dashboard(&pool, None, "2026-03-02", window)
            .await
            .unwrap();
        assert_eq!(global.active_students, 3);
        assert_eq!(global.outstanding_cents, 8000);
        assert_eq!(global.collected_this_month_cents, 4000);
    }

    #[tokio::test]
    async fn test_branch_breakdown_lists_every_active_branch() {
        let (pool, _, _) = seed().await;
        let breakdown = ReportRepository::branch_breakdown(&pool).await.unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].branch_name, "North");
        assert_eq!(breakdown[0].active_students, 2);
        assert_eq!(breakdown[1].branch_name, "South");
        assert_eq!(breakdown[1].active_students, 1);
    }

    #[tokio::test]
    async fn test_empty_database_yields_zeroes() {
        let pool = DbService::connect_memory().await.unwrap();
        let summary = ReportRepository::dashboard(&pool, None, "2026-03-02", (0, 1))
            .await
            .unwrap();
        assert_eq!(summary.active_students, 0);
        assert_eq!(summary.outstanding_cents, 0);
        assert_eq!(summary.collected_this_month_cents, 0);
    }
}
