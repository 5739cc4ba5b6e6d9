//! Attendance repository
//!
//! Marking is an upsert on (student, date): the second mark for the
//! same day replaces the first, so a correction never needs a delete.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AttendanceQuery, AttendanceRecord, AttendanceWithStudent, MarkAttendanceRequest,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::StudentRepository;

const SELECT_RECORD: &str = "SELECT id, student_id, branch_id, date, status, note, marked_by, \
     created_at, updated_at FROM attendance";

pub struct AttendanceRepository;

impl AttendanceRepository {
    /// Mark (or re-mark) a student for a date. The student must be
    /// visible in `scope` and active; the record lands in the
    /// student's branch, not the caller's.
    pub async fn mark(
        pool: &SqlitePool,
        scope: Option<i64>,
        marked_by: i64,
        req: &MarkAttendanceRequest,
    ) -> AppResult<AttendanceRecord> {
        let student = StudentRepository::get(pool, scope, req.student_id).await?;
        if !student.is_active {
            return Err(AppError::new(ErrorCode::StudentInactive));
        }

        let now = now_millis();
        sqlx::query(
            "INSERT INTO attendance (id, student_id, branch_id, date, status, note, marked_by, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) \
             ON CONFLICT (student_id, date) DO UPDATE SET \
             status = excluded.status, \
             note = excluded.note, \
             marked_by = excluded.marked_by, \
             updated_at = excluded.updated_at",
        )
        .bind(snowflake_id())
        .bind(student.id)
        .bind(student.branch_id)
        .bind(req.date.trim())
        .bind(req.status)
        .bind(&req.note)
        .bind(marked_by)
        .bind(now)
        .execute(pool)
        .await?;

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "{SELECT_RECORD} WHERE student_id = ?1 AND date = ?2"
        ))
        .bind(student.id)
        .bind(req.date.trim())
        .fetch_one(pool)
        .await?;
        Ok(record)
    }

    pub async fn list(
        pool: &SqlitePool,
        scope: Option<i64>,
        query: &AttendanceQuery,
    ) -> AppResult<Vec<AttendanceWithStudent>> {
        let rows = sqlx::query_as::<_, AttendanceWithStudent>(
            "SELECT a.id, a.student_id, s.name AS student_name, a.branch_id, a.date, \
             a.status, a.note, a.marked_by \
             FROM attendance a JOIN students s ON s.id = a.student_id \
             WHERE (?1 IS NULL OR a.branch_id = ?1) \
             AND (?2 IS NULL OR a.date = ?2) \
             AND (?3 IS NULL OR a.student_id = ?3) \
             AND (?4 IS NULL OR a.date >= ?4) \
             AND (?5 IS NULL OR a.date <= ?5) \
             ORDER BY a.date DESC, s.name",
        )
        .bind(scope)
        .bind(&query.date)
        .bind(query.student_id)
        .bind(&query.from)
        .bind(&query.to)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// A single student's history, newest first. Used by the portal,
    /// where the student id comes from the token.
    pub async fn for_student(
        pool: &SqlitePool,
        student_id: i64,
        from: Option<&str>,
        to: Option<&str>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "{SELECT_RECORD} \
             WHERE student_id = ?1 \
             AND (?2 IS NULL OR date >= ?2) \
             AND (?3 IS NULL OR date <= ?3) \
             ORDER BY date DESC"
        ))
        .bind(student_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
