//! Fee and payment repository
//!
//! Payments run inside a transaction: the balance check, the payment
//! row, and the fee's paid/status update commit together or not at all.
//! Status transitions are monotonic (unpaid -> partial -> paid) and
//! derived from amounts, never set directly by callers.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Fee, FeeCreate, FeeStatus, FeeWithStudent, Payment, PaymentCreate, StudentStatement,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::StudentRepository;

const SELECT_FEE: &str = "SELECT id, student_id, branch_id, description, amount_cents, \
     paid_cents, due_on, status, created_at, updated_at FROM fees";

pub struct FeeRepository;

impl FeeRepository {
    /// Raise a fee against a student visible in `scope`.
    pub async fn create(pool: &SqlitePool, scope: Option<i64>, req: FeeCreate) -> AppResult<Fee> {
        let student = StudentRepository::get(pool, scope, req.student_id).await?;
        if !student.is_active {
            return Err(AppError::new(ErrorCode::StudentInactive));
        }
        let description = crate::utils::validation::validate_required_text(
            &req.description,
            "description",
            crate::utils::validation::MAX_TEXT_LEN,
        )?;
        if req.amount_cents <= 0 {
            return Err(AppError::validation("amount must be positive")
                .with_detail("field", "amountCents"));
        }
        if let Some(due) = req.due_on.as_deref() {
            crate::utils::time::parse_date(due)?;
        }

        let id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO fees (id, student_id, branch_id, description, amount_cents, paid_cents, \
             due_on, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, 'unpaid', ?7, ?7)",
        )
        .bind(id)
        .bind(student.id)
        .bind(student.branch_id)
        .bind(&description)
        .bind(req.amount_cents)
        .bind(req.due_on.as_deref().map(str::trim))
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, scope, id).await
    }

    pub async fn get(pool: &SqlitePool, scope: Option<i64>, id: i64) -> AppResult<Fee> {
        let sql = format!("{SELECT_FEE} WHERE id = ?1 AND (?2 IS NULL OR branch_id = ?2)");
        sqlx::query_as::<_, Fee>(&sql)
            .bind(id)
            .bind(scope)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::FeeNotFound))
    }

    pub async fn list(
        pool: &SqlitePool,
        scope: Option<i64>,
        status: Option<FeeStatus>,
        student_id: Option<i64>,
    ) -> AppResult<Vec<FeeWithStudent>> {
        let rows = sqlx::query_as::<_, FeeWithStudent>(
            "SELECT f.id, f.student_id, s.name AS student_name, f.branch_id, f.description, \
             f.amount_cents, f.paid_cents, f.due_on, f.status \
             FROM fees f JOIN students s ON s.id = f.student_id \
             WHERE (?1 IS NULL OR f.branch_id = ?1) \
             AND (?2 IS NULL OR f.status = ?2) \
             AND (?3 IS NULL OR f.student_id = ?3) \
             ORDER BY f.created_at DESC",
        )
        .bind(scope)
        .bind(status)
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Record a payment and roll the fee's status forward.
    ///
    /// Rejects non-positive amounts, payments against settled fees, and
    /// anything that would push `paid` past `amount` (the caller sees
    /// the outstanding balance in the error details).
    pub async fn record_payment(
        pool: &SqlitePool,
        scope: Option<i64>,
        fee_id: i64,
        req: PaymentCreate,
        received_by: i64,
    ) -> AppResult<(Fee, Payment)> {
        if req.amount_cents <= 0 {
            return Err(AppError::new(ErrorCode::PaymentInvalidAmount));
        }

        let mut tx = pool.begin().await?;

        let sql = format!("{SELECT_FEE} WHERE id = ?1 AND (?2 IS NULL OR branch_id = ?2)");
        let fee = sqlx::query_as::<_, Fee>(&sql)
            .bind(fee_id)
            .bind(scope)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::FeeNotFound))?;

        if fee.status == FeeStatus::Paid {
            return Err(AppError::new(ErrorCode::FeeAlreadyPaid));
        }
        let outstanding = fee.outstanding_cents();
        if req.amount_cents > outstanding {
            return Err(AppError::payment_exceeds_balance(outstanding));
        }

        let payment_id = snowflake_id();
        let now = now_millis();
        sqlx::query(
            "INSERT INTO payments (id, fee_id, amount_cents, method, note, received_by, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(payment_id)
        .bind(fee.id)
        .bind(req.amount_cents)
        .bind(&req.method)
        .bind(&req.note)
        .bind(received_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let new_paid = fee.paid_cents + req.amount_cents;
        let new_status = FeeStatus::from_amounts(fee.amount_cents, new_paid);
        sqlx::query("UPDATE fees SET paid_cents = ?2, status = ?3, updated_at = ?4 WHERE id = ?1")
            .bind(fee.id)
            .bind(new_paid)
            .bind(new_status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let fee = Self::get(pool, scope, fee_id).await?;
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, fee_id, amount_cents, method, note, received_by, created_at \
             FROM payments WHERE id = ?1",
        )
        .bind(payment_id)
        .fetch_one(pool)
        .await?;
        Ok((fee, payment))
    }

    pub async fn payments_for_fee(
        pool: &SqlitePool,
        scope: Option<i64>,
        fee_id: i64,
    ) -> AppResult<Vec<Payment>> {
        // Scope check rides on the fee lookup.
        Self::get(pool, scope, fee_id).await?;
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, fee_id, amount_cents, method, note, received_by, created_at \
             FROM payments WHERE fee_id = ?1 ORDER BY created_at",
        )
        .bind(fee_id)
        .fetch_all(pool)
        .await?;
        Ok(payments)
    }

    /// All of one student's fees rolled into a statement.
    pub async fn statement_for_student(
        pool: &SqlitePool,
        student_id: i64,
    ) -> AppResult<StudentStatement> {
        let fees = sqlx::query_as::<_, Fee>(&format!(
            "{SELECT_FEE} WHERE student_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(StudentStatement::from_fees(fees))
    }
}
