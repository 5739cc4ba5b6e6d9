//! Fee and payment entities
//!
//! Money is integer cents throughout; no floats touch balances.
//! A fee's status is derived from its paid total: unpaid, partial once
//! any payment lands, paid when the balance reaches zero. Overpayment
//! is rejected, never truncated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Unpaid,
    Partial,
    Paid,
}

impl FeeStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Unpaid => "unpaid",
            FeeStatus::Partial => "partial",
            FeeStatus::Paid => "paid",
        }
    }

    /// Status implied by the paid/total pair.
    pub fn from_amounts(amount_cents: i64, paid_cents: i64) -> Self {
        if paid_cents <= 0 {
            FeeStatus::Unpaid
        } else if paid_cents < amount_cents {
            FeeStatus::Partial
        } else {
            FeeStatus::Paid
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(FeeStatus::Unpaid),
            "partial" => Ok(FeeStatus::Partial),
            "paid" => Ok(FeeStatus::Paid),
            other => Err(format!("unknown fee status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub branch_id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub paid_cents: i64,
    /// Due date, `YYYY-MM-DD`, if any.
    pub due_on: Option<String>,
    pub status: FeeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Fee {
    pub fn outstanding_cents(&self) -> i64 {
        self.amount_cents - self.paid_cents
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct FeeWithStudent {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub branch_id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub paid_cents: i64,
    pub due_on: Option<String>,
    pub status: FeeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCreate {
    pub student_id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub fee_id: i64,
    pub amount_cents: i64,
    pub method: Option<String>,
    pub note: Option<String>,
    /// Staff id that took the payment.
    pub received_by: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub amount_cents: i64,
    pub method: Option<String>,
    pub note: Option<String>,
}

/// Per-student fee summary for the portal and statement views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatement {
    pub fees: Vec<Fee>,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub outstanding_cents: i64,
}

impl StudentStatement {
    pub fn from_fees(fees: Vec<Fee>) -> Self {
        let total_cents = fees.iter().map(|f| f.amount_cents).sum();
        let paid_cents = fees.iter().map(|f| f.paid_cents).sum::<i64>();
        Self {
            outstanding_cents: total_cents - paid_cents,
            total_cents,
            paid_cents,
            fees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(amount: i64, paid: i64) -> Fee {
        Fee {
            id: 1,
            student_id: 2,
            branch_id: 3,
            description: "Monthly".into(),
            amount_cents: amount,
            paid_cents: paid,
            due_on: None,
            status: FeeStatus::from_amounts(amount, paid),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_status_from_amounts() {
        assert_eq!(FeeStatus::from_amounts(5000, 0), FeeStatus::Unpaid);
        assert_eq!(FeeStatus::from_amounts(5000, 1), FeeStatus::Partial);
        assert_eq!(FeeStatus::from_amounts(5000, 4999), FeeStatus::Partial);
        assert_eq!(FeeStatus::from_amounts(5000, 5000), FeeStatus::Paid);
    }

    #[test]
    fn test_statement_totals() {
        let statement = StudentStatement::from_fees(vec![fee(5000, 5000), fee(3000, 1000)]);
        assert_eq!(statement.total_cents, 8000);
        assert_eq!(statement.paid_cents, 6000);
        assert_eq!(statement.outstanding_cents, 2000);
    }

    #[test]
    fn test_outstanding() {
        assert_eq!(fee(5000, 1500).outstanding_cents(), 3500);
    }
}
