//! Loan model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;
use super::debt::Debt;
use super::person::PersonResponse;

/// Loan model from database. `returned_at` is null while the loan is active
/// and is set exactly once on return.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub member_id: i32,
    pub librarian_id: i32,
    pub copy_id: i32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoan {
    pub member_id: i32,
    pub librarian_id: i32,
    pub copy_id: i32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
}

/// Copy with its book, for loan display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopyWithBook {
    pub id: i32,
    pub book: Book,
}

/// Active loan with denormalized member/librarian/copy data for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveLoan {
    pub id: i32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub member: PersonResponse,
    pub librarian: PersonResponse,
    pub copy: CopyWithBook,
}

/// Return loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnLoan {
    pub damaged: bool,
    #[serde(rename = "damageAmount", default)]
    pub damage_amount: Decimal,
}

/// Outcome of a return: the closed loan plus the debt created when the copy
/// came back damaged.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnOutcome {
    pub loan: Loan,
    #[serde(rename = "createdDebt")]
    pub created_debt: Option<Debt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_loan_parses_camel_case_body() {
        let body = r#"{
            "memberId": 1,
            "librarianId": 2,
            "copyId": 3,
            "dateFrom": "2025-03-01T00:00:00.000Z",
            "dateTo": "2025-03-15T00:00:00.000Z"
        }"#;
        let loan: CreateLoan = serde_json::from_str(body).unwrap();
        assert_eq!(loan.member_id, 1);
        assert_eq!(loan.copy_id, 3);
        assert!(loan.date_from < loan.date_to);
    }

    #[test]
    fn return_loan_defaults_amount_to_zero() {
        let request: ReturnLoan = serde_json::from_str(r#"{"damaged": false}"#).unwrap();
        assert!(!request.damaged);
        assert_eq!(request.damage_amount, Decimal::ZERO);
    }

    #[test]
    fn return_outcome_serializes_created_debt_key() {
        let outcome = ReturnOutcome {
            loan: Loan {
                id: 1,
                member_id: 1,
                librarian_id: 2,
                copy_id: 3,
                date_from: Utc::now(),
                date_to: Utc::now(),
                returned_at: Some(Utc::now()),
            },
            created_debt: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("createdDebt").is_some());
    }
}
