//! Loans repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        debt::Debt,
        loan::{ActiveLoan, CopyWithBook, CreateLoan, Loan},
        person::{Person, PersonResponse, PersonRow},
    },
    repository::is_unique_violation,
};

const LOAN_COLUMNS: &str = "id, member_id, librarian_id, copy_id, date_from, date_to, returned_at";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!("SELECT {} FROM loans WHERE id = $1", LOAN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Whether the copy currently has no active loan
    pub async fn copy_is_available(&self, copy_id: i32) -> AppResult<bool> {
        let on_loan: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE copy_id = $1 AND returned_at IS NULL)",
        )
        .bind(copy_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(!on_loan)
    }

    /// Insert a new active loan. The partial unique index on
    /// `(copy_id) WHERE returned_at IS NULL` is the serialization point:
    /// of two concurrent inserts on the same copy exactly one commits, the
    /// other surfaces here as a conflict.
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (member_id, librarian_id, copy_id, date_from, date_to)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan.member_id)
        .bind(loan.librarian_id)
        .bind(loan.copy_id)
        .bind(loan.date_from)
        .bind(loan.date_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "loans_one_active_per_copy") {
                AppError::Conflict(format!("Copy {} is not available", loan.copy_id))
            } else {
                e.into()
            }
        })
    }

    /// Active loans with denormalized member/librarian/copy/book data,
    /// insertion order
    pub async fn active(&self) -> AppResult<Vec<ActiveLoan>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.date_from, l.date_to, l.returned_at,
                   mem.id as mem_id, mem.name as mem_name, mem.lastname as mem_lastname,
                   mem.dni as mem_dni, mem.role_id as mem_role_id,
                   mem.member_id as mem_member_id, mem.enrollment_librarian as mem_enrollment,
                   lib.id as lib_id, lib.name as lib_name, lib.lastname as lib_lastname,
                   lib.dni as lib_dni, lib.role_id as lib_role_id,
                   lib.member_id as lib_member_id, lib.enrollment_librarian as lib_enrollment,
                   c.id as copy_id,
                   b.id as book_id, b.isbn, b.title, b.author
            FROM loans l
            JOIN people mem ON l.member_id = mem.id
            JOIN people lib ON l.librarian_id = lib.id
            JOIN copies c ON l.copy_id = c.id
            JOIN books b ON c.book_id = b.id
            WHERE l.returned_at IS NULL
            ORDER BY l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut loans = Vec::with_capacity(rows.len());
        for row in rows {
            let member: Person = PersonRow {
                id: row.get("mem_id"),
                name: row.get("mem_name"),
                lastname: row.get("mem_lastname"),
                dni: row.get("mem_dni"),
                role_id: row.get("mem_role_id"),
                member_id: row.get("mem_member_id"),
                enrollment_librarian: row.get("mem_enrollment"),
            }
            .try_into()?;
            let librarian: Person = PersonRow {
                id: row.get("lib_id"),
                name: row.get("lib_name"),
                lastname: row.get("lib_lastname"),
                dni: row.get("lib_dni"),
                role_id: row.get("lib_role_id"),
                member_id: row.get("lib_member_id"),
                enrollment_librarian: row.get("lib_enrollment"),
            }
            .try_into()?;

            loans.push(ActiveLoan {
                id: row.get("id"),
                date_from: row.get("date_from"),
                date_to: row.get("date_to"),
                returned_at: row.get("returned_at"),
                member: PersonResponse::from(member),
                librarian: PersonResponse::from(librarian),
                copy: CopyWithBook {
                    id: row.get("copy_id"),
                    book: Book {
                        id: row.get("book_id"),
                        isbn: row.get("isbn"),
                        title: row.get("title"),
                        author: row.get("author"),
                    },
                },
            });
        }

        Ok(loans)
    }

    /// Close a loan and, for a damaged return, create its debt. Both writes
    /// share one transaction. The conditional UPDATE is the state
    /// transition: it only matches while `returned_at` is null, so a loan
    /// can be returned exactly once and a retry can never produce a second
    /// debt.
    pub async fn return_loan(
        &self,
        loan_id: i32,
        damaged: bool,
        damage_amount: Decimal,
    ) -> AppResult<(Loan, Option<Debt>)> {
        let mut tx = self.pool.begin().await?;

        let returned = sqlx::query_as::<_, Loan>(&format!(
            r#"
            UPDATE loans
            SET returned_at = NOW()
            WHERE id = $1 AND returned_at IS NULL
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?;

        let loan = match returned {
            Some(loan) => loan,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
                        .bind(loan_id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists {
                    AppError::Conflict(format!("Loan {} is already returned", loan_id))
                } else {
                    AppError::NotFound(format!("Loan with id {} not found", loan_id))
                });
            }
        };

        let debt = if damaged {
            let debt = sqlx::query_as::<_, Debt>(
                r#"
                INSERT INTO debts (loan_id, member_id, amount)
                VALUES ($1, $2, $3)
                RETURNING id, loan_id, member_id, amount, paid
                "#,
            )
            .bind(loan.id)
            .bind(loan.member_id)
            .bind(damage_amount)
            .fetch_one(&mut *tx)
            .await?;
            Some(debt)
        } else {
            None
        };

        tx.commit().await?;

        Ok((loan, debt))
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE returned_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
