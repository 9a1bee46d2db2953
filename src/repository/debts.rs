//! Debts repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::debt::Debt,
};

#[derive(Clone)]
pub struct DebtsRepository {
    pool: Pool<Postgres>,
}

impl DebtsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Debts of one person, insertion order
    pub async fn for_person(&self, person_id: i32, only_unpaid: bool) -> AppResult<Vec<Debt>> {
        let query = if only_unpaid {
            "SELECT id, loan_id, member_id, amount, paid FROM debts WHERE member_id = $1 AND paid = FALSE ORDER BY id"
        } else {
            "SELECT id, loan_id, member_id, amount, paid FROM debts WHERE member_id = $1 ORDER BY id"
        };

        let debts = sqlx::query_as::<_, Debt>(query)
            .bind(person_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(debts)
    }

    /// Mark a debt as paid. The conditional UPDATE only matches unpaid rows,
    /// so the false→true transition happens exactly once; a repeat is
    /// reported as a conflict, not silently absorbed.
    pub async fn pay(&self, debt_id: i32) -> AppResult<Debt> {
        let paid = sqlx::query_as::<_, Debt>(
            r#"
            UPDATE debts
            SET paid = TRUE
            WHERE id = $1 AND paid = FALSE
            RETURNING id, loan_id, member_id, amount, paid
            "#,
        )
        .bind(debt_id)
        .fetch_optional(&self.pool)
        .await?;

        match paid {
            Some(debt) => Ok(debt),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM debts WHERE id = $1)")
                        .bind(debt_id)
                        .fetch_one(&self.pool)
                        .await?;
                Err(if exists {
                    AppError::Conflict(format!("Debt {} is already paid", debt_id))
                } else {
                    AppError::NotFound(format!("Debt with id {} not found", debt_id))
                })
            }
        }
    }

    /// Count unpaid debts
    pub async fn count_unpaid(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM debts WHERE paid = FALSE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
