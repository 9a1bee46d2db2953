//! Statistics service

use crate::{
    api::stats::{LedgerStats, StatsResponse},
    error::AppResult,
    models::person::Role,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get ledger totals
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;

        let copies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies")
            .fetch_one(pool)
            .await?;

        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people WHERE role_id = $1")
            .bind(Role::Member.id())
            .fetch_one(pool)
            .await?;

        let librarians: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people WHERE role_id = $1")
            .bind(Role::Librarian.id())
            .fetch_one(pool)
            .await?;

        let active_loans = self.repository.loans.count_active().await?;
        let unpaid_debts = self.repository.debts.count_unpaid().await?;

        Ok(StatsResponse {
            ledger: LedgerStats {
                books,
                copies,
                members,
                librarians,
                active_loans,
                unpaid_debts,
            },
        })
    }
}
