//! Business logic services

pub mod catalog;
pub mod debts;
pub mod loans;
pub mod people;
pub mod stats;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub people: people::PeopleService,
    pub loans: loans::LoansService,
    pub debts: debts::DebtsService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            people: people::PeopleService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            debts: debts::DebtsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Readiness probe: verifies database connectivity
    pub async fn ready(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}
