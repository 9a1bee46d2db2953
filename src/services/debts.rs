//! Debt service

use crate::{error::AppResult, models::debt::Debt, repository::Repository};

#[derive(Clone)]
pub struct DebtsService {
    repository: Repository,
}

impl DebtsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Pay a debt; paying twice is a conflict
    pub async fn pay_debt(&self, debt_id: i32) -> AppResult<Debt> {
        let debt = self.repository.debts.pay(debt_id).await?;
        tracing::info!("Debt {} paid (member {})", debt.id, debt.member_id);
        Ok(debt)
    }
}
