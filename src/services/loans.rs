//! Loan service: lending, returns and the damage-debt side effect

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        debt::Debt,
        loan::{ActiveLoan, CreateLoan, Loan},
        person::Role,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a copy to a member. Preconditions are checked in order: member,
    /// librarian, copy, availability, dates. The availability check here is
    /// advisory; the insert itself races on the one-active-loan-per-copy
    /// index, so a concurrent winner turns the loser into a conflict rather
    /// than a double lend.
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<Loan> {
        let member = self.repository.people.get_by_id(loan.member_id).await?;
        if member.role() != Role::Member {
            return Err(AppError::Validation(format!(
                "Person {} is not a member",
                loan.member_id
            )));
        }

        let librarian = self.repository.people.get_by_id(loan.librarian_id).await?;
        if librarian.role() != Role::Librarian {
            return Err(AppError::Validation(format!(
                "Person {} is not a librarian",
                loan.librarian_id
            )));
        }

        self.repository.books.get_copy(loan.copy_id).await?;

        if !self.repository.loans.copy_is_available(loan.copy_id).await? {
            return Err(AppError::Conflict(format!(
                "Copy {} is not available",
                loan.copy_id
            )));
        }

        if loan.date_from >= loan.date_to {
            return Err(AppError::Validation(
                "dateFrom must be earlier than dateTo".to_string(),
            ));
        }

        let created = self.repository.loans.create(&loan).await?;
        tracing::info!(
            "Created loan {} (copy {} to member {})",
            created.id,
            created.copy_id,
            created.member_id
        );
        Ok(created)
    }

    /// Active loans with display data
    pub async fn active_loans(&self) -> AppResult<Vec<ActiveLoan>> {
        self.repository.loans.active().await
    }

    /// Return a loan; a damaged return also creates the member's debt
    pub async fn return_loan(
        &self,
        loan_id: i32,
        damaged: bool,
        damage_amount: Decimal,
    ) -> AppResult<(Loan, Option<Debt>)> {
        if damaged && damage_amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "damageAmount must be greater than zero for a damaged return".to_string(),
            ));
        }

        let (loan, debt) = self
            .repository
            .loans
            .return_loan(loan_id, damaged, damage_amount)
            .await?;

        if let Some(ref debt) = debt {
            tracing::info!(
                "Loan {} returned damaged, debt {} of {} for member {}",
                loan.id,
                debt.id,
                debt.amount,
                debt.member_id
            );
        }

        Ok((loan, debt))
    }
}
