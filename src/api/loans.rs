//! Loan and debt endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        debt::Debt,
        loan::{ActiveLoan, CreateLoan, Loan, ReturnLoan, ReturnOutcome},
    },
};

/// Loan creation response
#[derive(Serialize, ToSchema)]
pub struct LoanResult {
    pub result: Loan,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResult {
    pub result: ReturnOutcome,
}

/// Debt payment response
#[derive(Serialize, ToSchema)]
pub struct DebtResult {
    pub result: Debt,
}

/// Create a new loan (lend a copy to a member)
#[utoipa::path(
    post,
    path = "/loan",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResult),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Member, librarian or copy not found"),
        (status = 409, description = "Copy is not available")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResult>)> {
    let loan = state.services.loans.create_loan(request).await?;
    Ok((StatusCode::CREATED, Json(LoanResult { result: loan })))
}

/// List active loans with member/librarian/copy details
#[utoipa::path(
    get,
    path = "/loan/active",
    tag = "loans",
    responses(
        (status = 200, description = "Active loans", body = Vec<ActiveLoan>)
    )
)]
pub async fn active_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<ActiveLoan>>> {
    let loans = state.services.loans.active_loans().await?;
    Ok(Json(loans))
}

/// Return a loan, optionally reporting damage
#[utoipa::path(
    post,
    path = "/loan/{id}/devolucion",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = ReturnLoan,
    responses(
        (status = 200, description = "Loan returned", body = ReturnResult),
        (status = 400, description = "Invalid damage amount"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
    Json(request): Json<ReturnLoan>,
) -> AppResult<Json<ReturnResult>> {
    let (loan, created_debt) = state
        .services
        .loans
        .return_loan(loan_id, request.damaged, request.damage_amount)
        .await?;
    Ok(Json(ReturnResult {
        result: ReturnOutcome { loan, created_debt },
    }))
}

/// Pay a debt
#[utoipa::path(
    post,
    path = "/loan/{id}/pagarDeuda",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Debt ID")
    ),
    responses(
        (status = 200, description = "Debt paid", body = DebtResult),
        (status = 404, description = "Debt not found"),
        (status = 409, description = "Debt already paid")
    )
)]
pub async fn pay_debt(
    State(state): State<crate::AppState>,
    Path(debt_id): Path<i32>,
) -> AppResult<Json<DebtResult>> {
    let debt = state.services.debts.pay_debt(debt_id).await?;
    Ok(Json(DebtResult { result: debt }))
}
