//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Ledger totals
#[derive(Serialize, ToSchema)]
pub struct LedgerStats {
    pub books: i64,
    pub copies: i64,
    pub members: i64,
    pub librarians: i64,
    pub active_loans: i64,
    pub unpaid_debts: i64,
}

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub ledger: LedgerStats,
}

/// Get ledger statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Ledger totals", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
