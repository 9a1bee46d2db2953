//! Debt model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Monetary debt created by a damaged return. `paid` transitions false→true
/// exactly once and is never reversed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Debt {
    pub id: i32,
    pub loan_id: i32,
    pub member_id: i32,
    pub amount: Decimal,
    pub paid: bool,
}
