//! Biblion Library Loan & Inventory Ledger
//!
//! A Rust REST API server for library record keeping: book and copy
//! registration, member and librarian rosters, loans and damage debts.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
