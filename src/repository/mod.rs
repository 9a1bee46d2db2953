//! Repository layer for database operations

pub mod books;
pub mod debts;
pub mod loans;
pub mod people;

use sqlx::{Pool, Postgres};

/// Returns true when `err` is a unique violation on the named constraint.
/// Write-time constraint checks are how the ledger serializes racing inserts
/// (one active loan per copy, unique isbn/dni) without application locks.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some(constraint),
        _ => false,
    }
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub people: people::PeopleRepository,
    pub loans: loans::LoansRepository,
    pub debts: debts::DebtsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            people: people::PeopleRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            debts: debts::DebtsRepository::new(pool.clone()),
            pool,
        }
    }
}
