//! Book and copy models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
}

/// One lendable instance of a book. Availability is derived from the loans
/// table, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
}

/// Book with its copy batch, as returned by registration and search
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithCopies {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copies: Vec<Copy>,
}

/// Register book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 250, message = "isbn must be 1-250 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 250, message = "title must be 1-250 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 250, message = "author must be 1-250 characters"))]
    pub author: String,
    /// Number of copies to create with the book
    #[validate(range(min = 1, message = "copies must be at least 1"))]
    pub copies: i32,
}

/// Availability counts for one book. `disponibles` is always
/// `total - prestados`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookAvailability {
    pub total: i64,
    pub prestados: i64,
    pub disponibles: i64,
}

/// Copy id entry inside an [`AvailableBook`]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableCopy {
    pub id: i32,
}

/// Book with at least one available copy
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableBook {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "availableCount")]
    pub available_count: i64,
    #[serde(rename = "availableCopies")]
    pub available_copies: Vec<AvailableCopy>,
}

/// Query parameters for book search
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookSearchQuery {
    pub search: Option<String>,
}

/// Query parameters for the available-books listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableBooksQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
