//! Catalog service: book registration, search and availability

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{AvailableBook, BookAvailability, BookWithCopies, CreateBook},
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a book and its copy batch
    pub async fn register_book(&self, book: CreateBook) -> AppResult<BookWithCopies> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            "Registered book {} ({}) with {} copies",
            created.id,
            created.isbn,
            created.copies.len()
        );
        Ok(created)
    }

    /// Search books by title or isbn substring
    pub async fn search_books(&self, search: Option<&str>) -> AppResult<Vec<BookWithCopies>> {
        self.repository.books.search(search).await
    }

    /// Availability counts for one book
    pub async fn availability(&self, book_id: i32) -> AppResult<BookAvailability> {
        self.repository.books.availability(book_id).await
    }

    /// Paginated listing of books with available copies
    pub async fn available_books(
        &self,
        search: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<AvailableBook>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        self.repository.books.available(search, limit, offset).await
    }
}
