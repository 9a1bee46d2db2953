//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{
        AvailableBook, AvailableBooksQuery, BookAvailability, BookSearchQuery, BookWithCopies,
        CreateBook,
    },
};

/// Book search response
#[derive(Serialize, ToSchema)]
pub struct SearchBooksResponse {
    pub result: Vec<BookWithCopies>,
}

/// Register a new book with its copies
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book registered", body = BookWithCopies),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "ISBN already registered")
    )
)]
pub async fn register_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookWithCopies>)> {
    let book = state.services.catalog.register_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Search books by title or isbn
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books with their copies", body = SearchBooksResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<SearchBooksResponse>> {
    let result = state
        .services
        .catalog
        .search_books(query.search.as_deref())
        .await?;
    Ok(Json(SearchBooksResponse { result }))
}

/// Get availability counts for a book
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Availability counts", body = BookAvailability),
        (status = 404, description = "Book not found")
    )
)]
pub async fn availability(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookAvailability>> {
    let counts = state.services.catalog.availability(book_id).await?;
    Ok(Json(counts))
}

/// List books with available copies
#[utoipa::path(
    get,
    path = "/book/available",
    tag = "books",
    params(AvailableBooksQuery),
    responses(
        (status = 200, description = "Books with at least one available copy", body = Vec<AvailableBook>)
    )
)]
pub async fn available_books(
    State(state): State<crate::AppState>,
    Query(query): Query<AvailableBooksQuery>,
) -> AppResult<Json<Vec<AvailableBook>>> {
    let books = state
        .services
        .catalog
        .available_books(query.search.as_deref(), query.limit, query.offset)
        .await?;
    Ok(Json(books))
}
