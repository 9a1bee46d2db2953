//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{
        AvailableBook, AvailableCopy, Book, BookAvailability, BookWithCopies, Copy, CreateBook,
    },
    repository::is_unique_violation,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Register a book together with its copy batch. The book row and all
    /// copy rows commit as one transaction; a book without its copies is
    /// never observable.
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookWithCopies> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, title, author)
            VALUES ($1, $2, $3)
            RETURNING id, isbn, title, author
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "books_isbn_key") {
                AppError::Conflict(format!("A book with isbn {} already exists", book.isbn))
            } else {
                e.into()
            }
        })?;

        let mut copies = Vec::with_capacity(book.copies as usize);
        for _ in 0..book.copies {
            let copy = sqlx::query_as::<_, Copy>(
                "INSERT INTO copies (book_id) VALUES ($1) RETURNING id, book_id",
            )
            .bind(created.id)
            .fetch_one(&mut *tx)
            .await?;
            copies.push(copy);
        }

        tx.commit().await?;

        Ok(BookWithCopies {
            id: created.id,
            isbn: created.isbn,
            title: created.title,
            author: created.author,
            copies,
        })
    }

    /// Search books by case-insensitive substring over title and isbn.
    /// An empty search returns the whole catalog, insertion order.
    pub async fn search(&self, search: Option<&str>) -> AppResult<Vec<BookWithCopies>> {
        let books = match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT id, isbn, title, author
                    FROM books
                    WHERE title ILIKE $1 OR isbn ILIKE $1
                    ORDER BY id
                    "#,
                )
                .bind(format!("%{}%", term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>("SELECT id, isbn, title, author FROM books ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let copies = sqlx::query_as::<_, Copy>(
            "SELECT id, book_id FROM copies WHERE book_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<Copy>> = HashMap::new();
        for copy in copies {
            by_book.entry(copy.book_id).or_default().push(copy);
        }

        Ok(books
            .into_iter()
            .map(|book| {
                let copies = by_book.remove(&book.id).unwrap_or_default();
                BookWithCopies {
                    id: book.id,
                    isbn: book.isbn,
                    title: book.title,
                    author: book.author,
                    copies,
                }
            })
            .collect())
    }

    /// Availability counts for one book, derived from active loans
    pub async fn availability(&self, book_id: i32) -> AppResult<BookAvailability> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        let on_loan: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM loans l
            JOIN copies c ON l.copy_id = c.id
            WHERE c.book_id = $1 AND l.returned_at IS NULL
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(BookAvailability {
            total,
            prestados: on_loan,
            disponibles: total - on_loan,
        })
    }

    /// Books with at least one available copy, each carrying its available
    /// copy ids. Ordered by book id, copies by copy id; limit/offset paginate
    /// over books.
    pub async fn available(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<AvailableBook>> {
        let term = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let books = match term {
            Some(term) => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT b.id, b.isbn, b.title, b.author
                    FROM books b
                    WHERE (b.title ILIKE $1 OR b.isbn ILIKE $1)
                      AND EXISTS (
                          SELECT 1 FROM copies c
                          WHERE c.book_id = b.id
                            AND NOT EXISTS (
                                SELECT 1 FROM loans l
                                WHERE l.copy_id = c.id AND l.returned_at IS NULL
                            )
                      )
                    ORDER BY b.id
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(term)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT b.id, b.isbn, b.title, b.author
                    FROM books b
                    WHERE EXISTS (
                        SELECT 1 FROM copies c
                        WHERE c.book_id = b.id
                          AND NOT EXISTS (
                              SELECT 1 FROM loans l
                              WHERE l.copy_id = c.id AND l.returned_at IS NULL
                          )
                    )
                    ORDER BY b.id
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let free_copies = sqlx::query_as::<_, Copy>(
            r#"
            SELECT c.id, c.book_id
            FROM copies c
            WHERE c.book_id = ANY($1)
              AND NOT EXISTS (
                  SELECT 1 FROM loans l
                  WHERE l.copy_id = c.id AND l.returned_at IS NULL
              )
            ORDER BY c.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<AvailableCopy>> = HashMap::new();
        for copy in free_copies {
            by_book
                .entry(copy.book_id)
                .or_default()
                .push(AvailableCopy { id: copy.id });
        }

        Ok(books
            .into_iter()
            .map(|book| {
                let available_copies = by_book.remove(&book.id).unwrap_or_default();
                AvailableBook {
                    id: book.id,
                    isbn: book.isbn,
                    title: book.title,
                    author: book.author,
                    available_count: available_copies.len() as i64,
                    available_copies,
                }
            })
            .collect())
    }

    /// Get a copy by id
    pub async fn get_copy(&self, copy_id: i32) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("SELECT id, book_id FROM copies WHERE id = $1")
            .bind(copy_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", copy_id)))
    }
}
