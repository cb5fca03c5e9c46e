//! Books repository

use sqlx::{Pool, Postgres};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery, BookShort, CreateBook},
};

const SHORT_COLUMNS: &str =
    "id, title, isbn, publication_year, author_id, category_id, available_copies";

const DETAILS_SELECT: &str = r#"
    SELECT b.*, a.first_name || ' ' || a.last_name AS author_name, c.name AS category_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
    LEFT JOIN categories c ON c.id = b.category_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Book with author and category names
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let query = format!("{} WHERE b.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of books in catalog order (by id)
    pub async fn list_page(&self, offset: i64, limit: i64) -> AppResult<Vec<BookShort>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY id LIMIT $1 OFFSET $2",
            SHORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookShort>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Books whose title contains `term` (case-insensitive)
    pub async fn search_title(&self, term: &str, limit: i64) -> AppResult<Vec<BookShort>> {
        let query = format!(
            "SELECT {} FROM books WHERE title ILIKE $1 ORDER BY title LIMIT $2",
            SHORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookShort>(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_by_category(&self, category_id: i32, limit: i64) -> AppResult<Vec<BookShort>> {
        let query = format!(
            "SELECT {} FROM books WHERE category_id = $1 ORDER BY title LIMIT $2",
            SHORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookShort>(&query)
            .bind(category_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_by_author(&self, author_id: i32, limit: i64) -> AppResult<Vec<BookShort>> {
        let query = format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY publication_year, title LIMIT $2",
            SHORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookShort>(&query)
            .bind(author_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Admin listing: filters on category, author and year; search over
    /// title, ISBN and author last name
    pub async fn filter(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        let sql = format!(
            r#"{}
            WHERE ($1::int IS NULL OR b.category_id = $1)
              AND ($2::int IS NULL OR b.author_id = $2)
              AND ($3::int IS NULL OR b.publication_year = $3)
              AND ($4::text IS NULL OR b.title ILIKE $4 OR b.isbn ILIKE $4 OR a.last_name ILIKE $4)
            ORDER BY b.title
            "#,
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, BookDetails>(&sql)
            .bind(query.category_id)
            .bind(query.author_id)
            .bind(query.publication_year)
            .bind(query.q.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book. Copy counts are expected to be validated by the caller.
    pub async fn create(&self, data: &CreateBook, available_copies: i32) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, isbn, publication_year, author_id, category_id,
                               total_copies, available_copies, description, language,
                               pages, publisher, cover_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.publication_year)
        .bind(data.author_id)
        .bind(data.category_id)
        .bind(data.total_copies)
        .bind(available_copies)
        .bind(data.description.as_deref().unwrap_or(""))
        .bind(&data.language)
        .bind(data.pages)
        .bind(&data.publisher)
        .bind(&data.cover_image)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Read-modify-write of a book under a row lock. `apply` merges and
    /// validates the change.
    pub async fn update_locked<F>(&self, id: i32, apply: F) -> AppResult<Book>
    where
        F: FnOnce(&mut Book) -> AppResult<()> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        apply(&mut book)?;

        let saved = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, isbn = $3, publication_year = $4, author_id = $5,
                category_id = $6, total_copies = $7, available_copies = $8,
                description = $9, language = $10, pages = $11, publisher = $12,
                cover_image = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(book.author_id)
        .bind(book.category_id)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(&book.description)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.cover_image)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Delete a book. Refused while any loan (open or closed) references it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if loans > 0 {
            return Err(AppError::Protected(format!(
                "Book {} is referenced by {} loan(s)",
                id, loans
            )));
        }

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Force `available_copies = 0` on the given books. Returns rows updated.
    pub async fn mark_unavailable(&self, ids: &[i32]) -> AppResult<u64> {
        let result = sqlx::query("UPDATE books SET available_copies = 0 WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
