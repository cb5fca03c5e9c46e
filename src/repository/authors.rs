//! Authors repository

use sqlx::{Pool, Postgres};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, CreateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY last_name, first_name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn find_by_name(&self, first_name: &str, last_name: &str) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE first_name = $1 AND last_name = $2",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Authors whose first or last name contains `term` (case-insensitive)
    pub async fn search(&self, term: &str, limit: i64) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
            ORDER BY last_name, first_name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(term))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Admin listing: name search and nationality filter
    pub async fn filter(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::text IS NULL OR nationality = $2)
            ORDER BY last_name, first_name
            "#,
        )
        .bind(query.q.as_deref().map(contains_pattern))
        .bind(&query.nationality)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, birth_date, death_date,
                                 nationality, biography, website, photo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.birth_date)
        .bind(data.death_date)
        .bind(&data.nationality)
        .bind(data.biography.as_deref().unwrap_or(""))
        .bind(data.website.as_deref().unwrap_or(""))
        .bind(&data.photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Read-modify-write of an author under a row lock. `apply` merges and
    /// validates the change.
    pub async fn update_locked<F>(&self, id: i32, apply: F) -> AppResult<Author>
    where
        F: FnOnce(&mut Author) -> AppResult<()> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let mut author =
            sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

        apply(&mut author)?;

        let saved = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $2, last_name = $3, birth_date = $4, death_date = $5,
                nationality = $6, biography = $7, website = $8, photo = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.birth_date)
        .bind(author.death_date)
        .bind(&author.nationality)
        .bind(&author.biography)
        .bind(&author.website)
        .bind(&author.photo)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Delete an author. Refused while any book references them.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if books > 0 {
            return Err(AppError::Protected(format!(
                "Author {} still has {} book(s)",
                id, books
            )));
        }

        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
