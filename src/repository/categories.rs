//! Categories repository

use sqlx::{Pool, Postgres};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory},
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Get category by its name (URL slug)
    pub async fn get_by_name(&self, name: &str) -> AppResult<Category> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", name)))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Categories with their book counts, optionally filtered by name
    pub async fn list_with_counts(&self, name_like: Option<&str>) -> AppResult<Vec<CategoryWithCount>> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.description, c.image, COUNT(b.id) AS books_count
            FROM categories c
            LEFT JOIN books b ON b.category_id = c.id
            WHERE $1::text IS NULL OR c.name ILIKE $1
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .bind(name_like.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.description.as_deref().unwrap_or(""))
        .bind(&data.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                image = COALESCE($4, image)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category; its books keep existing with no category.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }
}
