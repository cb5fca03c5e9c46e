//! Catalog management service (books and categories)

use std::sync::Arc;

use chrono::Datelike;
use validator::Validate;

use crate::{
    clock::Clock,
    config::CatalogConfig,
    error::AppResult,
    models::{
        author::Author,
        book::{check_copies, check_publication_year, Book, BookDetails, BookPage, BookShort, CreateBook, UpdateBook},
        category::{Category, CreateCategory, UpdateCategory},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
    clock: Arc<dyn Clock>,
}

/// Resolved paging window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Clamp requested paging to `1..` pages of `1..=max` items. A
    /// configured maximum below one counts as one.
    pub fn resolve(page: Option<i64>, per_page: Option<i64>, config: &CatalogConfig) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));
        Self {
            page,
            per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig, clock: Arc<dyn Clock>) -> Self {
        Self { repository, config, clock }
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// One page of the catalog
    pub async fn list_books(&self, page: Option<i64>, per_page: Option<i64>) -> AppResult<BookPage> {
        let window = PageWindow::resolve(page, per_page, &self.config);
        let books = self.repository.books.list_page(window.offset, window.per_page).await?;
        let total = self.repository.books.count().await?;

        Ok(BookPage {
            books,
            total,
            page: window.page,
            per_page: window.per_page,
        })
    }

    /// Title substring search. An empty query matches every title.
    pub async fn search_books(&self, q: &str) -> AppResult<Vec<BookShort>> {
        self.repository.books.search_title(q.trim(), self.config.search_limit).await
    }

    pub async fn books_by_category(&self, category_slug: &str) -> AppResult<(Category, Vec<BookShort>)> {
        let category = self.repository.categories.get_by_name(category_slug).await?;
        let books = self
            .repository
            .books
            .list_by_category(category.id, self.config.default_page_size)
            .await?;
        Ok((category, books))
    }

    pub async fn books_by_author(&self, author_id: i32) -> AppResult<(Author, Vec<BookShort>)> {
        let author = self.repository.authors.get_by_id(author_id).await?;
        let books = self
            .repository
            .books
            .list_by_author(author.id, self.config.default_page_size)
            .await?;
        Ok((author, books))
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// Total number of books and the first `limit` of them
    pub async fn overview(&self, limit: i64) -> AppResult<(i64, Vec<BookShort>)> {
        let total = self.repository.books.count().await?;
        let books = self.repository.books.list_page(0, limit).await?;
        Ok((total, books))
    }

    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;

        let available = data.available_copies.unwrap_or(data.total_copies);
        check_copies(data.total_copies, available)?;
        check_publication_year(data.publication_year, self.current_year())?;

        self.repository.authors.get_by_id(data.author_id).await?;
        if let Some(category_id) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }

        let book = self.repository.books.create(&data, available).await?;
        tracing::info!(
            "Catalog create: book id={} isbn={} ({}/{} copies)",
            book.id, book.isbn, book.available_copies, book.total_copies
        );
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        data.validate()?;

        if let Some(author_id) = data.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        if let Some(Some(category_id)) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }

        let current_year = self.current_year();
        let book = self
            .repository
            .books
            .update_locked(id, |book| {
                data.apply_to(book);
                check_copies(book.total_copies, book.available_copies)?;
                check_publication_year(book.publication_year, current_year)
            })
            .await?;

        tracing::info!("Catalog update: book id={}", book.id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Catalog delete: book id={}", id);
        Ok(())
    }

    fn current_year(&self) -> i32 {
        self.clock.today().year()
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_category(&self, name: &str) -> AppResult<Category> {
        self.repository.categories.get_by_name(name).await
    }

    pub async fn create_category(&self, data: CreateCategory) -> AppResult<Category> {
        data.validate()?;
        let category = self.repository.categories.create(&data).await?;
        tracing::info!("Catalog create: category '{}'", category.name);
        Ok(category)
    }

    pub async fn update_category(&self, id: i32, data: UpdateCategory) -> AppResult<Category> {
        data.validate()?;
        self.repository.categories.update(id, &data).await
    }

    /// Delete a category. Its books are kept with no category.
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await?;
        tracing::info!("Catalog delete: category id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::MockClock, error::AppError};
    use chrono::NaiveDate;
    use sqlx::postgres::PgPoolOptions;

    /// Service over a pool that never connects; only pre-database checks can run.
    fn service_in(year: i32) -> CatalogService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://biblio@localhost/biblio_unused")
            .unwrap();
        let mut clock = MockClock::new();
        clock
            .expect_today()
            .returning(move || NaiveDate::from_ymd_opt(year, 6, 1).unwrap());
        CatalogService::new(Repository::new(pool), CatalogConfig::default(), Arc::new(clock))
    }

    fn new_book(year: i32, total: i32, available: Option<i32>) -> CreateBook {
        CreateBook {
            title: "Le Petit Prince".to_string(),
            isbn: "9782070612758".to_string(),
            publication_year: year,
            author_id: 1,
            category_id: None,
            total_copies: total,
            available_copies: available,
            description: None,
            language: "fr".to_string(),
            pages: 96,
            publisher: "Gallimard".to_string(),
            cover_image: None,
        }
    }

    #[tokio::test]
    async fn test_create_book_rejects_future_year() {
        let service = service_in(2026);
        let err = service.create_book(new_book(2027, 1, None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[tokio::test]
    async fn test_create_book_rejects_excess_available_copies() {
        let service = service_in(2026);
        let err = service.create_book(new_book(1943, 2, Some(3))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[test]
    fn test_page_window_defaults() {
        let window = PageWindow::resolve(None, None, &CatalogConfig::default());
        assert_eq!(
            window,
            PageWindow {
                page: 1,
                per_page: 50,
                offset: 0
            }
        );
    }

    #[test]
    fn test_page_window_offsets() {
        let window = PageWindow::resolve(Some(3), Some(20), &CatalogConfig::default());
        assert_eq!(window.offset, 40);
    }

    #[test]
    fn test_page_window_clamps() {
        let config = CatalogConfig::default();
        let window = PageWindow::resolve(Some(0), Some(10_000), &config);
        assert_eq!(window.page, 1);
        assert_eq!(window.per_page, config.max_page_size);

        let window = PageWindow::resolve(Some(-4), Some(0), &config);
        assert_eq!(window.page, 1);
        assert_eq!(window.per_page, 1);
    }

    #[test]
    fn test_page_window_with_zero_max_page_size() {
        let config = CatalogConfig {
            max_page_size: 0,
            ..CatalogConfig::default()
        };
        let window = PageWindow::resolve(Some(2), None, &config);
        assert_eq!(window.per_page, 1);
        assert_eq!(window.offset, 1);
    }
}
