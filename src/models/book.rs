//! Book (catalog entry) model, copy-count invariant and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Printing press; nothing older is catalogued
pub const MIN_PUBLICATION_YEAR: i32 = 1450;

/// ISBN-10 (optional trailing X) or ISBN-13, without separators
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").expect("valid ISBN regex"));

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub author_id: i32,
    pub category_id: Option<i32>,
    /// Owned stock
    pub total_copies: i32,
    /// Currently lendable stock, never above `total_copies`
    pub available_copies: i32,
    pub description: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Take one copy off the shelf for a new loan.
    pub fn lend_copy(&mut self) -> AppResult<()> {
        if !self.is_available() {
            return Err(AppError::BookUnavailable(self.id));
        }
        self.available_copies -= 1;
        Ok(())
    }

    /// Put a returned copy back. Returns whether the count changed; stock is
    /// never raised above `total_copies`.
    pub fn restock_copy(&mut self) -> bool {
        if self.available_copies < self.total_copies {
            self.available_copies += 1;
            true
        } else {
            false
        }
    }
}

/// Compact book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub available_copies: i32,
}

/// Book with its author and category names resolved (detail and admin views)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub author_name: String,
    pub category_name: Option<String>,
}

/// Paginated book list
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<BookShort>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(regex(path = *ISBN_RE, message = "ISBN must be 10 or 13 characters without separators"))]
    pub isbn: String,
    pub publication_year: i32,
    pub author_id: i32,
    pub category_id: Option<i32>,
    #[validate(range(min = 0))]
    pub total_copies: i32,
    /// Defaults to `total_copies`
    #[validate(range(min = 0))]
    pub available_copies: Option<i32>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    #[validate(range(min = 0))]
    pub pages: i32,
    #[validate(length(min = 1, max = 200))]
    pub publisher: String,
    #[validate(length(max = 255))]
    pub cover_image: Option<String>,
}

/// Update book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(regex(path = *ISBN_RE, message = "ISBN must be 10 or 13 characters without separators"))]
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<i32>,
    /// `Some(None)` clears the category
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[validate(range(min = 0))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0))]
    pub available_copies: Option<i32>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub language: Option<String>,
    #[validate(range(min = 0))]
    pub pages: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub publisher: Option<String>,
    #[validate(length(max = 255))]
    pub cover_image: Option<String>,
}

impl UpdateBook {
    /// Merge this update over an existing row
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref isbn) = self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(year) = self.publication_year {
            book.publication_year = year;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        if let Some(category_id) = self.category_id {
            book.category_id = category_id;
        }
        if let Some(total) = self.total_copies {
            book.total_copies = total;
        }
        if let Some(available) = self.available_copies {
            book.available_copies = available;
        }
        if let Some(ref description) = self.description {
            book.description = description.clone();
        }
        if let Some(ref language) = self.language {
            book.language = language.clone();
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(ref publisher) = self.publisher {
            book.publisher = publisher.clone();
        }
        if let Some(ref cover) = self.cover_image {
            book.cover_image = Some(cover.clone());
        }
    }
}

/// Paging parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

/// Free-text search parameter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Admin book listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Search in title, ISBN and author last name
    pub q: Option<String>,
    pub category_id: Option<i32>,
    pub author_id: Option<i32>,
    pub publication_year: Option<i32>,
}

/// Copy counts must satisfy `0 <= available <= total`.
pub fn check_copies(total: i32, available: i32) -> AppResult<()> {
    if total < 0 || available < 0 {
        return Err(AppError::Validation(
            "Copy counts cannot be negative".to_string(),
        ));
    }
    if available > total {
        return Err(AppError::Validation(format!(
            "Available copies ({}) cannot exceed total copies ({})",
            available, total
        )));
    }
    Ok(())
}

/// Publication year must lie in `[1450, current_year]`.
pub fn check_publication_year(year: i32, current_year: i32) -> AppResult<()> {
    if year < MIN_PUBLICATION_YEAR || year > current_year {
        return Err(AppError::Validation(format!(
            "Publication year {} must be between {} and {}",
            year, MIN_PUBLICATION_YEAR, current_year
        )));
    }
    Ok(())
}
