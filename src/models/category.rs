//! Category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Category record. `name` doubles as the URL slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Relative path of the category picture
    pub image: Option<String>,
}

/// Category row with the number of attached books (admin listing)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryWithCount {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub books_count: i64,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

/// Update category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

/// Admin category search
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Substring of the category name
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        let create = CreateCategory {
            name: String::new(),
            description: None,
            image: None,
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_valid_category() {
        let create = CreateCategory {
            name: "sci-fi".to_string(),
            description: Some("Science Fiction".to_string()),
            image: None,
        };
        assert!(create.validate().is_ok());
    }
}
