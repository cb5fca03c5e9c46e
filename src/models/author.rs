//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::book::BookShort;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub nationality: String,
    pub biography: String,
    /// Empty when unknown
    pub website: String,
    pub photo: Option<String>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Author with the books written (detail view)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub full_name: String,
    pub books: Vec<BookShort>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_lifespan", skip_on_field_errors = false))]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100))]
    pub nationality: String,
    pub biography: Option<String>,
    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
    #[validate(length(max = 255))]
    pub photo: Option<String>,
}

/// Update author request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// `null` marks the author as living
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub death_date: Option<Option<NaiveDate>>,
    #[validate(length(min = 1, max = 100))]
    pub nationality: Option<String>,
    pub biography: Option<String>,
    /// `null` clears the website
    #[validate(url(message = "Invalid website URL"))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    #[validate(length(max = 255))]
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub photo: Option<Option<String>>,
}

impl UpdateAuthor {
    /// Merge this update over an existing row
    pub fn apply_to(&self, author: &mut Author) {
        if let Some(ref first_name) = self.first_name {
            author.first_name = first_name.clone();
        }
        if let Some(ref last_name) = self.last_name {
            author.last_name = last_name.clone();
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = birth_date;
        }
        if let Some(death_date) = self.death_date {
            author.death_date = death_date;
        }
        if let Some(ref nationality) = self.nationality {
            author.nationality = nationality.clone();
        }
        if let Some(ref biography) = self.biography {
            author.biography = biography.clone();
        }
        if let Some(ref website) = self.website {
            author.website = website.clone().unwrap_or_default();
        }
        if let Some(ref photo) = self.photo {
            author.photo = photo.clone();
        }
    }
}

/// Admin author listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Substring of the first or last name
    pub q: Option<String>,
    /// Exact nationality
    pub nationality: Option<String>,
}

/// A death date, when known, cannot precede the birth date.
pub fn check_lifespan(birth: NaiveDate, death: Option<NaiveDate>) -> Result<(), ValidationError> {
    match death {
        Some(death) if death < birth => {
            let mut err = ValidationError::new("lifespan");
            err.message = Some("Death date precedes birth date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn validate_create_lifespan(author: &CreateAuthor) -> Result<(), ValidationError> {
    check_lifespan(author.birth_date, author.death_date)
}
