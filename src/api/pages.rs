//! Home, about and contact pages

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::book::BookShort, AppState};

const HOME_LATEST: i64 = 5;

#[derive(Serialize, ToSchema)]
pub struct HomePage {
    pub library: String,
    pub books_count: i64,
    /// First books of the catalog
    pub books: Vec<BookShort>,
}

#[derive(Serialize, ToSchema)]
pub struct AboutPage {
    pub library: String,
    pub version: String,
    pub max_active_loans: i64,
    pub loan_duration_days: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ContactPage {
    pub library: String,
    pub email: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses(
        (status = 200, description = "Home page", body = HomePage)
    )
)]
pub async fn home(State(state): State<AppState>) -> AppResult<Json<HomePage>> {
    let (books_count, books) = state.services.catalog.overview(HOME_LATEST).await?;
    Ok(Json(HomePage {
        library: state.config.library.name.clone(),
        books_count,
        books,
    }))
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "pages",
    responses(
        (status = 200, description = "About page", body = AboutPage)
    )
)]
pub async fn about(State(state): State<AppState>) -> Json<AboutPage> {
    let policy = state.services.loans.policy();
    Json(AboutPage {
        library: state.config.library.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        max_active_loans: policy.max_active_loans,
        loan_duration_days: policy.duration_days,
    })
}

#[utoipa::path(
    get,
    path = "/contact",
    tag = "pages",
    responses(
        (status = 200, description = "Contact page", body = ContactPage)
    )
)]
pub async fn contact(State(state): State<AppState>) -> Json<ContactPage> {
    Json(ContactPage {
        library: state.config.library.name.clone(),
        email: state.config.library.contact_email.clone(),
    })
}
