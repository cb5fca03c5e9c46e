//! API handlers for the Biblio REST endpoints

pub mod admin;
pub mod authors;
pub mod books;
pub mod categories;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Pages
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/page/:page", get(books::list_books_page))
        .route("/books/search", get(books::search_books))
        .route("/books/category/:category_slug", get(books::books_by_category))
        .route("/books/author/:author_id", get(books::books_by_author))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route("/authors/search", get(authors::search_authors))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Categories: read by name, write by id
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:category",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Loans
        .route("/loans", post(loans::create_loan))
        .route("/loans/create", post(loans::create_loan))
        .route("/loans/active", get(loans::list_active_loans))
        .route("/loans/overdue", get(loans::list_overdue_loans))
        .route("/loans/user/:card_number", get(loans::get_card_loans))
        .route("/loans/return/:loan_id", post(loans::return_loan))
        .route("/loans/:id", get(loans::get_loan))
        // Admin
        .route("/admin/categories", get(admin::list_categories))
        .route("/admin/authors", get(admin::list_authors))
        .route("/admin/books", get(admin::list_books))
        .route("/admin/loans", get(admin::list_loans))
        .route("/admin/books/mark-unavailable", post(admin::mark_books_unavailable))
        .route("/admin/loans/mark-returned", post(admin::mark_loans_returned))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
