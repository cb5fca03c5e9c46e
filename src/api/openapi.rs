//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, authors, books, categories, health, loans, pages};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "0.1.0",
        description = "Library catalog and loan management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Pages
        pages::home,
        pages::about,
        pages::contact,
        // Books
        books::list_books,
        books::list_books_page,
        books::search_books,
        books::books_by_category,
        books::books_by_author,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::search_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Loans
        loans::list_active_loans,
        loans::list_overdue_loans,
        loans::get_card_loans,
        loans::get_loan,
        loans::create_loan,
        loans::return_loan,
        // Admin
        admin::list_categories,
        admin::list_authors,
        admin::list_books,
        admin::list_loans,
        admin::mark_books_unavailable,
        admin::mark_loans_returned,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::BookPage,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::category::Category,
            crate::models::category::CategoryWithCount,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            books::CategoryBooks,
            books::AuthorBooks,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::loan::SkippedLoan,
            crate::models::loan::BulkReturnReport,
            loans::ReturnResponse,
            // Admin
            admin::BulkSelection,
            admin::BulkUpdateResponse,
            // Pages
            pages::HomePage,
            pages::AboutPage,
            pages::ContactPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pages", description = "Home, about and contact pages"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Author management"),
        (name = "categories", description = "Category management"),
        (name = "loans", description = "Loan management"),
        (name = "admin", description = "Staff listings and bulk actions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_loan_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/loans"));
        assert!(doc.paths.paths.contains_key("/loans/return/{loan_id}"));
        assert!(doc.paths.paths.contains_key("/admin/loans/mark-returned"));
    }
}
