//! Staff listings and bulk actions

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorQuery},
        book::{BookDetails, BookQuery},
        category::{CategoryQuery, CategoryWithCount},
        loan::{BulkReturnReport, LoanDetails, LoanQuery},
    },
    AppState,
};

/// Selection for a bulk action
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkSelection {
    pub ids: Vec<i32>,
}

impl BulkSelection {
    fn ids(&self) -> AppResult<&[i32]> {
        if self.ids.is_empty() {
            return Err(AppError::BadRequest("No rows selected".to_string()));
        }
        Ok(&self.ids)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    /// Number of rows changed
    pub updated: u64,
}

#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "admin",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Categories with their book count", body = Vec<CategoryWithCount>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    Ok(Json(state.services.admin.categories(&query).await?))
}

#[utoipa::path(
    get,
    path = "/admin/authors",
    tag = "admin",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Filtered authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Vec<Author>>> {
    Ok(Json(state.services.admin.authors(&query).await?))
}

#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    params(BookQuery),
    responses(
        (status = 200, description = "Filtered books with author and category names", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    Ok(Json(state.services.admin.books(&query).await?))
}

#[utoipa::path(
    get,
    path = "/admin/loans",
    tag = "admin",
    params(LoanQuery),
    responses(
        (status = 200, description = "Filtered loans", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    Ok(Json(state.services.admin.loans(&query).await?))
}

/// Set the available copies of every selected book to zero
#[utoipa::path(
    post,
    path = "/admin/books/mark-unavailable",
    tag = "admin",
    request_body = BulkSelection,
    responses(
        (status = 200, description = "Books updated", body = BulkUpdateResponse),
        (status = 400, description = "Empty selection")
    )
)]
pub async fn mark_books_unavailable(
    State(state): State<AppState>,
    Json(selection): Json<BulkSelection>,
) -> AppResult<Json<BulkUpdateResponse>> {
    let updated = state
        .services
        .admin
        .mark_books_unavailable(selection.ids()?)
        .await?;
    Ok(Json(BulkUpdateResponse { updated }))
}

/// Return every selected loan that is still out
#[utoipa::path(
    post,
    path = "/admin/loans/mark-returned",
    tag = "admin",
    request_body = BulkSelection,
    responses(
        (status = 200, description = "Returned and skipped loans", body = BulkReturnReport),
        (status = 400, description = "Empty selection")
    )
)]
pub async fn mark_loans_returned(
    State(state): State<AppState>,
    Json(selection): Json<BulkSelection>,
) -> AppResult<Json<BulkReturnReport>> {
    let report = state
        .services
        .admin
        .mark_loans_returned(selection.ids()?)
        .await?;
    Ok(Json(report))
}
