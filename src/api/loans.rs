//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails},
    AppState,
};

/// Return response with loan details
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Loan details
    pub loan: LoanDetails,
}

/// Loans not yet returned
#[utoipa::path(
    get,
    path = "/loans/active",
    tag = "loans",
    responses(
        (status = 200, description = "Active loans, soonest due first", body = Vec<LoanDetails>)
    )
)]
pub async fn list_active_loans(State(state): State<AppState>) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_active().await?;
    Ok(Json(loans))
}

/// Loans past their due date and not returned
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Overdue loans", body = Vec<LoanDetails>)
    )
)]
pub async fn list_overdue_loans(State(state): State<AppState>) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_overdue().await?;
    Ok(Json(loans))
}

/// Loan history of a library card
#[utoipa::path(
    get,
    path = "/loans/user/{card_number}",
    tag = "loans",
    params(
        ("card_number" = String, Path, description = "Library card number")
    ),
    responses(
        (status = 200, description = "Loans of the card, newest first", body = Vec<LoanDetails>)
    )
)]
pub async fn get_card_loans(
    State(state): State<AppState>,
    Path(card_number): Path<String>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.card_history(&card_number).await?;
    Ok(Json(loans))
}

#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Create a new loan (borrow a book)
///
/// Also served at `/loans/create`.
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanDetails),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Card at its loan limit or no copy available")
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    let loan = state.services.loans.create_loan(request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return/{loan_id}",
    tag = "loans",
    params(
        ("loan_id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 422, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_loan(loan_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan,
    }))
}
