//! Loan (borrow) model, status and admission rules

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::Book;
use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
};

/// Loan status as stored in `loans.status`.
///
/// `Overdue` is accepted when reading but never written: lateness is derived
/// from `due_date` and `returned_at` (see [`Loan::is_overdue`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Returned => "RETURNED",
            LoanStatus::Overdue => "OVERDUE",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LoanStatus::Active),
            "RETURNED" => Ok(LoanStatus::Returned),
            "OVERDUE" => Ok(LoanStatus::Overdue),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// SQLx conversion for LoanStatus (TEXT column)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub borrower_name: String,
    pub borrower_email: String,
    pub card_number: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub comments: String,
}

impl Loan {
    /// Not yet returned and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.returned_at.is_none() && self.due_date < today
    }

    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }

    /// Close the loan and put the copy back on `book`'s shelf.
    pub fn mark_returned(&mut self, book: &mut Book, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_returned() {
            return Err(AppError::BusinessRule(format!(
                "Loan {} already returned",
                self.id
            )));
        }
        self.status = LoanStatus::Returned;
        self.returned_at = Some(now);
        book.restock_copy();
        Ok(())
    }
}

/// Loan joined with its book title, as listed to staff
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub is_overdue: bool,
}

/// Row shape for loan listings (loan columns plus `book_title`)
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    #[sqlx(flatten)]
    pub loan: Loan,
    pub book_title: String,
}

impl LoanRow {
    pub fn into_details(self, today: NaiveDate) -> LoanDetails {
        let is_overdue = self.loan.is_overdue(today);
        LoanDetails {
            loan: self.loan,
            book_title: self.book_title,
            is_overdue,
        }
    }
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub borrower_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub borrower_email: String,
    #[validate(length(min = 1, max = 50))]
    pub card_number: String,
    pub comments: Option<String>,
}

/// Loan row ready to insert, produced by [`LoanPolicy::admit`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub book_id: i32,
    pub borrower_name: String,
    pub borrower_email: String,
    pub card_number: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
    pub comments: String,
}

/// Per-card cap and loan duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub max_active_loans: i64,
    pub duration_days: i64,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            max_active_loans: 5,
            duration_days: 14,
        }
    }
}

impl From<&LoansConfig> for LoanPolicy {
    fn from(config: &LoansConfig) -> Self {
        Self {
            max_active_loans: config.max_active_loans,
            duration_days: config.duration_days,
        }
    }
}

impl LoanPolicy {
    pub fn due_date(&self, borrowed_on: NaiveDate) -> NaiveDate {
        borrowed_on + Duration::days(self.duration_days)
    }

    /// Decide whether `request` may borrow `book`.
    ///
    /// `active_loans` is the number of ACTIVE loans already held by the card.
    /// The card cap is checked before availability. On success one copy is
    /// taken from `book`; on failure `book` is left untouched.
    pub fn admit(
        &self,
        active_loans: i64,
        book: &mut Book,
        request: &CreateLoan,
        now: DateTime<Utc>,
    ) -> AppResult<NewLoan> {
        if active_loans >= self.max_active_loans {
            return Err(AppError::LoanLimitExceeded {
                card_number: request.card_number.clone(),
                limit: self.max_active_loans,
            });
        }

        book.lend_copy()?;

        Ok(NewLoan {
            book_id: book.id,
            borrower_name: request.borrower_name.clone(),
            borrower_email: request.borrower_email.clone(),
            card_number: request.card_number.clone(),
            borrowed_at: now,
            due_date: self.due_date(now.date_naive()),
            status: LoanStatus::Active,
            comments: request.comments.clone().unwrap_or_default(),
        })
    }
}

/// Admin loan listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    /// Search in borrower name, email and card number
    pub q: Option<String>,
    pub status: Option<LoanStatus>,
    /// Borrowed on or after this date
    pub borrowed_from: Option<NaiveDate>,
    /// Borrowed on or before this date
    pub borrowed_to: Option<NaiveDate>,
}

/// Why a loan was left out of a bulk return
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedLoan {
    pub id: i32,
    pub reason: String,
}

/// Outcome of the "mark loans returned" bulk action
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BulkReturnReport {
    pub returned: Vec<i32>,
    pub skipped: Vec<SkippedLoan>,
}
