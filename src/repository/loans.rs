//! Loans repository for database operations

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{CreateLoan, Loan, LoanDetails, LoanPolicy, LoanQuery, LoanRow, LoanStatus},
    },
};

const LOAN_SELECT: &str = r#"
    SELECT l.*, b.title AS book_title
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan with its book title
    pub async fn get_details(&self, id: i32, today: NaiveDate) -> AppResult<LoanDetails> {
        let query = format!("{} WHERE l.id = $1", LOAN_SELECT);
        sqlx::query_as::<_, LoanRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_details(today))
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))
    }

    /// Loans with ACTIVE status, soonest due first
    pub async fn list_active(&self, today: NaiveDate, limit: i64) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.status = $1 ORDER BY l.due_date, l.id LIMIT $2",
            LOAN_SELECT
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(LoanStatus::Active)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    /// Loans not returned whose due date is before `today`
    pub async fn list_overdue(&self, today: NaiveDate, limit: i64) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.returned_at IS NULL AND l.due_date < $1 ORDER BY l.due_date, l.id LIMIT $2",
            LOAN_SELECT
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(today)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    /// Every loan made on a card, most recent first
    pub async fn list_by_card(
        &self,
        card_number: &str,
        today: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.card_number = $1 ORDER BY l.borrowed_at DESC, l.id DESC LIMIT $2",
            LOAN_SELECT
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(card_number)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    /// Admin listing: status and borrowed-date filters, borrower search
    pub async fn filter(&self, query: &LoanQuery, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR l.status = $1)
              AND ($2::date IS NULL OR l.borrowed_at::date >= $2)
              AND ($3::date IS NULL OR l.borrowed_at::date <= $3)
              AND ($4::text IS NULL OR l.borrower_name ILIKE $4
                   OR l.borrower_email ILIKE $4 OR l.card_number ILIKE $4)
            ORDER BY l.borrowed_at DESC, l.id DESC
            "#,
            LOAN_SELECT
        );
        let rows = sqlx::query_as::<_, LoanRow>(&sql)
            .bind(query.status)
            .bind(query.borrowed_from)
            .bind(query.borrowed_to)
            .bind(query.q.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    /// Number of loans ever made on a card
    pub async fn count_by_card(&self, card_number: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE card_number = $1")
            .bind(card_number)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new loan.
    ///
    /// One transaction. The advisory lock keyed on the card number serializes
    /// admissions for a card; `FOR UPDATE` serializes everything touching the
    /// book. Lock order is card, then book.
    pub async fn create(
        &self,
        request: &CreateLoan,
        policy: &LoanPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<(Loan, Book)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('loans.card_number'), hashtext($1))")
            .bind(&request.card_number)
            .execute(&mut *tx)
            .await?;

        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(request.book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", request.book_id)))?;

        let active_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE card_number = $1 AND status = $2",
        )
        .bind(&request.card_number)
        .bind(LoanStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        // Dropping `tx` on error rolls back
        let new_loan = policy.admit(active_loans, &mut book, request, now)?;

        sqlx::query("UPDATE books SET available_copies = $1 WHERE id = $2")
            .bind(book.available_copies)
            .bind(book.id)
            .execute(&mut *tx)
            .await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, borrower_name, borrower_email, card_number,
                               borrowed_at, due_date, status, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_loan.book_id)
        .bind(&new_loan.borrower_name)
        .bind(&new_loan.borrower_email)
        .bind(&new_loan.card_number)
        .bind(new_loan.borrowed_at)
        .bind(new_loan.due_date)
        .bind(new_loan.status)
        .bind(&new_loan.comments)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((loan, book))
    }

    /// Mark a loan returned and restock its book in one transaction.
    pub async fn return_loan(&self, loan_id: i32, now: DateTime<Utc>) -> AppResult<(Loan, Book)> {
        let mut tx = self.pool.begin().await?;

        let mut loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", loan_id)))?;

        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(loan.book_id)
            .fetch_one(&mut *tx)
            .await?;

        loan.mark_returned(&mut book, now)?;

        sqlx::query("UPDATE books SET available_copies = $1 WHERE id = $2")
            .bind(book.available_copies)
            .bind(book.id)
            .execute(&mut *tx)
            .await?;

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = $1, returned_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(loan.status)
        .bind(loan.returned_at)
        .bind(loan.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((loan, book))
    }
}
