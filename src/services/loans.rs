//! Loan management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::loan::{BulkReturnReport, CreateLoan, LoanDetails, LoanPolicy, LoanRow, SkippedLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    policy: LoanPolicy,
    config: CatalogConfig,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        policy: LoanPolicy,
        config: CatalogConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            policy,
            config,
            clock,
        }
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Create a new loan (borrow a book)
    pub async fn create_loan(&self, request: CreateLoan) -> AppResult<LoanDetails> {
        request.validate()?;

        let now = self.clock.now();
        match self.repository.loans.create(&request, &self.policy, now).await {
            Ok((loan, book)) => {
                tracing::info!(
                    "Loan {} created: book {} to card {}, due {} ({} copies left)",
                    loan.id, book.id, loan.card_number, loan.due_date, book.available_copies
                );
                Ok(LoanRow {
                    loan,
                    book_title: book.title,
                }
                .into_details(now.date_naive()))
            }
            Err(e @ (AppError::LoanLimitExceeded { .. } | AppError::BookUnavailable(_))) => {
                tracing::warn!(
                    "Loan refused for card {} on book {}: {}",
                    request.card_number, request.book_id, e
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let now = self.clock.now();
        let (loan, book) = self.repository.loans.return_loan(loan_id, now).await?;

        tracing::info!(
            "Loan {} returned: book {} now has {}/{} copies available",
            loan.id, book.id, book.available_copies, book.total_copies
        );

        Ok(LoanRow {
            loan,
            book_title: book.title,
        }
        .into_details(now.date_naive()))
    }

    /// Return each loan independently; failures are reported, not propagated.
    pub async fn return_many(&self, loan_ids: &[i32]) -> AppResult<BulkReturnReport> {
        let mut report = BulkReturnReport::default();

        for &id in loan_ids {
            match self.return_loan(id).await {
                Ok(_) => report.returned.push(id),
                Err(e @ (AppError::NotFound(_) | AppError::BusinessRule(_))) => {
                    report.skipped.push(SkippedLoan {
                        id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id, self.clock.today()).await
    }

    pub async fn list_active(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository
            .loans
            .list_active(self.clock.today(), self.config.default_page_size)
            .await
    }

    /// Loans past due and not returned
    pub async fn list_overdue(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository
            .loans
            .list_overdue(self.clock.today(), self.config.default_page_size)
            .await
    }

    /// Loan history for a library card
    pub async fn card_history(&self, card_number: &str) -> AppResult<Vec<LoanDetails>> {
        self.repository
            .loans
            .list_by_card(card_number, self.clock.today(), self.config.history_limit)
            .await
    }

    pub async fn count_for_card(&self, card_number: &str) -> AppResult<i64> {
        self.repository.loans.count_by_card(card_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_admission() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://biblio@localhost/biblio_unused")
            .unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().never();
        let service = LoansService::new(
            Repository::new(pool),
            LoanPolicy::default(),
            CatalogConfig::default(),
            Arc::new(clock),
        );

        let request = CreateLoan {
            book_id: 1,
            borrower_name: "Test User".to_string(),
            borrower_email: "not-an-email".to_string(),
            card_number: "CARD1".to_string(),
            comments: None,
        };
        let err = service.create_loan(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.policy().max_active_loans, 5);
    }
}
