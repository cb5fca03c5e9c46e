//! Staff listings and bulk actions

use std::sync::Arc;

use crate::{
    clock::Clock,
    error::AppResult,
    models::{
        author::{Author, AuthorQuery},
        book::{BookDetails, BookQuery},
        category::{CategoryQuery, CategoryWithCount},
        loan::{BulkReturnReport, LoanDetails, LoanQuery},
    },
    repository::Repository,
};

use super::loans::LoansService;

#[derive(Clone)]
pub struct AdminService {
    repository: Repository,
    loans: LoansService,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    pub fn new(repository: Repository, loans: LoansService, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            loans,
            clock,
        }
    }

    pub async fn categories(&self, query: &CategoryQuery) -> AppResult<Vec<CategoryWithCount>> {
        self.repository
            .categories
            .list_with_counts(query.q.as_deref())
            .await
    }

    pub async fn authors(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        self.repository.authors.filter(query).await
    }

    pub async fn books(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        self.repository.books.filter(query).await
    }

    pub async fn loans(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.filter(query, self.clock.today()).await
    }

    /// Set `available_copies = 0` on every selected book
    pub async fn mark_books_unavailable(&self, book_ids: &[i32]) -> AppResult<u64> {
        let updated = self.repository.books.mark_unavailable(book_ids).await?;
        tracing::info!(
            "Admin: marked {} of {} selected book(s) unavailable",
            updated,
            book_ids.len()
        );
        Ok(updated)
    }

    /// Run the return workflow on every selected loan
    pub async fn mark_loans_returned(&self, loan_ids: &[i32]) -> AppResult<BulkReturnReport> {
        let report = self.loans.return_many(loan_ids).await?;
        tracing::info!(
            "Admin: returned {} loan(s), skipped {}",
            report.returned.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
