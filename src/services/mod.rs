//! Business logic services

pub mod admin;
pub mod authors;
pub mod catalog;
pub mod loans;

use std::sync::Arc;

use crate::{clock::Clock, config::AppConfig, models::loan::LoanPolicy, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub loans: loans::LoansService,
    pub admin: admin::AdminService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository and time source
    pub fn new(repository: Repository, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let policy = LoanPolicy::from(&config.loans);
        let loans = loans::LoansService::new(
            repository.clone(),
            policy,
            config.catalog.clone(),
            clock.clone(),
        );

        Self {
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.clone(), clock.clone()),
            authors: authors::AuthorsService::new(repository.clone(), config.catalog.clone()),
            admin: admin::AdminService::new(repository.clone(), loans.clone(), clock),
            loans,
            repository,
        }
    }
}
