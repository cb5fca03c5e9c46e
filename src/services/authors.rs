//! Author management service

use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::author::{check_lifespan, Author, AuthorDetails, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    config: CatalogConfig,
}

impl AuthorsService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list(self.config.default_page_size).await
    }

    pub async fn search(&self, q: &str) -> AppResult<Vec<Author>> {
        self.repository.authors.search(q.trim(), self.config.search_limit).await
    }

    /// Author with the books they wrote
    pub async fn get(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self
            .repository
            .books
            .list_by_author(id, self.config.search_limit)
            .await?;
        Ok(AuthorDetails {
            full_name: author.full_name(),
            author,
            books,
        })
    }

    pub async fn create(&self, data: CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(&data).await?;
        tracing::info!("Author created: {} (id={})", author, author.id);
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        data.validate()?;

        let author = self
            .repository
            .authors
            .update_locked(id, |author| {
                data.apply_to(author);
                check_lifespan(author.birth_date, author.death_date).map_err(|e| {
                    AppError::Validation(
                        e.message
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
            })
            .await?;

        tracing::info!("Author updated: {} (id={})", author, author.id);
        Ok(author)
    }

    /// Delete an author with no books
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Author deleted: id={}", id);
        Ok(())
    }
}
