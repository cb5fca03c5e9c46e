//! Demo data: default categories, random authors and books, one sample loan

use chrono::{Datelike, NaiveDate};
use rand::{seq::SliceRandom, Rng};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::CreateBook,
        category::{Category, CreateCategory},
        loan::CreateLoan,
    },
    services::Services,
};

/// (name, description) of the categories every install starts with
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("fiction", "Fiction générale"),
    ("sci-fi", "Science Fiction"),
    ("history", "Histoire"),
    ("programming", "Informatique"),
];

const FIRST_NAMES: [&str; 10] = [
    "Jean", "Marie", "Paul", "Luc", "Anne", "Pierre", "Sofia", "Marco", "Lina", "Omar",
];
const LAST_NAMES: [&str; 10] = [
    "Dupont", "Martin", "Bernard", "Durand", "Petit", "Leroy", "Moreau", "Rossi", "Garcia", "Khan",
];
const LANGUAGES: [&str; 2] = ["fr", "en"];
const PUBLISHERS: [&str; 4] = ["Penguin", "Gallimard", "O Reilly", "Springer"];

pub const SAMPLE_CARD: &str = "CARD123";

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub books: usize,
    pub authors: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self { books: 3, authors: 5 }
    }
}

/// What a seed run created (existing rows are reused, not counted)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub authors_created: usize,
    pub books_created: usize,
    pub sample_loan: Option<i32>,
}

/// Thirteen digits where digit `k` is `(n + k) mod 10`.
pub fn sample_isbn(n: usize) -> String {
    (0..13)
        .map(|k| char::from(b'0' + ((n + k) % 10) as u8))
        .collect()
}

/// Random author under a name drawn from the fixed pools
pub fn sample_author<R: Rng + ?Sized>(rng: &mut R) -> CreateAuthor {
    let first_name = FIRST_NAMES.choose(rng).copied().unwrap_or("Jean");
    let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("Dupont");
    let birth_date = NaiveDate::from_ymd_opt(
        1950 + rng.gen_range(0..=50),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
    )
    .unwrap_or(NaiveDate::MIN);

    CreateAuthor {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date,
        death_date: None,
        nationality: "FR".to_string(),
        biography: None,
        website: None,
        photo: None,
    }
}

/// Random book number `index` (1-based). Available copies never exceed the total.
pub fn sample_book<R: Rng + ?Sized>(
    rng: &mut R,
    index: usize,
    author_id: i32,
    category_id: i32,
    current_year: i32,
) -> CreateBook {
    let total_copies = rng.gen_range(1..=10);
    let available_copies = rng.gen_range(0..=5).min(total_copies);

    CreateBook {
        title: format!("Livre Exemple {}", index),
        isbn: sample_isbn(index),
        publication_year: rng.gen_range(1950..=current_year.max(1950)),
        author_id,
        category_id: Some(category_id),
        total_copies,
        available_copies: Some(available_copies),
        description: None,
        language: LANGUAGES.choose(rng).copied().unwrap_or("fr").to_string(),
        pages: rng.gen_range(50..=1000),
        publisher: PUBLISHERS.choose(rng).copied().unwrap_or("Penguin").to_string(),
        cover_image: None,
    }
}

/// Populate the database. Safe to run repeatedly.
pub async fn run<R: Rng + Send + ?Sized>(
    services: &Services,
    clock: &dyn Clock,
    options: SeedOptions,
    rng: &mut R,
) -> AppResult<SeedReport> {
    let repository = &services.repository;
    let mut report = SeedReport::default();

    let mut categories: Vec<Category> = Vec::with_capacity(DEFAULT_CATEGORIES.len());
    for (name, description) in DEFAULT_CATEGORIES {
        let category = match repository.categories.find_by_name(name).await? {
            Some(existing) => existing,
            None => {
                report.categories_created += 1;
                services
                    .catalog
                    .create_category(CreateCategory {
                        name: name.to_string(),
                        description: Some(description.to_string()),
                        image: None,
                    })
                    .await?
            }
        };
        categories.push(category);
    }

    let mut authors: Vec<Author> = Vec::with_capacity(options.authors);
    for _ in 0..options.authors {
        let candidate = sample_author(rng);
        let author = match repository
            .authors
            .find_by_name(&candidate.first_name, &candidate.last_name)
            .await?
        {
            Some(existing) => existing,
            None => {
                report.authors_created += 1;
                services.authors.create(candidate).await?
            }
        };
        authors.push(author);
    }

    if !authors.is_empty() {
        let current_year = clock.today().year();
        for i in 1..=options.books {
            let isbn = sample_isbn(i);
            if repository.books.find_by_isbn(&isbn).await?.is_some() {
                continue;
            }
            let author_id = authors.choose(rng).map(|a| a.id).unwrap_or(authors[0].id);
            let category_id = categories
                .choose(rng)
                .map(|c| c.id)
                .unwrap_or(categories[0].id);
            let data = sample_book(rng, i, author_id, category_id, current_year);
            services.catalog.create_book(data).await?;
            report.books_created += 1;
        }
    } else if options.books > 0 {
        tracing::warn!("Seed: no authors available, skipping {} book(s)", options.books);
    }

    let (_, first) = services.catalog.overview(1).await?;
    if let Some(book) = first.first() {
        if services.loans.count_for_card(SAMPLE_CARD).await? == 0 {
            let request = CreateLoan {
                book_id: book.id,
                borrower_name: "Test User".to_string(),
                borrower_email: "test@example.com".to_string(),
                card_number: SAMPLE_CARD.to_string(),
                comments: None,
            };
            match services.loans.create_loan(request).await {
                Ok(loan) => report.sample_loan = Some(loan.loan.id),
                Err(e @ AppError::BookUnavailable(_)) => {
                    tracing::warn!("Seed: sample loan skipped: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use validator::Validate;

    #[test]
    fn test_sample_isbn_digits() {
        assert_eq!(sample_isbn(1), "1234567890123");
        assert_eq!(sample_isbn(0), "0123456789012");
        assert_eq!(sample_isbn(11), sample_isbn(1));
    }

    #[test]
    fn test_sample_book_respects_copy_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for i in 1..=200 {
            let book = sample_book(&mut rng, i, 1, 1, 2026);
            let available = book.available_copies.unwrap();
            assert!(available >= 0 && available <= book.total_copies);
            assert!((1950..=2026).contains(&book.publication_year));
            assert!(book.validate().is_ok(), "invalid sample book {i}");
        }
    }

    #[test]
    fn test_sample_author_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let author = sample_author(&mut rng);
            assert!(FIRST_NAMES.contains(&author.first_name.as_str()));
            assert!(LAST_NAMES.contains(&author.last_name.as_str()));
            assert!(author.validate().is_ok());
        }
    }
}
