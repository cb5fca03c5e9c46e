//! Integration tests against a running server
//!
//! Start the server on a scratch database, then run
//! `cargo test --test integration -- --ignored`.

mod admin_tests;
mod api_tests;
mod concurrency_tests;
mod loan_tests;

use std::sync::Arc;

use biblio_server::{
    clock::Clock,
    config::AppConfig,
    repository::{self, Repository},
    services::Services,
};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Suffix that keeps names, ISBNs and cards unique across runs
pub fn unique() -> u64 {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    (nanos as u64) % 10_000_000_000_000
}

pub async fn post_json(client: &Client, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

pub async fn get_json(client: &Client, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Create an author and return its id
pub async fn create_author(client: &Client, tag: u64) -> i64 {
    let (status, body) = post_json(
        client,
        "/authors",
        json!({
            "first_name": "Test",
            "last_name": format!("Author{}", tag),
            "birth_date": "1970-01-01",
            "nationality": "FR"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "author: {}", body);
    body["id"].as_i64().expect("No author id")
}

/// Create a book with `copies` copies and return its id
pub async fn create_book(client: &Client, author_id: i64, copies: i32, tag: u64) -> i64 {
    let (status, body) = post_json(
        client,
        "/books",
        json!({
            "title": format!("Integration Book {}", tag),
            "isbn": format!("{:013}", tag),
            "publication_year": 2001,
            "author_id": author_id,
            "total_copies": copies,
            "language": "fr",
            "pages": 120,
            "publisher": "Gallimard"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "book: {}", body);
    body["id"].as_i64().expect("No book id")
}

pub async fn borrow(client: &Client, book_id: i64, card: &str) -> (StatusCode, Value) {
    post_json(
        client,
        "/loans",
        json!({
            "book_id": book_id,
            "borrower_name": "Test User",
            "borrower_email": "test@example.com",
            "card_number": card
        }),
    )
    .await
}

/// Wall clock moved by a fixed offset
pub struct ShiftedClock(pub Duration);

impl Clock for ShiftedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now() + self.0
    }
}

/// Services on the server's database, seeing time `shift` from now
pub async fn services_at(shift: Duration) -> Services {
    dotenvy::dotenv().ok();
    let mut config = AppConfig::load().expect("Failed to load configuration");
    config.catalog.default_page_size = 1_000_000;
    let pool = repository::connect(&config.database)
        .await
        .expect("Failed to connect to database");
    Services::new(Repository::new(pool), &config, Arc::new(ShiftedClock(shift)))
}
