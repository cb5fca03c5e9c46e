//! API integration tests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::{create_author, create_book, get_json, post_json, unique, BASE_URL};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let (status, body) = get_json(&Client::new(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_contact_page() {
    let (status, body) = get_json(&Client::new(), "/contact").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["email"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_list_books_paginated() {
    let (status, body) = get_json(&Client::new(), "/books?page=1&per_page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["books"].as_array().expect("books").len() <= 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 2);
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 3, tag).await;

    let (status, body) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_copies"], 3);
    assert_eq!(body["author_name"], format!("Test Author{}", tag));

    let (status, body) = get_json(&client, &format!("/books/search?q=integration book {}", tag)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("results").len(), 1);

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Renamed");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_bad_copy_counts() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;

    let (status, _) = post_json(
        &client,
        "/books",
        json!({
            "title": "Too many available",
            "isbn": format!("{:013}", tag),
            "publication_year": 2001,
            "author_id": author_id,
            "total_copies": 2,
            "available_copies": 3,
            "language": "fr",
            "pages": 120,
            "publisher": "Gallimard"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_category_conflicts() {
    let client = Client::new();
    let name = format!("category-{}", unique());

    let (status, _) = post_json(&client, "/categories", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post_json(&client, "/categories", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = get_json(&client, &format!("/categories/{}", name)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], name);
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_is_protected() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    create_book(&client, author_id, 1, tag).await;

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (status, body) = get_json(&client, &format!("/authors/{}", author_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_array().expect("books").len(), 1);
}
