//! Admin bulk actions and category deletion

use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::{create_author, create_book, get_json, post_json, unique, BASE_URL};

#[tokio::test]
#[ignore]
async fn test_mark_books_unavailable() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 3, tag).await;

    let (status, body) = post_json(
        &client,
        "/admin/books/mark-unavailable",
        json!({ "ids": [book_id] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 0);
    assert_eq!(book["total_copies"], 3);

    let (status, _) = post_json(&client, "/admin/books/mark-unavailable", json!({ "ids": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_deleting_category_keeps_its_books() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;

    let (status, category) = post_json(
        &client,
        "/categories",
        json!({ "name": format!("doomed-{}", tag) }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().expect("No category id");

    let book_id = create_book(&client, author_id, 1, tag).await;
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({ "category_id": category_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/categories/{}", BASE_URL, category_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(book["category_id"].is_null());
    assert!(book["category_name"].is_null());
}
