//! Simultaneous loan and return requests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::task::JoinSet;

use crate::{borrow, create_author, create_book, get_json, post_json, unique};

/// Send one borrow request per card at the same time
async fn borrow_all(client: &Client, requests: Vec<(i64, String)>) -> Vec<(StatusCode, Value)> {
    let mut set = JoinSet::new();
    for (book_id, card) in requests {
        let client = client.clone();
        set.spawn(async move { borrow(&client, book_id, &card).await });
    }

    let mut results = Vec::new();
    while let Some(result) = set.join_next().await {
        results.push(result.expect("borrow task panicked"));
    }
    results
}

#[tokio::test]
#[ignore]
async fn test_last_copy_goes_to_one_borrower() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 1, tag).await;

    let requests = (0..8).map(|i| (book_id, format!("R{}-{}", tag, i))).collect();
    let results = borrow_all(&client, requests).await;

    let created = results.iter().filter(|(s, _)| *s == StatusCode::CREATED).count();
    let refused = results
        .iter()
        .filter(|(s, body)| *s == StatusCode::UNPROCESSABLE_ENTITY && body["code"] == 8)
        .count();
    assert_eq!(created, 1);
    assert_eq!(refused, 7);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 0);
}

#[tokio::test]
#[ignore]
async fn test_card_cap_holds_under_simultaneous_loans() {
    let client = Client::new();
    let tag = unique();
    let card = format!("CAP{}", tag);
    let author_id = create_author(&client, tag).await;

    for i in 0..4 {
        let book_id = create_book(&client, author_id, 1, tag + 1 + i).await;
        let (status, body) = borrow(&client, book_id, &card).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let mut requests = Vec::new();
    for i in 0..6 {
        let book_id = create_book(&client, author_id, 2, tag + 10 + i).await;
        requests.push((book_id, card.clone()));
    }
    let results = borrow_all(&client, requests).await;

    let created = results.iter().filter(|(s, _)| *s == StatusCode::CREATED).count();
    let limited = results
        .iter()
        .filter(|(s, body)| *s == StatusCode::UNPROCESSABLE_ENTITY && body["code"] == 7)
        .count();
    assert_eq!(created, 1);
    assert_eq!(limited, 5);

    let (_, history) = get_json(&client, &format!("/loans/user/{}", card)).await;
    let active = history
        .as_array()
        .expect("history")
        .iter()
        .filter(|loan| loan["status"] == "ACTIVE")
        .count();
    assert_eq!(active, 5);
}

#[tokio::test]
#[ignore]
async fn test_simultaneous_returns_restock_once() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    // Two of three copies out, so a second restock would not be hidden by the cap
    let book_id = create_book(&client, author_id, 3, tag).await;
    let (_, loan) = borrow(&client, book_id, &format!("A{}", tag)).await;
    let (status, _) = borrow(&client, book_id, &format!("B{}", tag)).await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = loan["id"].as_i64().expect("No loan id");

    let mut set = JoinSet::new();
    for _ in 0..2 {
        let client = client.clone();
        let path = format!("/loans/return/{}", loan_id);
        set.spawn(async move { post_json(&client, &path, json!({})).await });
    }
    let mut statuses = Vec::new();
    while let Some(result) = set.join_next().await {
        statuses.push(result.expect("return task panicked").0);
    }
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::UNPROCESSABLE_ENTITY]);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 2);
}
