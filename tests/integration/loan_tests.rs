//! Loan admission and return scenarios

use biblio_server::models::loan::LoanStatus;
use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::{borrow, create_author, create_book, get_json, post_json, services_at, unique, BASE_URL};

#[tokio::test]
#[ignore]
async fn test_sixth_active_loan_is_refused() {
    let client = Client::new();
    let tag = unique();
    let card = format!("CARD{}", tag);
    let author_id = create_author(&client, tag).await;

    for i in 0..5 {
        let book_id = create_book(&client, author_id, 1, tag + 1 + i).await;
        let (status, body) = borrow(&client, book_id, &card).await;
        assert_eq!(status, StatusCode::CREATED, "loan {}: {}", i + 1, body);
        assert_eq!(body["status"], "ACTIVE");
        assert_eq!(body["is_overdue"], false);
    }

    let book_id = create_book(&client, author_id, 1, tag + 6).await;
    let (status, body) = borrow(&client, book_id, &card).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 7);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 1);

    let (status, history) = get_json(&client, &format!("/loans/user/{}", card)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().expect("history").len(), 5);
}

#[tokio::test]
#[ignore]
async fn test_borrow_without_available_copy() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 1, tag).await;

    let (status, _) = borrow(&client, book_id, &format!("A{}", tag)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = borrow(&client, book_id, &format!("B{}", tag)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 8);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 0);
}

#[tokio::test]
#[ignore]
async fn test_return_restores_copy_once() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 2, tag).await;

    let (status, loan) = borrow(&client, book_id, &format!("CARD{}", tag)).await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = loan["id"].as_i64().expect("No loan id");

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 1);

    let (status, body) = post_json(&client, &format!("/loans/return/{}", loan_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan"]["status"], "RETURNED");
    assert!(body["loan"]["returned_at"].is_string());

    let (status, _) = post_json(&client, &format!("/loans/return/{}", loan_id), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, book) = get_json(&client, &format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 2);
}

#[tokio::test]
#[ignore]
async fn test_book_with_loans_is_protected() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 1, tag).await;
    let (status, _) = borrow(&client, book_id, &format!("CARD{}", tag)).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_bulk_return_reports_skipped_loans() {
    let client = Client::new();
    let tag = unique();
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 1, tag).await;
    let (_, loan) = borrow(&client, book_id, &format!("CARD{}", tag)).await;
    let loan_id = loan["id"].as_i64().expect("No loan id");

    let (status, report) = post_json(
        &client,
        "/admin/loans/mark-returned",
        json!({ "ids": [loan_id, loan_id, 0] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["returned"], json!([loan_id]));
    assert_eq!(report["skipped"].as_array().expect("skipped").len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_overdue_listing_is_derived_from_due_date() {
    let client = Client::new();
    let tag = unique();
    let card = format!("LATE{}", tag);
    let author_id = create_author(&client, tag).await;
    let book_id = create_book(&client, author_id, 1, tag).await;
    let (status, loan) = borrow(&client, book_id, &card).await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = loan["id"].as_i64().expect("No loan id") as i32;

    let (status, overdue) = get_json(&client, "/loans/overdue").await;
    assert_eq!(status, StatusCode::OK);
    assert!(overdue
        .as_array()
        .expect("overdue")
        .iter()
        .all(|l| l["id"].as_i64() != Some(loan_id as i64)));

    // Default loan length is 14 days
    let later = services_at(Duration::days(15)).await;
    let overdue = later.loans.list_overdue().await.expect("overdue listing");
    let late = overdue
        .iter()
        .find(|l| l.loan.id == loan_id)
        .expect("loan listed as overdue");
    assert!(late.is_overdue);
    assert_eq!(late.loan.status, LoanStatus::Active);

    let now = services_at(Duration::zero()).await;
    let overdue = now.loans.list_overdue().await.expect("overdue listing");
    assert!(overdue.iter().all(|l| l.loan.id != loan_id));

    later.loans.return_loan(loan_id).await.expect("return");
    let overdue = later.loans.list_overdue().await.expect("overdue listing");
    assert!(overdue.iter().all(|l| l.loan.id != loan_id));
}
