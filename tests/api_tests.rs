//! API integration tests
//!
//! These run against a live server. Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:3000/api";

/// Unique suffix so repeated runs don't trip unique constraints
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

async fn register_book(client: &Client, isbn: &str, copies: i32) -> Value {
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "title": "Test Book",
            "author": "Test Author",
            "copies": copies
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn register_person(client: &Client, kind: &str, dni: &str) -> Value {
    let response = client
        .post(format!("{}/person/{}", BASE_URL, kind))
        .json(&json!({
            "name": "Test",
            "lastname": "Person",
            "dni": dni
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["result"].clone()
}

#[tokio::test]
#[ignore]
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
async fn test_register_book_round_trip() {
    let client = Client::new();
    let isbn = format!("978-{}", unique_suffix());

    let book = register_book(&client, &isbn, 3).await;
    assert_eq!(book["isbn"], isbn.as_str());
    assert_eq!(book["copies"].as_array().expect("No copies").len(), 3);

    let book_id = book["id"].as_i64().expect("No book ID");
    let response = client
        .get(format!("{}/book/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let counts: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(counts["total"], 3);
    assert_eq!(counts["prestados"], 0);
    assert_eq!(counts["disponibles"], 3);
}

#[tokio::test]
#[ignore]
async fn test_register_book_duplicate_isbn() {
    let client = Client::new();
    let isbn = format!("978-{}", unique_suffix());

    register_book(&client, &isbn, 1).await;

    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "title": "Another",
            "author": "Author",
            "copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_register_book_rejects_zero_copies() {
    let client = Client::new();

    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({
            "isbn": format!("978-{}", unique_suffix()),
            "title": "T",
            "author": "A",
            "copies": 0
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_search_books() {
    let client = Client::new();
    let isbn = format!("978-{}", unique_suffix());

    register_book(&client, &isbn, 1).await;

    let response = client
        .get(format!("{}/book?search={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let result = body["result"].as_array().expect("No result array");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["isbn"], isbn.as_str());
}

#[tokio::test]
#[ignore]
async fn test_availability_unknown_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_register_member_and_librarian() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("{}", suffix % 100_000_000)).await;
    assert!(member["member_id"].is_string());
    assert!(member["enrollment_librarian"].is_null());
    assert_eq!(member["role_id"], 1);

    let librarian =
        register_person(&client, "bibliotecario", &format!("L{}", suffix % 10_000_000)).await;
    assert!(librarian["enrollment_librarian"].is_string());
    assert!(librarian["member_id"].is_null());
    assert_eq!(librarian["role_id"], 2);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_dni_across_roles() {
    let client = Client::new();
    let dni = format!("D{}", unique_suffix() % 10_000_000);

    register_person(&client, "socio", &dni).await;

    // Same dni under the other role must be rejected
    let response = client
        .post(format!("{}/person/bibliotecario", BASE_URL))
        .json(&json!({
            "name": "Test",
            "lastname": "Person",
            "dni": dni
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle_with_damage() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("M{}", suffix % 10_000_000)).await;
    let librarian =
        register_person(&client, "bibliotecario", &format!("B{}", suffix % 10_000_000)).await;
    let book = register_book(&client, &format!("978-{}", suffix), 1).await;
    let copy_id = book["copies"][0]["id"].as_i64().expect("No copy ID");

    // Create the loan
    let response = client
        .post(format!("{}/loan", BASE_URL))
        .json(&json!({
            "memberId": member["id"],
            "librarianId": librarian["id"],
            "copyId": copy_id,
            "dateFrom": "2025-03-01T00:00:00Z",
            "dateTo": "2025-03-15T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["result"]["id"].as_i64().expect("No loan ID");

    // The copy is now on loan
    let response = client
        .get(format!("{}/book/{}", BASE_URL, book["id"]))
        .send()
        .await
        .expect("Failed to send request");
    let counts: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(counts["prestados"], 1);
    assert_eq!(counts["disponibles"], 0);

    // A second loan on the same copy is rejected
    let response = client
        .post(format!("{}/loan", BASE_URL))
        .json(&json!({
            "memberId": member["id"],
            "librarianId": librarian["id"],
            "copyId": copy_id,
            "dateFrom": "2025-03-01T00:00:00Z",
            "dateTo": "2025-03-15T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Damaged return creates a debt
    let response = client
        .post(format!("{}/loan/{}/devolucion", BASE_URL, loan_id))
        .json(&json!({ "damaged": true, "damageAmount": 1500.00 }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let debt = &body["result"]["createdDebt"];
    assert_eq!(debt["member_id"], member["id"]);
    let debt_id = debt["id"].as_i64().expect("No debt ID");

    // Returning again is a conflict and never creates a second debt
    let response = client
        .post(format!("{}/loan/{}/devolucion", BASE_URL, loan_id))
        .json(&json!({ "damaged": true, "damageAmount": 1500.00 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The debt shows up under the member
    let response = client
        .get(format!(
            "{}/person/{}/deudas?onlyUnpaid=true",
            BASE_URL, member["id"]
        ))
        .send()
        .await
        .expect("Failed to send request");
    let debts: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(debts.as_array().expect("No debts array").len(), 1);

    // Pay once, then a repeat is a conflict
    let response = client
        .post(format!("{}/loan/{}/pagarDeuda", BASE_URL, debt_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/loan/{}/pagarDeuda", BASE_URL, debt_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_return_damaged_requires_positive_amount() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("N{}", suffix % 10_000_000)).await;
    let librarian =
        register_person(&client, "bibliotecario", &format!("O{}", suffix % 10_000_000)).await;
    let book = register_book(&client, &format!("978-{}", suffix), 1).await;

    let response = client
        .post(format!("{}/loan", BASE_URL))
        .json(&json!({
            "memberId": member["id"],
            "librarianId": librarian["id"],
            "copyId": book["copies"][0]["id"],
            "dateFrom": "2025-03-01T00:00:00Z",
            "dateTo": "2025-03-15T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["result"]["id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loan/{}/devolucion", BASE_URL, loan_id))
        .json(&json!({ "damaged": true, "damageAmount": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_loan_rejects_inverted_dates() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("P{}", suffix % 10_000_000)).await;
    let librarian =
        register_person(&client, "bibliotecario", &format!("Q{}", suffix % 10_000_000)).await;
    let book = register_book(&client, &format!("978-{}", suffix), 1).await;

    let response = client
        .post(format!("{}/loan", BASE_URL))
        .json(&json!({
            "memberId": member["id"],
            "librarianId": librarian["id"],
            "copyId": book["copies"][0]["id"],
            "dateFrom": "2025-03-15T00:00:00Z",
            "dateTo": "2025-03-01T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_loans_on_same_copy() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("R{}", suffix % 10_000_000)).await;
    let librarian =
        register_person(&client, "bibliotecario", &format!("S{}", suffix % 10_000_000)).await;
    let book = register_book(&client, &format!("978-{}", suffix), 1).await;
    let copy_id = book["copies"][0]["id"].as_i64().expect("No copy ID");

    let body = json!({
        "memberId": member["id"],
        "librarianId": librarian["id"],
        "copyId": copy_id,
        "dateFrom": "2025-03-01T00:00:00Z",
        "dateTo": "2025-03-15T00:00:00Z"
    });

    let first = client.post(format!("{}/loan", BASE_URL)).json(&body).send();
    let second = client.post(format!("{}/loan", BASE_URL)).json(&body).send();

    let (first, second) = tokio::join!(first, second);
    let statuses = [
        first.expect("Failed to send request").status(),
        second.expect("Failed to send request").status(),
    ];

    // Exactly one wins, the other observes the copy as unavailable
    assert_eq!(statuses.iter().filter(|s| s.as_u16() == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|s| s.as_u16() == 409).count(), 1);

    let response = client
        .get(format!("{}/book/{}", BASE_URL, book["id"]))
        .send()
        .await
        .expect("Failed to send request");
    let counts: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(counts["prestados"], 1);
}

#[tokio::test]
#[ignore]
async fn test_active_loans_are_denormalized() {
    let client = Client::new();
    let suffix = unique_suffix();

    let member = register_person(&client, "socio", &format!("T{}", suffix % 10_000_000)).await;
    let librarian =
        register_person(&client, "bibliotecario", &format!("U{}", suffix % 10_000_000)).await;
    let book = register_book(&client, &format!("978-{}", suffix), 1).await;

    let response = client
        .post(format!("{}/loan", BASE_URL))
        .json(&json!({
            "memberId": member["id"],
            "librarianId": librarian["id"],
            "copyId": book["copies"][0]["id"],
            "dateFrom": "2025-03-01T00:00:00Z",
            "dateTo": "2025-03-15T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["result"]["id"].as_i64().expect("No loan ID");

    let response = client
        .get(format!("{}/loan/active", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let loans: Value = response.json().await.expect("Failed to parse response");
    let loan = loans
        .as_array()
        .expect("No loans array")
        .iter()
        .find(|l| l["id"].as_i64() == Some(loan_id))
        .expect("Created loan not listed");

    assert_eq!(loan["member"]["id"], member["id"]);
    assert_eq!(loan["librarian"]["id"], librarian["id"]);
    assert_eq!(loan["copy"]["book"]["id"], book["id"]);
    assert!(loan["returned_at"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_available_books_listing() {
    let client = Client::new();
    let suffix = unique_suffix();
    let isbn = format!("978-{}", suffix);

    register_book(&client, &isbn, 2).await;

    let response = client
        .get(format!(
            "{}/book/available?search={}&limit=50&offset=0",
            BASE_URL, isbn
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let books: Value = response.json().await.expect("Failed to parse response");
    let books = books.as_array().expect("No books array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["availableCount"], 2);
    assert_eq!(
        books[0]["availableCopies"]
            .as_array()
            .expect("No copies array")
            .len(),
        2
    );
}
