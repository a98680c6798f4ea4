//! API integration tests.
//!
//! These run against a live server with a database behind it:
//! `cargo test -- --ignored`

use reqwest::{redirect, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

/// Client that does not follow redirects, so 303 responses stay observable
fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Create an author through the form endpoint and return the redirect target
async fn create_author(client: &Client, first_name: &str, family_name: &str) -> String {
    let response = client
        .post(format!("{}/catalog/author/create", BASE_URL))
        .form(&[("first_name", first_name), ("family_name", family_name)])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get("location")
        .expect("No redirect location")
        .to_str()
        .unwrap()
        .to_string()
}

/// Create a genre through the form endpoint and return the redirect target
async fn create_genre(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .form(&[("name", name)])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get("location")
        .expect("No redirect location")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let response = client()
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
async fn test_home_page_has_five_counts() {
    let response = client()
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Local Library Home");
    for count in [
        "book_count",
        "book_instance_count",
        "book_instance_available_count",
        "author_count",
        "genre_count",
    ] {
        assert!(body["data"][count].is_number(), "missing {}", count);
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_route_is_404() {
    let response = client()
        .get(format!("{}/catalog/nonsense", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_author_create_appears_in_sorted_list() {
    let client = client();
    let location = create_author(&client, "Jane", "Austen").await;
    assert!(location.starts_with("/catalog/author/"));

    let response = client
        .get(format!("{}/catalog/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let names: Vec<String> = body["author_list"]
        .as_array()
        .expect("author_list is not an array")
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();

    assert!(names.iter().any(|n| n == "Austen, Jane"));

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "author list is not sorted by family name");
}

#[tokio::test]
#[ignore]
async fn test_author_create_validation_errors_rerender_form() {
    let response = client()
        .post(format!("{}/catalog/author/create", BASE_URL))
        .form(&[
            ("first_name", ""),
            ("family_name", "Aus10!"),
            ("date_of_birth", "not-a-date"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].as_array().expect("errors is not an array");
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"first_name"));
    assert!(fields.contains(&"family_name"));
    assert!(fields.contains(&"date_of_birth"));
}

#[tokio::test]
#[ignore]
async fn test_genre_double_create_resolves_to_same_record() {
    let client = client();
    let name = format!("Test Genre {}", std::process::id());

    let first = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let first_url = first.headers()["location"].to_str().unwrap().to_string();

    let second = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    let second_url = second.headers()["location"].to_str().unwrap().to_string();

    // Both submissions converge on one identity
    assert_eq!(first_url, second_url);

    let list: Value = client
        .get(format!("{}/catalog/genres", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let matching = list["genre_list"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|g| g["name"] == name.as_str())
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_is_not_deletable() {
    let client = client();
    let author_url = create_author(&client, "Guarded", "Author").await;
    let author_id: i64 = author_url.rsplit('/').next().unwrap().parse().unwrap();

    // Attach a dependent book
    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .form(&[
            ("title", "Guarded Book"),
            ("author", &author_id.to_string()),
            ("summary", "A book that blocks deletion"),
            ("isbn", "0000000000"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Deletion is blocked: confirmation page with the dependents, no redirect
    let response = client
        .post(format!("{}/catalog/author/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(!body["author_books"].as_array().unwrap().is_empty());

    // The author is still there
    let response = client
        .get(format!("{}/catalog/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_genre_with_books_is_not_deletable() {
    let client = client();
    let name = format!("Guarded Genre {}", std::process::id());
    let genre_url = create_genre(&client, &name).await;
    let genre_id: i64 = genre_url.rsplit('/').next().unwrap().parse().unwrap();

    let author_url = create_author(&client, "Genre", "Holder").await;
    let author_id: i64 = author_url.rsplit('/').next().unwrap().parse().unwrap();

    // Attach a dependent book carrying this genre
    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .form(&[
            ("title", "Genre Holding Book"),
            ("author", &author_id.to_string()),
            ("summary", "A book that blocks genre deletion"),
            ("isbn", "2222222222"),
            ("genre", &genre_id.to_string()),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Deletion is blocked: confirmation page with the dependents, no redirect
    let response = client
        .post(format!("{}/catalog/genre/{}/delete", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(!body["genre_books"].as_array().unwrap().is_empty());

    // The genre is still there
    let response = client
        .get(format!("{}/catalog/genre/{}", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_genre_update_to_existing_name_converges() {
    let client = client();
    let pid = std::process::id();
    let first_name = format!("Settled Genre {}", pid);
    let second_name = format!("Renamed Genre {}", pid);

    let first_url = create_genre(&client, &first_name).await;
    let second_url = create_genre(&client, &second_name).await;
    let second_id: i64 = second_url.rsplit('/').next().unwrap().parse().unwrap();

    // Renaming onto another genre's name redirects to that record
    let response = client
        .post(format!("{}/catalog/genre/{}/update", BASE_URL, second_id))
        .form(&[("name", first_name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        first_url
    );

    // The second genre keeps its own name
    let detail: Value = client
        .get(format!("{}{}", BASE_URL, second_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["genre"]["name"], second_name.as_str());

    // Renaming a genre to its own name proceeds normally
    let response = client
        .post(format!("{}/catalog/genre/{}/update", BASE_URL, second_id))
        .form(&[("name", second_name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        second_url
    );
}

#[tokio::test]
#[ignore]
async fn test_author_without_books_is_deleted() {
    let client = client();
    let author_url = create_author(&client, "Ephemeral", "Author").await;
    let author_id: i64 = author_url.rsplit('/').next().unwrap().parse().unwrap();

    let response = client
        .post(format!("{}/catalog/author/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .get(format!("{}/catalog/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_bookinstance_bad_due_back_is_rejected() {
    let before: Value = client()
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let count_before = before["data"]["book_instance_count"].as_i64().unwrap();

    let response = client()
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .form(&[
            ("book", "1"),
            ("imprint", "Test Imprint"),
            ("due_back", "31-12-2024"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["due_back"]);

    // Nothing was inserted
    let after: Value = client()
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["data"]["book_instance_count"].as_i64().unwrap(), count_before);
}

#[tokio::test]
#[ignore]
async fn test_book_with_dangling_author_still_renders() {
    let client = client();
    let author_url = create_author(&client, "Vanishing", "Author").await;
    let author_id: i64 = author_url.rsplit('/').next().unwrap().parse().unwrap();

    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .form(&[
            ("title", "Orphaned Book"),
            ("author", &author_id.to_string()),
            ("summary", "Its author is about to vanish"),
            ("isbn", "1111111111"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let book_url = response.headers()["location"].to_str().unwrap().to_string();
    let book_id: i64 = book_url.rsplit('/').next().unwrap().parse().unwrap();

    // Remove the author's row directly is not possible through the guarded
    // form, so orphan the book by pointing it at an id that never existed.
    let response = client
        .post(format!("{}/catalog/book/{}/update", BASE_URL, book_id))
        .form(&[
            ("title", "Orphaned Book"),
            ("author", "999999999"),
            ("summary", "Its author is gone"),
            ("isbn", "1111111111"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Detail view renders with the author reported absent
    let response = client
        .get(format!("{}{}", BASE_URL, book_url))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["book"]["author"].is_null());
}
