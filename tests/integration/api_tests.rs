//! Live-server integration tests
//!
//! Start the server against a scratch database first, then run
//! `cargo test -- --ignored`.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}{}", prefix, nanos)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_home_sets_visit_cookies_once() {
    let client = client();

    let first = client
        .get(format!("{}/rango/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());
    let names: Vec<String> = first.cookies().map(|c| c.name().to_string()).collect();
    assert!(names.contains(&"visits".to_string()));
    assert!(names.contains(&"last_visit".to_string()));

    // Same day: the stored cookies are echoed back and left untouched
    let second = client
        .get(format!("{}/rango/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.cookies().count(), 0);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["context"]["visits"], 0);
}

#[tokio::test]
#[ignore]
async fn test_create_category_and_page() {
    let client = client();
    let name = unique("Integration ");
    let slug = name.replace(' ', "_");

    let response = client
        .post(format!("{}/rango/add_category/", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{}/rango/category/{}/add_page/", BASE_URL, slug))
        .form(&[("title", "Rust"), ("url", "www.rust-lang.org")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body: Value = client
        .get(format!("{}/rango/category/{}/", BASE_URL, slug))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["context"]["category"]["name"], name.as_str());
    assert_eq!(body["context"]["pages"][0]["url"], "http://www.rust-lang.org");

    // Same name again is a conflict
    let response = client
        .post(format!("{}/rango/add_category/", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_register_login_logout() {
    let client = client();
    let username = unique("user");

    let form = reqwest::multipart::Form::new()
        .text("username", username.clone())
        .text("password", "rango")
        .text("website", "http://www.tangowithdjango.com");
    let response = client
        .post(format!("{}/rango/register/", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .get(format!("{}/rango/restricted/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/rango/login/", BASE_URL))
        .form(&[("username", username.as_str()), ("password", "rango")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .get(format!("{}/rango/restricted/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/rango/logout/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .get(format!("{}/rango/restricted/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let response = client()
        .post(format!("{}/rango/login/", BASE_URL))
        .form(&[("username", "nobody"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
