//! Authentication integration tests.
//!
//! Covers registration, login, the enumeration-resistant credential errors,
//! and session-backed endpoints.

mod common;

use common::TestApp;
use serde_json::json;
use serial_test::serial;

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
#[serial]
async fn register_returns_201_with_user_and_workspace_ids() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();

    // Act
    let response = app
        .post_public(
            "/auth/register",
            json!({
                "email": email,
                "name": "Test User",
                "password": "password123"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["user_id"].as_str().is_some());
    assert!(body["workspace_id"].as_str().is_some());
    // Only identifiers come back; no user entity, no token.
    assert!(body.get("user").is_none());
    assert!(body.get("session_token").is_none());
}

#[tokio::test]
#[serial]
async fn register_returns_409_for_duplicate_email() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    app.register_and_login(&email, "password123").await;

    // Act
    let response = app
        .post_public(
            "/auth/register",
            json!({
                "email": email,
                "name": "Second User",
                "password": "differentpass456"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 409);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"].as_str().unwrap(), "Email already exists");

    // The failed attempt must not have added any rows.
    assert_eq!(app.count_users_with_email(&email), 1);
    assert_eq!(app.count_accounts_for_email(&email), 1);
    assert_eq!(app.count_workspaces_for_email(&email), 1);
}

#[tokio::test]
#[serial]
async fn register_returns_400_for_invalid_email() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app
        .post_public(
            "/auth/register",
            json!({
                "email": "not-an-email",
                "name": "Test User",
                "password": "password123"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].as_str().unwrap().contains("Validation"));
}

#[tokio::test]
#[serial]
async fn register_returns_400_for_short_password() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();

    // Act
    let response = app
        .post_public(
            "/auth/register",
            json!({
                "email": email,
                "name": "Test User",
                "password": "short"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.count_users_with_email(&email), 0);
}

#[tokio::test]
#[serial]
async fn register_treats_email_case_insensitively() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    app.register_and_login(&email, "password123").await;

    // Act
    let response = app
        .post_public(
            "/auth/register",
            json!({
                "email": email.to_uppercase(),
                "name": "Shouty User",
                "password": "password123"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 409);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
#[serial]
async fn login_returns_sanitized_user_and_session_token() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    let user = app.register_and_login(&email, "password123").await;

    // Act
    let response = app
        .post_public(
            "/auth/login",
            json!({
                "email": email,
                "password": "password123"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
    assert_eq!(
        body["user"]["id"].as_str().unwrap(),
        user.id.to_string()
    );
    assert_eq!(
        body["user"]["current_workspace_id"].as_str().unwrap(),
        user.workspace_id.to_string()
    );
    assert!(body["session_token"].as_str().is_some());

    // The stored credential never leaks through the login response.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
#[serial]
async fn login_returns_401_for_wrong_password() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    app.register_and_login(&email, "password123").await;

    // Act
    let response = app
        .post_public(
            "/auth/login",
            json!({
                "email": email,
                "password": "wrongpassword"
            }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 401);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"].as_str().unwrap(), "Invalid email or password");
}

#[tokio::test]
#[serial]
async fn login_error_wording_does_not_reveal_account_existence() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    app.register_and_login(&email, "password123").await;

    // Act: unknown account vs known account with wrong password.
    let unknown = app
        .post_public(
            "/auth/login",
            json!({
                "email": TestApp::unique_email(),
                "password": "password123"
            }),
        )
        .await;
    let wrong_password = app
        .post_public(
            "/auth/login",
            json!({
                "email": email,
                "password": "wrongpassword"
            }),
        )
        .await;

    // Assert: identical wording either way.
    let unknown_body: serde_json::Value = unknown.json().await.unwrap();
    let wrong_body: serde_json::Value = wrong_password.json().await.unwrap();
    assert_eq!(
        unknown_body["error"].as_str().unwrap(),
        "Invalid email or password"
    );
    assert_eq!(
        wrong_body["error"].as_str().unwrap(),
        "Invalid email or password"
    );
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
#[serial]
async fn me_returns_session_identity_without_store_lookup() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    let user = app.register_and_login(&email, "password123").await;

    // Act
    let response = app.get("/auth/me", &user.session_token).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user_id"].as_str().unwrap(), user.id.to_string());
    assert_eq!(body["email"].as_str().unwrap(), email);
    assert_eq!(
        body["current_workspace_id"].as_str().unwrap(),
        user.workspace_id.to_string()
    );
}

#[tokio::test]
#[serial]
async fn protected_routes_reject_missing_and_invalid_tokens() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let missing = app
        .client
        .get(format!("{}/auth/me", app.base_url))
        .send()
        .await
        .expect("Failed to send request");
    let invalid = app.get("/auth/me", "not.a.token").await;

    // Assert
    assert_eq!(missing.status().as_u16(), 401);
    assert_eq!(invalid.status().as_u16(), 401);
}

#[tokio::test]
#[serial]
async fn logout_returns_204() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    let user = app.register_and_login(&email, "password123").await;

    // Act
    let response = app
        .post("/auth/logout", &user.session_token, json!({}))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
#[serial]
async fn login_updates_last_login_timestamp() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    app.register_and_login(&email, "password123").await;

    // Assert
    use diesel::prelude::*;
    use teamhive::schema::users;
    let mut conn = app.db_pool.get().expect("Failed to get db connection");
    let stamped: Option<chrono::NaiveDateTime> = users::table
        .filter(users::email.eq(email.to_lowercase()))
        .select(users::last_login)
        .first(&mut conn)
        .expect("User should exist");
    assert!(stamped.is_some());
}
