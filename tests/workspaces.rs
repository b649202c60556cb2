//! Workspace endpoint integration tests.

mod common;

use common::TestApp;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn current_workspace_returns_workspace_with_members() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    let user = app.register_and_login(&email, "password123").await;

    // Act
    let response = app.get("/workspaces/current", &user.session_token).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["workspace"]["id"].as_str().unwrap(),
        user.workspace_id.to_string()
    );
    assert_eq!(body["workspace"]["name"].as_str().unwrap(), "My Workspace");

    let members = body["members"].as_array().expect("members should be a list");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["email"].as_str().unwrap(), email);
    assert_eq!(members[0]["role"].as_str().unwrap(), "OWNER");
}

#[tokio::test]
#[serial]
async fn current_workspace_requires_authentication() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app
        .client
        .get(format!("{}/workspaces/current", app.base_url))
        .send()
        .await
        .expect("Failed to send request");

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[serial]
async fn switch_workspace_returns_fresh_session_token() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();
    let user = app.register_and_login(&email, "password123").await;

    // Act: switching to the workspace the user is already in is a no-op
    // membership-wise but still reissues the session.
    let response = app
        .put(
            &format!("/workspaces/{}/switch", user.workspace_id),
            &user.session_token,
            json!({}),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["workspace"]["id"].as_str().unwrap(),
        user.workspace_id.to_string()
    );

    let fresh_token = body["session_token"].as_str().expect("token expected");
    let me = app.get("/auth/me", fresh_token).await;
    assert_eq!(me.status().as_u16(), 200);
    let me_body: serde_json::Value = me.json().await.unwrap();
    assert_eq!(
        me_body["current_workspace_id"].as_str().unwrap(),
        user.workspace_id.to_string()
    );
}

#[tokio::test]
#[serial]
async fn switch_workspace_rejects_non_members() {
    // Arrange
    let app = TestApp::spawn().await;
    let alice = app
        .register_and_login(&TestApp::unique_email(), "password123")
        .await;
    let bob = app
        .register_and_login(&TestApp::unique_email(), "password123")
        .await;

    // Act: bob tries to switch into alice's workspace.
    let response = app
        .put(
            &format!("/workspaces/{}/switch", alice.workspace_id),
            &bob.session_token,
            json!({}),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"].as_str().unwrap(),
        "You are not a member of this workspace"
    );
}
