//! Integration tests for profile and settings endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_profile_requires_auth() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/v1/profile").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_includes_default_settings() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app
        .get_auth("/api/v1/profile", &user.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let profile: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(profile["email"].as_str().unwrap(), user.email.to_lowercase());
    // Registration seeds a settings row with UTC
    assert_eq!(profile["settings"]["timezone"], "UTC");
    assert!(profile["settings"]["default_template"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_timezone() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let token = &user.tokens.access_token;

    let body = json!({"timezone": "Europe/Vienna"});
    let (status, response) = app
        .put_auth("/api/v1/profile/settings", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let settings: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(settings["timezone"], "Europe/Vienna");

    // Partial update: leaving the field out keeps the stored value
    let body = json!({"default_template": "quick_checkin"});
    let (status, response) = app
        .put_auth("/api/v1/profile/settings", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let settings: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(settings["timezone"], "Europe/Vienna");
    assert_eq!(settings["default_template"], "quick_checkin");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_timezone_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({"timezone": "Mars/Olympus Mons"});
    let (status, _) = app
        .put_auth(
            "/api/v1/profile/settings",
            &body.to_string(),
            &user.tokens.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unknown_default_template_rejected() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({"default_template": "no_such_flow"});
    let (status, _) = app
        .put_auth(
            "/api/v1/profile/settings",
            &body.to_string(),
            &user.tokens.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preferred_template_drives_guided_entries() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let token = &user.tokens.access_token;

    let body = json!({"default_template": "quick_checkin"});
    let (status, _) = app
        .put_auth("/api/v1/profile/settings", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::OK);

    // No template named in the request: the preference decides
    let body = json!({
        "answers": {
            "feeling_scale": 6,
            "additional_emotions": [],
            "day_highlight": "an ordinary tuesday"
        }
    });
    let (status, response) = app
        .post_auth("/api/v1/entries/guided", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);

    let entry: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(entry["template"], "quick_checkin");
    assert_eq!(entry["responses"].as_array().unwrap().len(), 3);
}
