//! Integration tests for account export endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_json_export_contains_full_account() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let token = &user.tokens.access_token;

    let (_, _) = app
        .post_auth("/api/v1/tags", &json!({"name": "food"}).to_string(), token)
        .await;

    let body = json!({
        "template": "quick_checkin",
        "answers": {
            "feeling_scale": 7,
            "additional_emotions": ["Happy"],
            "day_highlight": "Dinner with friends"
        }
    });
    let (status, _) = app
        .post_auth("/api/v1/entries/guided", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = app.get_auth("/api/v1/export/json", token).await;
    assert_eq!(status, StatusCode::OK);

    let export: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(export["export_version"], "1.0");
    assert_eq!(
        export["profile"]["email"].as_str().unwrap(),
        user.email.to_lowercase()
    );
    assert_eq!(export["tags"][0]["name"], "food");

    let entries = export["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["entry_kind"], "guided");
    let responses = entries[0]["responses"].as_array().unwrap();
    assert_eq!(responses[0]["question_id"], "feeling_scale");
    assert_eq!(responses[0]["answer"], "7");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_csv_export_one_row_per_entry() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    let token = &user.tokens.access_token;

    let body = json!({
        "template": "quick_checkin",
        "answers": {
            "feeling_scale": 7,
            "additional_emotions": ["Happy", "Calm"],
            "day_highlight": "Dinner with friends"
        }
    });
    let (status, _) = app
        .post_auth("/api/v1/entries/guided", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let body = json!({"content": "Rain, then sun"});
    let (status, _) = app
        .post_auth("/api/v1/entries/quick", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = app.get_auth("/api/v1/export/entries.csv", token).await;
    assert_eq!(status, StatusCode::OK);

    let lines: Vec<&str> = response.lines().collect();
    assert_eq!(lines[0], "id,kind,created_at,feeling_value,emotions,tags,text");
    assert_eq!(lines.len(), 3);
    assert!(response.contains("Happy; Calm"));
    // Embedded commas are quoted by the writer
    assert!(response.contains("\"Rain, then sun\""));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_export_is_user_scoped() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let stranger = app.create_test_user().await;

    let body = json!({"content": "only mine"});
    let (status, _) = app
        .post_auth(
            "/api/v1/entries/quick",
            &body.to_string(),
            &owner.tokens.access_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = app
        .get_auth("/api/v1/export/json", &stranger.tokens.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let export: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(export["entries"].as_array().unwrap().is_empty());
}
