
use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn seed_replaces_catalogue_and_is_idempotent() {
    let app = TestApp::spawn().await;
    app.create_project(project_body("hand-made")).await;

    for _ in 0..2 {
        let response = app.post_as_admin("/api/seed", &Value::Null).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["insertedCount"], 5);
        assert_eq!(body["data"]["failedCount"], 0);
        assert_eq!(body["data"]["failures"].as_array().unwrap().len(), 0);
    }

    let status: Value = app.get("/api/seed").await.json().await.unwrap();
    assert_eq!(status["data"]["count"], 5);

    let sample = status["data"]["sample"].as_array().unwrap();
    assert_eq!(sample.len(), 3);
    assert!(sample.iter().all(|s| s["slug"].is_string() && s["title"].is_string()));

    assert_eq!(app.get("/api/projects/hand-made").await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn seed_requires_admin() {
    let app = TestApp::spawn().await;

    let anonymous = app.client.post(app.url("/api/seed")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let reader = app
        .client
        .post(app.url("/api/seed"))
        .bearer_auth(&app.user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(reader.status(), StatusCode::FORBIDDEN);

    let status: Value = app.get("/api/seed").await.json().await.unwrap();
    assert_eq!(status["data"]["count"], 0);
}
