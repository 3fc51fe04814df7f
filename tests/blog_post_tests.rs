
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

fn slugs(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

async fn post_with_counters(app: &TestApp, slug: &str, views: i64, likes: i64) -> Value {
    let mut body = post_body(slug, app.admin.id);
    body["views"] = json!(views);
    body["likes"] = json!(likes);
    app.create_post(body).await
}

#[actix_rt::test]
async fn create_sanitizes_content_and_joins_author() {
    let app = TestApp::spawn().await;

    let post = app.create_post(post_body("sanitized", app.admin.id)).await;

    assert!(!post["content"].as_str().unwrap().contains("<script>"));
    assert_eq!(post["author"]["id"], app.admin.id.to_string());
    assert_eq!(post["author"]["name"], "Admin");
    assert_eq!(post["author"]["role"], "admin");
    assert_eq!(post["author"]["image"], "https://example.com/admin.png");
}

#[actix_rt::test]
async fn create_requires_difficulty_and_author() {
    let app = TestApp::spawn().await;

    let mut body = post_body("incomplete", app.admin.id);
    body.as_object_mut().unwrap().remove("difficulty");
    body.as_object_mut().unwrap().remove("author");
    body["image"] = json!("not a url");

    let response = app.post_as_admin("/api/posts", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["author", "difficulty", "image"]);
}

#[actix_rt::test]
async fn trending_weights_likes_ten_times_views() {
    let app = TestApp::spawn().await;
    post_with_counters(&app, "post-one", 10, 1).await;
    post_with_counters(&app, "post-two", 5, 5).await;
    post_with_counters(&app, "post-three", 1, 9).await;

    let trending: Value = app.get("/api/posts?sort=trending").await.json().await.unwrap();
    assert_eq!(slugs(&trending), vec!["post-three", "post-two", "post-one"]);

    let popular: Value = app.get("/api/posts?sort=popular").await.json().await.unwrap();
    assert_eq!(slugs(&popular), vec!["post-one", "post-two", "post-three"]);

    let latest: Value = app.get("/api/posts").await.json().await.unwrap();
    assert_eq!(slugs(&latest), vec!["post-three", "post-two", "post-one"]);
}

#[actix_rt::test]
async fn pagination_reports_full_filtered_total() {
    let app = TestApp::spawn().await;
    for i in 0..25 {
        app.create_post(post_body(&format!("paged-post-{}", i), app.admin.id)).await;
    }

    let body: Value = app.get("/api/posts?limit=10&page=3").await.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"], json!({"page": 3, "limit": 10, "total": 25, "pages": 3}));

    let clamped: Value = app.get("/api/posts?limit=0&page=-4").await.json().await.unwrap();
    assert_eq!(clamped["pagination"]["page"], 1);
    assert_eq!(clamped["pagination"]["limit"], 1);

    let defaults: Value = app.get("/api/posts?limit=abc&page=xyz").await.json().await.unwrap();
    assert_eq!(defaults["pagination"]["page"], 1);
    assert_eq!(defaults["pagination"]["limit"], 10);

    let capped: Value = app.get("/api/posts?limit=1000").await.json().await.unwrap();
    assert_eq!(capped["pagination"]["limit"], 100);
}

#[actix_rt::test]
async fn status_defaults_to_published_unless_all_is_requested() {
    let app = TestApp::spawn().await;
    app.create_post(post_body("live-post", app.admin.id)).await;

    let mut draft = post_body("draft-post", app.admin.id);
    draft["status"] = json!("draft");
    app.create_post(draft).await;

    let default: Value = app.get("/api/posts").await.json().await.unwrap();
    assert_eq!(slugs(&default), vec!["live-post"]);

    let drafts: Value = app.get("/api/posts?status=draft").await.json().await.unwrap();
    assert_eq!(slugs(&drafts), vec!["draft-post"]);

    let all: Value = app.get("/api/posts?status=all").await.json().await.unwrap();
    assert_eq!(all["pagination"]["total"], 2);
}

#[actix_rt::test]
async fn search_matches_text_and_tags_literally() {
    let app = TestApp::spawn().await;

    let mut tagged = post_body("tagged-post", app.admin.id);
    tagged["tags"] = json!(["WebAssembly"]);
    app.create_post(tagged).await;

    let mut titled = post_body("titled-post", app.admin.id);
    titled["title"] = json!("Profiling 100% of the hot path");
    app.create_post(titled).await;

    let by_tag: Value = app.get("/api/posts?search=webassembly").await.json().await.unwrap();
    assert_eq!(slugs(&by_tag), vec!["tagged-post"]);

    let by_title: Value = app.get("/api/posts?search=100%25").await.json().await.unwrap();
    assert_eq!(slugs(&by_title), vec!["titled-post"]);

    let nothing: Value = app.get("/api/posts?search=zzz").await.json().await.unwrap();
    assert_eq!(nothing["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn invalid_query_parameters_are_reported_together() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/posts?sort=oldest&difficulty=expert&featured=maybe").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields.len(), 3);
    for expected in ["difficulty", "featured", "sort"] {
        assert!(fields.contains(&expected));
    }
}

#[actix_rt::test]
async fn reading_counts_views_for_published_posts_only() {
    let app = TestApp::spawn().await;
    let published = app.create_post(post_body("counted", app.admin.id)).await;

    let mut draft = post_body("not-counted", app.admin.id);
    draft["status"] = json!("draft");
    let draft = app.create_post(draft).await;

    let path = format!("/api/posts/{}", published["id"].as_str().unwrap());
    app.get(&path).await;
    let second: Value = app.get(&path).await.json().await.unwrap();
    assert_eq!(second["data"]["views"], 2);

    let draft_path = format!("/api/posts/{}", draft["id"].as_str().unwrap());
    app.get(&draft_path).await;
    let draft_read: Value = app.get(&draft_path).await.json().await.unwrap();
    assert_eq!(draft_read["data"]["views"], 0);
}

#[actix_rt::test]
async fn malformed_and_unknown_ids() {
    let app = TestApp::spawn().await;

    let malformed = app.get("/api/posts/not-a-uuid").await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown = app.get(&format!("/api/posts/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["error"], "Blog post not found");
}

#[actix_rt::test]
async fn replace_and_patch_keep_counters() {
    let app = TestApp::spawn().await;
    let created = post_with_counters(&app, "counter-post", 3, 2).await;
    let path = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let like: Value = app
        .client
        .post(app.url(&format!("{}/like", path)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(like["data"]["likes"], 3);

    let mut replacement = post_body("counter-post", app.admin.id);
    replacement["title"] = json!("Rewritten");
    replacement["views"] = json!(0);
    let replaced: Value = app.put_as_admin(&path, &replacement).await.json().await.unwrap();
    assert_eq!(replaced["data"]["title"], "Rewritten");
    assert_eq!(replaced["data"]["views"], 3);
    assert_eq!(replaced["data"]["likes"], 3);
    assert_eq!(replaced["data"]["createdAt"], created["createdAt"]);

    let patched: Value = app
        .patch_as_admin(&path, &json!({ "status": "archived", "featured": true }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(patched["data"]["status"], "archived");
    assert_eq!(patched["data"]["featured"], true);
    assert_eq!(patched["data"]["title"], "Rewritten");
    assert_eq!(patched["data"]["likes"], 3);
}

#[actix_rt::test]
async fn duplicate_slug_and_delete() {
    let app = TestApp::spawn().await;
    let created = app.create_post(post_body("only-once", app.admin.id)).await;

    let duplicate = app.post_as_admin("/api/posts", &post_body("only-once", app.admin.id)).await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let path = format!("/api/posts/{}", created["id"].as_str().unwrap());
    let deleted = app.delete_as_admin(&path).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    assert_eq!(app.delete_as_admin(&path).await.status(), StatusCode::NOT_FOUND);
}
