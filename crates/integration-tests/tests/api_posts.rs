//! Post lifecycle and listings over the wire.

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::{create_post, TestApp};

#[tokio::test]
async fn created_post_round_trips_with_author_and_zero_score() {
    let app = TestApp::spawn().await;
    let author = app.user("Amara Diallo").await;
    let post_id = create_post(&app, &author, "Leaf spot?", "Dark rings on older leaves.").await;

    let (status, body) = app
        .get(&format!("/api/forum/posts/{post_id}"), Some(&author.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let post = &body["post"];
    assert_eq!(post["title"], "Leaf spot?");
    assert_eq!(post["author"], "Amara Diallo");
    assert_eq!(post["score"], 0);
    assert_eq!(post["comments"], 0);
    assert_eq!(post["indicator"], "open");
    assert_eq!(post["my_vote"], serde_json::Value::Null);
}

#[tokio::test]
async fn blank_title_is_rejected_with_the_legacy_code() {
    let app = TestApp::spawn().await;
    let author = app.user("Amara Diallo").await;
    let (status, body) = app
        .send_json(
            "POST",
            "/api/forum/posts",
            Some(&author.token),
            json!({ "title": "   ", "content": "something" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title_and_content_required");
}

#[tokio::test]
async fn unknown_body_fields_are_rejected_not_coerced() {
    let app = TestApp::spawn().await;
    let author = app.user("Amara Diallo").await;
    let (status, body) = app
        .send_json(
            "POST",
            "/api/forum/posts",
            Some(&author.token),
            json!({ "title": "t", "content": "c", "sticky": true }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed_payload");
}

#[tokio::test]
async fn listing_filters_by_substring_and_pages() {
    let app = TestApp::spawn().await;
    let author = app.user("Amara Diallo").await;
    create_post(&app, &author, "Leaf spot on tomato", "Lower leaves first.").await;
    create_post(&app, &author, "Powdery mildew", "White dust on squash.").await;
    create_post(&app, &author, "Aphids on beans", "Sticky residue everywhere.").await;

    let (status, body) = app.get("/api/forum/posts?q=tomato", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Leaf spot on tomato");

    // Pagination windows the items but reports the full total.
    let (_, body) = app.get("/api/forum/posts?limit=2&offset=2", None).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn popular_sort_orders_by_score_with_recency_tiebreak() {
    let app = TestApp::spawn().await;
    let author = app.user("Amara Diallo").await;
    let voter = app.user("Kofi Mensah").await;
    create_post(&app, &author, "Older question", "body").await;
    create_post(&app, &author, "Newer question", "body").await;
    let upvoted = create_post(&app, &author, "Upvoted question", "body").await;

    let (status, _) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{upvoted}/vote"),
            Some(&voter.token),
            json!({ "vote": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/forum/posts?sort=popular", None).await;
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Upvoted question", "Newer question", "Older question"]
    );
}

#[tokio::test]
async fn yours_lists_only_the_callers_posts() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let kofi = app.user("Kofi Mensah").await;
    create_post(&app, &amara, "Amara's question", "body").await;
    create_post(&app, &kofi, "Kofi's question", "body").await;

    let (status, body) = app
        .get("/api/forum/posts?sort=yours", Some(&amara.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Amara's question");
}

#[tokio::test]
async fn yours_without_identity_is_unauthorized() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/api/forum/posts?sort=yours", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "no_token");
}

#[tokio::test]
async fn unknown_sort_and_malformed_ids_are_validation_errors() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/api/forum/posts?sort=hot", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_sort");

    let (status, body) = app.get("/api/forum/posts/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_id");
}

#[tokio::test]
async fn missing_post_is_not_found() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .get(&format!("/api/forum/posts/{}", uuid::Uuid::now_v7()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
