//! Toggle semantics of the vote ledger over the wire.

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::{create_comment, create_post, TestApp, TestUser};

async fn vote_post(app: &TestApp, voter: &TestUser, post_id: uuid::Uuid, value: i64) -> serde_json::Value {
    let (status, body) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{post_id}/vote"),
            Some(&voter.token),
            json!({ "vote": value }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "vote failed: {body}");
    body
}

#[tokio::test]
async fn upvote_then_repeat_clears_the_ledger() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let kofi = app.user("Kofi Mensah").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;

    let body = vote_post(&app, &kofi, post_id, 1).await;
    assert_eq!(body["cleared"], serde_json::Value::Null);
    let (_, detail) = app
        .get(&format!("/api/forum/posts/{post_id}"), Some(&kofi.token))
        .await;
    assert_eq!(detail["post"]["score"], 1);
    assert_eq!(detail["post"]["my_vote"], 1);

    // Same value again: idempotent toggle back to zero rows.
    let body = vote_post(&app, &kofi, post_id, 1).await;
    assert_eq!(body["cleared"], true);
    let (_, detail) = app
        .get(&format!("/api/forum/posts/{post_id}"), Some(&kofi.token))
        .await;
    assert_eq!(detail["post"]["score"], 0);
    assert_eq!(detail["post"]["my_vote"], serde_json::Value::Null);
}

#[tokio::test]
async fn flipping_a_vote_never_double_counts() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let kofi = app.user("Kofi Mensah").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;

    vote_post(&app, &kofi, post_id, 1).await;
    vote_post(&app, &kofi, post_id, -1).await;

    let (_, detail) = app
        .get(&format!("/api/forum/posts/{post_id}"), Some(&kofi.token))
        .await;
    assert_eq!(detail["post"]["score"], -1);
    assert_eq!(detail["post"]["my_vote"], -1);
}

#[tokio::test]
async fn explicit_zero_clears() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let kofi = app.user("Kofi Mensah").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;

    vote_post(&app, &kofi, post_id, -1).await;
    let body = vote_post(&app, &kofi, post_id, 0).await;
    assert_eq!(body["cleared"], true);

    let (_, detail) = app.get(&format!("/api/forum/posts/{post_id}"), None).await;
    assert_eq!(detail["post"]["score"], 0);
}

#[tokio::test]
async fn scores_sum_over_many_voters() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;

    for name in ["Kofi", "Nia", "Tunde"] {
        let voter = app.user(name).await;
        vote_post(&app, &voter, post_id, 1).await;
    }
    let downvoter = app.user("Esi").await;
    vote_post(&app, &downvoter, post_id, -1).await;

    let (_, detail) = app.get(&format!("/api/forum/posts/{post_id}"), None).await;
    assert_eq!(detail["post"]["score"], 2);
}

#[tokio::test]
async fn comment_votes_show_up_in_the_listing() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let kofi = app.user("Kofi Mensah").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;
    let comment_id = create_comment(&app, &kofi, post_id, "Try copper fungicide", None).await;

    let (status, _) = app
        .send_json(
            "POST",
            &format!("/api/forum/comments/{comment_id}/vote"),
            Some(&amara.token),
            json!({ "vote": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(
            &format!("/api/forum/posts/{post_id}/comments"),
            Some(&amara.token),
        )
        .await;
    assert_eq!(body["items"][0]["score"], 1);
    assert_eq!(body["items"][0]["my_vote"], 1);
}

#[tokio::test]
async fn invalid_or_missing_vote_values_are_rejected() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let post_id = create_post(&app, &amara, "Leaf spot?", "Dark rings.").await;

    let (status, body) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{post_id}/vote"),
            Some(&amara.token),
            json!({ "vote": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_vote");

    let (status, body) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{post_id}/vote"),
            Some(&amara.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_vote");
}

#[tokio::test]
async fn voting_on_a_missing_entity_is_not_found() {
    let app = TestApp::spawn().await;
    let amara = app.user("Amara Diallo").await;
    let (status, body) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{}/vote", uuid::Uuid::now_v7()),
            Some(&amara.token),
            json!({ "vote": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
