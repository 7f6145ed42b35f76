//! Shared harness for the end-to-end tests: an in-memory application with
//! seeded identities, token minting, and small request plumbing driven
//! through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use api_adapters::{router, AppState};
use auth_adapters::JwtIdentity;
use domains::{
    CommentRepo, EventSink, IdentityProvider, NotificationRepo, PostRepo, UserDirectory, VoteRepo,
};
use services::{
    CommentService, ForumSettings, ModerationService, NotificationDispatcher, NotificationService,
    PostService, ScoreAggregator, VoteService,
};
use storage_adapters::SqliteStore;

pub const TEST_SECRET: &str = "integration-secret";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<SqliteStore>,
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        TestApp::spawn_with(ForumSettings::default()).await
    }

    pub async fn spawn_with(settings: ForumSettings) -> TestApp {
        let store = Arc::new(SqliteStore::in_memory().await.expect("in-memory store"));

        let posts: Arc<dyn PostRepo> = store.clone();
        let comments: Arc<dyn CommentRepo> = store.clone();
        let votes: Arc<dyn VoteRepo> = store.clone();
        let notifications: Arc<dyn NotificationRepo> = store.clone();
        let users: Arc<dyn UserDirectory> = store.clone();

        let events: Arc<dyn EventSink> =
            Arc::new(NotificationDispatcher::new(notifications.clone()));
        let scores = ScoreAggregator::new(votes.clone(), comments.clone());
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(JwtIdentity::new(SecretString::from(TEST_SECRET)));

        let state = AppState {
            identity,
            posts: Arc::new(PostService::new(
                posts.clone(),
                users.clone(),
                scores.clone(),
                settings,
            )),
            comments: Arc::new(CommentService::new(
                comments.clone(),
                posts.clone(),
                users.clone(),
                scores.clone(),
                events.clone(),
            )),
            votes: Arc::new(VoteService::new(
                votes.clone(),
                posts.clone(),
                comments.clone(),
                events.clone(),
            )),
            moderation: Arc::new(ModerationService::new(posts.clone(), events)),
            notifications: Arc::new(NotificationService::new(notifications, users)),
        };

        TestApp { app: router(state), store }
    }

    pub async fn user(&self, name: &str) -> TestUser {
        self.identity_with_role(name, "user").await
    }

    pub async fn moderator(&self, name: &str) -> TestUser {
        self.identity_with_role(name, "moderator").await
    }

    async fn identity_with_role(&self, name: &str, role: &str) -> TestUser {
        let id = Uuid::now_v7();
        self.store.upsert_user(id, name).await.expect("seed user");
        TestUser { id, token: mint_token(id, role) }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.request(builder.body(Body::empty()).expect("request"))
            .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request");
        self.request(request).await
    }

    /// PUT/POST without a body (close, mark-read, read-all).
    pub async fn send_empty(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.request(builder.body(Body::empty()).expect("request"))
            .await
    }

    async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    id: Uuid,
    role: &'a str,
    exp: i64,
}

pub fn mint_token(user_id: Uuid, role: &str) -> String {
    let claims = Claims {
        id: user_id,
        role,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("mint token")
}

/// Create a post through the API and return its id.
pub async fn create_post(app: &TestApp, author: &TestUser, title: &str, content: &str) -> Uuid {
    let (status, body) = app
        .send_json(
            "POST",
            "/api/forum/posts",
            Some(&author.token),
            serde_json::json!({ "title": title, "content": content }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create post failed: {body}");
    parse_uuid(&body["id"])
}

/// Create a comment through the API and return its id.
pub async fn create_comment(
    app: &TestApp,
    author: &TestUser,
    post_id: Uuid,
    content: &str,
    parent_id: Option<Uuid>,
) -> Uuid {
    let mut payload = serde_json::json!({ "content": content });
    if let Some(parent) = parent_id {
        payload["parent_id"] = serde_json::json!(parent);
    }
    let (status, body) = app
        .send_json(
            "POST",
            &format!("/api/forum/posts/{post_id}/comments"),
            Some(&author.token),
            payload,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create comment failed: {body}");
    parse_uuid(&body["id"])
}

pub fn parse_uuid(value: &Value) -> Uuid {
    Uuid::parse_str(value.as_str().expect("uuid string")).expect("valid uuid")
}
