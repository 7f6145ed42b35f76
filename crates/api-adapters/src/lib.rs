//! # api-adapters
//!
//! The web routing and orchestration layer. Handlers stay thin: resolve
//! identity, parse input, call a service, wrap the result in the uniform
//! `{ok, ...}` envelope.

#[cfg(feature = "web-axum")]
pub mod envelope;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub use router::{router, AppState};

#[cfg(feature = "web-axum")]
mod router {
    use std::sync::Arc;

    use axum::routing::{get, post, put};
    use axum::Router;

    use domains::IdentityProvider;
    use services::{
        CommentService, ModerationService, NotificationService, PostService, VoteService,
    };

    use crate::{handlers, middleware};

    /// State shared across all handlers.
    #[derive(Clone)]
    pub struct AppState {
        pub identity: Arc<dyn IdentityProvider>,
        pub posts: Arc<PostService>,
        pub comments: Arc<CommentService>,
        pub votes: Arc<VoteService>,
        pub moderation: Arc<ModerationService>,
        pub notifications: Arc<NotificationService>,
    }

    /// The full API surface under `/api`.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/api/health", get(handlers::health))
            .route(
                "/api/forum/posts",
                get(handlers::list_posts).post(handlers::create_post),
            )
            .route("/api/forum/posts/{id}", get(handlers::post_detail))
            .route(
                "/api/forum/posts/{id}/comments",
                get(handlers::list_comments).post(handlers::create_comment),
            )
            .route("/api/forum/posts/{id}/vote", post(handlers::vote_post))
            .route("/api/forum/comments/{id}/vote", post(handlers::vote_comment))
            .route("/api/forum/posts/{id}/close", post(handlers::close_post))
            .route("/api/forum/posts/{id}/ban", put(handlers::ban_post))
            .route("/api/notifications", get(handlers::list_notifications))
            .route(
                "/api/notifications/unread-count",
                get(handlers::unread_count),
            )
            .route("/api/notifications/{id}/read", put(handlers::mark_read))
            .route("/api/notifications/read-all", put(handlers::mark_all_read))
            .layer(middleware::trace_layer())
            .layer(middleware::cors_policy())
            .with_state(state)
    }
}
