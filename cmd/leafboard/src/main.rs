//! # leafboard
//!
//! The entry point that assembles the forum backend: configuration, the
//! SQLite store, the JWT identity adapter, the service layer, and the axum
//! surface, wired together through the `domains` ports.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState};
use auth_adapters::JwtIdentity;
use configs::AppConfig;
use domains::{
    CommentRepo, EventSink, IdentityProvider, NotificationRepo, PostRepo, UserDirectory, VoteRepo,
};
use services::{
    CommentService, ForumSettings, ModerationService, NotificationDispatcher, NotificationService,
    PostService, ScoreAggregator, VoteService,
};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let AppConfig { server, database, auth, forum } =
        AppConfig::load().context("loading configuration")?;

    let store = Arc::new(
        SqliteStore::connect(&database.url, database.max_connections)
            .await
            .context("connecting to the database")?,
    );

    // One store, many ports.
    let posts: Arc<dyn PostRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store.clone();
    let votes: Arc<dyn VoteRepo> = store.clone();
    let notifications: Arc<dyn NotificationRepo> = store.clone();
    let users: Arc<dyn UserDirectory> = store.clone();

    let events: Arc<dyn EventSink> = Arc::new(NotificationDispatcher::new(notifications.clone()));
    let scores = ScoreAggregator::new(votes.clone(), comments.clone());
    let settings = ForumSettings {
        mine_includes_banned: forum.mine_includes_banned,
    };
    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentity::new(auth.jwt_secret));

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
        moderation: Arc::new(ModerationService::new(posts.clone(), events.clone())),
        notifications: Arc::new(NotificationService::new(notifications, users)),
    };

    let app = router(state);
    let address = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!("leafboard listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("leafboard shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
