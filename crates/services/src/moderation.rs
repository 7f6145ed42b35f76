//! # Moderation state machine
//!
//! Indicator transitions only move forward: open → closed, open|closed →
//! banned. Requests that arrive after the transition already happened are
//! idempotent no-ops, not errors. A missing post is reported before
//! authorization so 404 and 403 stay distinguishable.

use std::sync::Arc;

use uuid::Uuid;

use domains::{
    AppError, AuthContext, EventSink, ForumEvent, Post, PostIndicator, PostRepo, Result,
};

use crate::publish_or_log;

pub struct ModerationService {
    posts: Arc<dyn PostRepo>,
    events: Arc<dyn EventSink>,
}

impl ModerationService {
    pub fn new(posts: Arc<dyn PostRepo>, events: Arc<dyn EventSink>) -> Self {
        Self { posts, events }
    }

    /// Close a post. Authorized for the post owner or a moderator.
    /// Returns the resulting indicator.
    pub async fn close(&self, ctx: &AuthContext, post_id: Uuid) -> Result<PostIndicator> {
        let post = self.require_post(post_id).await?;
        if post.owner_id != ctx.user_id && !ctx.is_moderator() {
            return Err(AppError::ForbiddenError("not owner, not moderator".into()));
        }
        let Some(next) = post.indicator.close() else {
            return Ok(post.indicator);
        };
        self.posts.set_indicator(post_id, next).await?;
        publish_or_log(
            &*self.events,
            ForumEvent::PostClosed {
                post: Post { indicator: next, ..post },
                closed_by: ctx.user_id,
            },
        )
        .await;
        Ok(next)
    }

    /// Ban a post. Moderator only; the reason is required and travels in
    /// the emitted notification's metadata. Banning is terminal.
    pub async fn ban(
        &self,
        ctx: &AuthContext,
        post_id: Uuid,
        reason: &str,
    ) -> Result<PostIndicator> {
        let post = self.require_post(post_id).await?;
        if !ctx.is_moderator() {
            return Err(AppError::ForbiddenError("moderator role required".into()));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("reason_required"));
        }
        let Some(next) = post.indicator.ban() else {
            return Ok(post.indicator);
        };
        self.posts.set_indicator(post_id, next).await?;
        publish_or_log(
            &*self.events,
            ForumEvent::PostBanned {
                post: Post { indicator: next, ..post },
                moderator_id: ctx.user_id,
                reason: reason.to_string(),
            },
        )
        .await;
        Ok(next)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))
    }
}
