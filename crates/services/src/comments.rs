//! # Threaded comments
//!
//! Comments form a tree per post through an optional parent reference. A
//! parent must be an existing comment on the same post; the tree is never
//! mutated after creation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domains::{
    AppError, AuthContext, CommentRepo, EntityRef, EventSink, ForumEvent, NewComment, Page,
    PostRepo, Result, UserDirectory,
};

use crate::score::ScoreAggregator;
use crate::{post_visible_to, publish_or_log};

pub const DEFAULT_COMMENT_PAGE: i64 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub score: i64,
    pub my_vote: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentPage {
    pub items: Vec<CommentView>,
    pub total: i64,
}

pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserDirectory>,
    scores: ScoreAggregator,
    events: Arc<dyn EventSink>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepo>,
        posts: Arc<dyn PostRepo>,
        users: Arc<dyn UserDirectory>,
        scores: ScoreAggregator,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { comments, posts, users, scores, events }
    }

    pub async fn create(
        &self,
        ctx: &AuthContext,
        post_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Uuid> {
        let post = self
            .posts
            .find(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))?;
        if !post_visible_to(&post, Some(ctx)) {
            return Err(AppError::not_found("post", post_id));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("content_required"));
        }
        if let Some(parent) = parent_id {
            let parent_ok = self
                .comments
                .find(parent)
                .await?
                .is_some_and(|p| p.post_id == post_id);
            if !parent_ok {
                return Err(AppError::validation("bad_parent"));
            }
        }

        let comment = self
            .comments
            .insert(NewComment {
                post_id,
                owner_id: ctx.user_id,
                parent_id,
                content: content.to_string(),
            })
            .await?;
        let comment_id = comment.id;
        publish_or_log(&*self.events, ForumEvent::CommentCreated { post, comment }).await;
        Ok(comment_id)
    }

    pub async fn list(
        &self,
        caller: Option<&AuthContext>,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        page: Page,
    ) -> Result<CommentPage> {
        let post = self
            .posts
            .find(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))?;
        if !post_visible_to(&post, caller) {
            return Err(AppError::not_found("post", post_id));
        }

        let comments = self.comments.list_for_post(post_id, parent_id, page).await?;
        let total = self.comments.count_matching(post_id, parent_id).await?;
        let caller_id = caller.map(|c| c.user_id);
        let mut items = Vec::with_capacity(comments.len());
        for comment in comments {
            let entity = EntityRef::comment(comment.id);
            let score = self.scores.score(entity).await?;
            let my_vote = self.scores.caller_vote(caller_id, entity).await?;
            let author = self
                .users
                .display_name(comment.owner_id)
                .await?
                .unwrap_or_else(|| "User".to_string());
            items.push(CommentView {
                id: comment.id,
                post_id: comment.post_id,
                owner_id: comment.owner_id,
                parent_id: comment.parent_id,
                content: comment.content,
                created_at: comment.created_at,
                author,
                score,
                my_vote,
            });
        }
        Ok(CommentPage { items, total })
    }
}
