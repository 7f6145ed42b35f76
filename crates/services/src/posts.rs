//! # Post lifecycle and listings
//!
//! Listings compose the post store with the score aggregator and the user
//! directory. Scores and comment counts are recomputed per request; the
//! `popular` ordering therefore sorts the full matching set in the service
//! before the pagination window is applied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domains::{
    AppError, AuthContext, EntityRef, NewPost, Page, Post, PostIndicator, PostQuery, PostRepo,
    Result, UserDirectory,
};

use crate::score::ScoreAggregator;
use crate::{post_visible_to, ForumSettings};

pub const DEFAULT_POST_PAGE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Latest,
    Popular,
    Yours,
    Open,
    Closed,
}

impl PostSort {
    /// Accepts the current names plus the legacy literals `new` and `mine`.
    pub fn parse(s: &str) -> Result<PostSort> {
        match s.to_ascii_lowercase().as_str() {
            "latest" | "new" => Ok(PostSort::Latest),
            "popular" => Ok(PostSort::Popular),
            "yours" | "mine" => Ok(PostSort::Yours),
            "open" => Ok(PostSort::Open),
            "closed" => Ok(PostSort::Closed),
            _ => Err(AppError::validation("bad_sort")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_ref: Option<String>,
    pub indicator: PostIndicator,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub score: i64,
    pub comments: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub owner_id: Uuid,
    pub my_vote: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    pub total: i64,
}

pub struct PostService {
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserDirectory>,
    scores: ScoreAggregator,
    settings: ForumSettings,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        users: Arc<dyn UserDirectory>,
        scores: ScoreAggregator,
        settings: ForumSettings,
    ) -> Self {
        Self { posts, users, scores, settings }
    }

    pub async fn create(
        &self,
        ctx: &AuthContext,
        title: &str,
        content: &str,
        image_ref: Option<String>,
    ) -> Result<Uuid> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::validation("title_and_content_required"));
        }
        let post = self
            .posts
            .insert(NewPost {
                owner_id: ctx.user_id,
                title: title.to_string(),
                content: content.to_string(),
                image_ref,
            })
            .await?;
        Ok(post.id)
    }

    pub async fn list(
        &self,
        caller: Option<&AuthContext>,
        text: Option<&str>,
        sort: PostSort,
        page: Page,
    ) -> Result<PostPage> {
        let is_moderator = caller.is_some_and(|c| c.is_moderator());
        let mut query = PostQuery {
            text: text.map(str::trim).filter(|t| !t.is_empty()).map(String::from),
            ..PostQuery::default()
        };
        match sort {
            PostSort::Latest | PostSort::Popular => {
                query.indicators = listable_indicators(is_moderator);
            }
            PostSort::Open => query.indicators = vec![PostIndicator::Open],
            PostSort::Closed => query.indicators = vec![PostIndicator::Closed],
            PostSort::Yours => {
                let ctx = caller
                    .ok_or_else(|| AppError::AuthenticationError("no_token".into()))?;
                query.owner_id = Some(ctx.user_id);
                query.indicators = if is_moderator || self.settings.mine_includes_banned {
                    vec![PostIndicator::Open, PostIndicator::Closed, PostIndicator::Banned]
                } else {
                    vec![PostIndicator::Open, PostIndicator::Closed]
                };
            }
        }

        let posts = self.posts.list(query).await?;
        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            items.push(self.summarize(post).await?);
        }
        if sort == PostSort::Popular {
            // Stable sort: the repo returns newest-first, so equal scores
            // keep recency as the tie-break.
            items.sort_by(|a, b| b.score.cmp(&a.score));
        }
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PostPage { items, total })
    }

    pub async fn get(&self, caller: Option<&AuthContext>, id: Uuid) -> Result<PostDetail> {
        let post = self
            .posts
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("post", id))?;
        if !post_visible_to(&post, caller) {
            return Err(AppError::not_found("post", id));
        }
        let my_vote = self
            .scores
            .caller_vote(caller.map(|c| c.user_id), EntityRef::post(post.id))
            .await?;
        let owner_id = post.owner_id;
        let summary = self.summarize(post).await?;
        Ok(PostDetail { summary, owner_id, my_vote })
    }

    async fn summarize(&self, post: Post) -> Result<PostSummary> {
        let score = self.scores.score(EntityRef::post(post.id)).await?;
        let comments = self.scores.comment_count(post.id).await?;
        let author = self
            .users
            .display_name(post.owner_id)
            .await?
            .unwrap_or_else(|| "User".to_string());
        Ok(PostSummary {
            id: post.id,
            title: post.title,
            content: post.content,
            image_ref: post.image_ref,
            indicator: post.indicator,
            created_at: post.created_at,
            author,
            score,
            comments,
        })
    }
}

fn listable_indicators(is_moderator: bool) -> Vec<PostIndicator> {
    if is_moderator {
        vec![PostIndicator::Open, PostIndicator::Closed, PostIndicator::Banned]
    } else {
        vec![PostIndicator::Open, PostIndicator::Closed]
    }
}
