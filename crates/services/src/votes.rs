//! # Vote toggle
//!
//! The ledger holds at most one row per (voter, entity). Casting the value
//! already stored, or an explicit 0, clears the row; anything else
//! upserts. Concurrent casts from the same voter are resolved by the
//! store's uniqueness constraint, not by locking here.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use domains::{
    AppError, AuthContext, CommentRepo, EntityKind, EntityRef, EventSink, ForumEvent, Post,
    PostRepo, Result, Vote, VoteRepo,
};

use crate::{post_visible_to, publish_or_log};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoteReceipt {
    pub cleared: bool,
}

pub struct VoteService {
    votes: Arc<dyn VoteRepo>,
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    events: Arc<dyn EventSink>,
}

impl VoteService {
    pub fn new(
        votes: Arc<dyn VoteRepo>,
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { votes, posts, comments, events }
    }

    pub async fn cast(
        &self,
        ctx: &AuthContext,
        kind: EntityKind,
        entity_id: Uuid,
        value: i32,
    ) -> Result<VoteReceipt> {
        if !matches!(value, -1 | 0 | 1) {
            return Err(AppError::validation("bad_vote"));
        }

        // Resolve the target up front; for posts this also gives us the
        // notification recipient.
        let post = self.resolve_target(ctx, kind, entity_id).await?;
        let entity = EntityRef { kind, id: entity_id };
        let existing = self.votes.find(ctx.user_id, entity).await?;

        if value == 0 || existing.map(|v| v.value) == Some(value) {
            self.votes.clear(ctx.user_id, entity).await?;
            return Ok(VoteReceipt { cleared: true });
        }

        self.votes
            .upsert(Vote { voter_id: ctx.user_id, entity, value })
            .await?;
        if value == 1 {
            if let Some(post) = post {
                publish_or_log(
                    &*self.events,
                    ForumEvent::PostUpvoted { post, voter_id: ctx.user_id },
                )
                .await;
            }
        }
        Ok(VoteReceipt { cleared: false })
    }

    /// `Some(post)` for post votes, `None` for comment votes.
    async fn resolve_target(
        &self,
        ctx: &AuthContext,
        kind: EntityKind,
        entity_id: Uuid,
    ) -> Result<Option<Post>> {
        match kind {
            EntityKind::Post => {
                let post = self
                    .posts
                    .find(entity_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("post", entity_id))?;
                if !post_visible_to(&post, Some(ctx)) {
                    return Err(AppError::not_found("post", entity_id));
                }
                Ok(Some(post))
            }
            EntityKind::Comment => {
                self.comments
                    .find(entity_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("comment", entity_id))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{
        MockCommentRepo, MockEventSink, MockPostRepo, MockVoteRepo, PostIndicator, Role,
    };

    fn ctx() -> AuthContext {
        AuthContext { user_id: Uuid::now_v7(), role: Role::User }
    }

    fn open_post() -> Post {
        Post {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            title: "Powdery mildew on squash".into(),
            content: "White dust on both leaf faces.".into(),
            image_ref: None,
            indicator: PostIndicator::Open,
            created_at: Utc::now(),
        }
    }

    fn service(votes: MockVoteRepo, posts: MockPostRepo, events: MockEventSink) -> VoteService {
        VoteService::new(
            Arc::new(votes),
            Arc::new(posts),
            Arc::new(MockCommentRepo::new()),
            Arc::new(events),
        )
    }

    #[tokio::test]
    async fn out_of_range_value_is_rejected() {
        let svc = service(MockVoteRepo::new(), MockPostRepo::new(), MockEventSink::new());
        let err = svc
            .cast(&ctx(), EntityKind::Post, Uuid::now_v7(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(code) if code == "bad_vote"));
    }

    #[tokio::test]
    async fn fresh_upvote_applies_and_notifies() {
        let post = open_post();
        let post_id = post.id;
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(move |_| Ok(Some(post.clone())));
        let mut votes = MockVoteRepo::new();
        votes.expect_find().returning(|_, _| Ok(None));
        votes
            .expect_upsert()
            .withf(|v| v.value == 1)
            .times(1)
            .returning(|_| Ok(()));
        let mut events = MockEventSink::new();
        events
            .expect_publish()
            .withf(|e| matches!(e, ForumEvent::PostUpvoted { .. }))
            .times(1)
            .returning(|_| Ok(()));

        let receipt = service(votes, posts, events)
            .cast(&ctx(), EntityKind::Post, post_id, 1)
            .await
            .unwrap();
        assert!(!receipt.cleared);
    }

    #[tokio::test]
    async fn repeating_the_same_vote_clears_without_notifying() {
        let post = open_post();
        let post_id = post.id;
        let caller = ctx();
        let existing = Vote {
            voter_id: caller.user_id,
            entity: EntityRef::post(post_id),
            value: 1,
        };
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(move |_| Ok(Some(post.clone())));
        let mut votes = MockVoteRepo::new();
        votes.expect_find().returning(move |_, _| Ok(Some(existing)));
        votes.expect_clear().times(1).returning(|_, _| Ok(()));
        votes.expect_upsert().never();
        let mut events = MockEventSink::new();
        events.expect_publish().never();

        let receipt = service(votes, posts, events)
            .cast(&caller, EntityKind::Post, post_id, 1)
            .await
            .unwrap();
        assert!(receipt.cleared);
    }

    #[tokio::test]
    async fn explicit_zero_clears_even_when_no_row_exists() {
        let post = open_post();
        let post_id = post.id;
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(move |_| Ok(Some(post.clone())));
        let mut votes = MockVoteRepo::new();
        votes.expect_find().returning(|_, _| Ok(None));
        votes.expect_clear().times(1).returning(|_, _| Ok(()));
        let mut events = MockEventSink::new();
        events.expect_publish().never();

        let receipt = service(votes, posts, events)
            .cast(&ctx(), EntityKind::Post, post_id, 0)
            .await
            .unwrap();
        assert!(receipt.cleared);
    }

    #[tokio::test]
    async fn flip_from_downvote_to_upvote_notifies() {
        let post = open_post();
        let post_id = post.id;
        let caller = ctx();
        let existing = Vote {
            voter_id: caller.user_id,
            entity: EntityRef::post(post_id),
            value: -1,
        };
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(move |_| Ok(Some(post.clone())));
        let mut votes = MockVoteRepo::new();
        votes.expect_find().returning(move |_, _| Ok(Some(existing)));
        votes
            .expect_upsert()
            .withf(|v| v.value == 1)
            .times(1)
            .returning(|_| Ok(()));
        let mut events = MockEventSink::new();
        events.expect_publish().times(1).returning(|_| Ok(()));

        service(votes, posts, events)
            .cast(&caller, EntityKind::Post, post_id, 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn downvote_never_notifies() {
        let post = open_post();
        let post_id = post.id;
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(move |_| Ok(Some(post.clone())));
        let mut votes = MockVoteRepo::new();
        votes.expect_find().returning(|_, _| Ok(None));
        votes.expect_upsert().times(1).returning(|_| Ok(()));
        let mut events = MockEventSink::new();
        events.expect_publish().never();

        service(votes, posts, events)
            .cast(&ctx(), EntityKind::Post, post_id, -1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn voting_on_a_missing_post_is_not_found() {
        let mut posts = MockPostRepo::new();
        posts.expect_find().returning(|_| Ok(None));
        let mut votes = MockVoteRepo::new();
        votes.expect_upsert().never();
        let svc = service(votes, posts, MockEventSink::new());

        let err = svc
            .cast(&ctx(), EntityKind::Post, Uuid::now_v7(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(..)));
    }
}
