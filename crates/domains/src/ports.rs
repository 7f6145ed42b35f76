//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Durable state lives behind the repo ports; the service layer recomputes
//! derived values (scores, counts) from them on every read.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::events::ForumEvent;
use crate::models::{
    AuthContext, Comment, EntityRef, NewComment, NewNotification, NewPost, Notification,
    NotificationIndicator, Page, Post, PostIndicator, PostQuery, Vote,
};

/// Persistence contract for posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert(&self, new: NewPost) -> Result<Post>;
    async fn find(&self, id: Uuid) -> Result<Option<Post>>;
    /// Matching posts, newest first. Returns the full matching set; paging
    /// and score ordering happen in the service layer.
    async fn list(&self, query: PostQuery) -> Result<Vec<Post>>;
    async fn set_indicator(&self, id: Uuid, indicator: PostIndicator) -> Result<()>;
}

/// Persistence contract for threaded comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn insert(&self, new: NewComment) -> Result<Comment>;
    async fn find(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Comments on a post in chronological ascending order. A `parent_id`
    /// restricts the listing to direct replies of that comment.
    async fn list_for_post(
        &self,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<Comment>>;
    /// All comments on the post, regardless of depth.
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64>;
    /// Comments matching the same filter `list_for_post` would apply.
    async fn count_matching(&self, post_id: Uuid, parent_id: Option<Uuid>) -> Result<i64>;
}

/// The vote ledger: a mapping of (voter, entity) to ±1, not a log.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteRepo: Send + Sync {
    async fn find(&self, voter_id: Uuid, entity: EntityRef) -> Result<Option<Vote>>;
    /// Insert or overwrite the voter's row for the entity. Concurrent
    /// inserts for the same (voter, entity) must resolve to an update, not
    /// a surfaced conflict.
    async fn upsert(&self, vote: Vote) -> Result<()>;
    /// Delete the voter's row for the entity. Deleting an absent row is a
    /// no-op success.
    async fn clear(&self, voter_id: Uuid, entity: EntityRef) -> Result<()>;
    /// Every ledger row for the entity.
    async fn list_for_entity(&self, entity: EntityRef) -> Result<Vec<Vote>>;
}

/// Persistence contract for notifications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert(&self, new: NewNotification) -> Result<Notification>;
    /// The recipient's notifications, newest first, optionally filtered by
    /// read state.
    async fn list_for(
        &self,
        recipient_id: Uuid,
        indicator: Option<NotificationIndicator>,
        page: Page,
    ) -> Result<Vec<Notification>>;
    async fn count_for(
        &self,
        recipient_id: Uuid,
        indicator: Option<NotificationIndicator>,
    ) -> Result<i64>;
    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64>;
    /// Flip unread → read for one notification, scoped to the recipient.
    /// Returns the number of rows updated (0 or 1).
    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<u64>;
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64>;
}

/// Read-only lookup into the externally-owned user profiles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, id: Uuid) -> Result<Option<String>>;
}

/// Identity and role resolution. Implemented by the auth adapter; the
/// forum core never parses or verifies credentials itself.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Map a bearer credential to the caller's identity, or an
    /// `AuthenticationError` carrying the stable wire code.
    async fn resolve(&self, token: &str) -> Result<AuthContext>;
}

/// Post-commit event outlet. Services publish here after the primary
/// mutation succeeds; a failing sink degrades the action (logged), never
/// rolls it back.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: ForumEvent) -> Result<()>;
}
