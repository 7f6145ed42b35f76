//! # Domain Models
//!
//! These structs represent the core entities of the forum engine.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller identity as resolved by the identity adapter. The forum core
/// trusts this context; it never inspects credentials itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Grants ban and force-close authority independent of ownership.
    Moderator,
}

/// Moderation state of a post. Transitions only move forward:
/// open → closed, open|closed → banned. Banned is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostIndicator {
    Open,
    Closed,
    Banned,
}

impl PostIndicator {
    /// Next state for a close request. `None` means the request is an
    /// idempotent no-op (already closed, or banned).
    pub fn close(self) -> Option<PostIndicator> {
        match self {
            PostIndicator::Open => Some(PostIndicator::Closed),
            PostIndicator::Closed | PostIndicator::Banned => None,
        }
    }

    /// Next state for a ban request. `None` only when already banned.
    pub fn ban(self) -> Option<PostIndicator> {
        match self {
            PostIndicator::Open | PostIndicator::Closed => Some(PostIndicator::Banned),
            PostIndicator::Banned => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostIndicator::Open => "open",
            PostIndicator::Closed => "closed",
            PostIndicator::Banned => "banned",
        }
    }

    pub fn parse(s: &str) -> Option<PostIndicator> {
        match s {
            "open" => Some(PostIndicator::Open),
            "closed" => Some(PostIndicator::Closed),
            "banned" => Some(PostIndicator::Banned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    /// Opaque reference into the (external) media store.
    pub image_ref: Option<String>,
    pub indicator: PostIndicator,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub owner_id: Uuid,
    /// Reply target; must belong to the same post.
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// The two kinds of votable (and notification-subject) entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Post,
    Comment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
        }
    }

    pub fn parse(s: &str) -> Option<EntityKind> {
        match s {
            "post" => Some(EntityKind::Post),
            "comment" => Some(EntityKind::Comment),
            _ => None,
        }
    }
}

/// A typed reference to a post or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: Uuid,
}

impl EntityRef {
    pub fn post(id: Uuid) -> EntityRef {
        EntityRef { kind: EntityKind::Post, id }
    }

    pub fn comment(id: Uuid) -> EntityRef {
        EntityRef { kind: EntityKind::Comment, id }
    }
}

/// One ledger row. The ledger holds at most one row per
/// (voter, entity) pair; a stored value is always +1 or −1, never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: Uuid,
    pub entity: EntityRef,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CommentOnPost,
    UpvoteOnPost,
    PostClosed,
    PostBanned,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::CommentOnPost => "comment_on_post",
            NotificationKind::UpvoteOnPost => "upvote_on_post",
            NotificationKind::PostClosed => "post_closed",
            NotificationKind::PostBanned => "post_banned",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationKind> {
        match s {
            "comment_on_post" => Some(NotificationKind::CommentOnPost),
            "upvote_on_post" => Some(NotificationKind::UpvoteOnPost),
            "post_closed" => Some(NotificationKind::PostClosed),
            "post_banned" => Some(NotificationKind::PostBanned),
            _ => None,
        }
    }
}

/// Read state of a notification: unread → read, one-directional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationIndicator {
    Unread,
    Read,
}

impl NotificationIndicator {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationIndicator::Unread => "unread",
            NotificationIndicator::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationIndicator> {
        match s {
            "unread" => Some(NotificationIndicator::Unread),
            "read" => Some(NotificationIndicator::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub subject: Option<EntityRef>,
    /// Opaque structured payload (e.g. the ban reason).
    pub meta: serde_json::Value,
    pub indicator: NotificationIndicator,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub subject: Option<EntityRef>,
    pub meta: serde_json::Value,
}

/// Clamped pagination window. `limit` never exceeds 100; a missing or
/// non-positive limit falls back to the per-endpoint default (the legacy
/// API treated `limit=0` the same as "absent").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

pub const MAX_PAGE_LIMIT: i64 = 100;

impl Page {
    pub fn clamped(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Page {
        let limit = match limit {
            Some(n) if n > 0 => n.min(MAX_PAGE_LIMIT),
            _ => default_limit,
        };
        let offset = offset.unwrap_or(0).max(0);
        Page { limit, offset }
    }
}

/// Store-side filter for post listings. Visibility policy (which indicators
/// a caller may see) is decided in the service layer; the store only
/// materializes the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Substring match against title or content.
    pub text: Option<String>,
    pub owner_id: Option<Uuid>,
    /// Empty means "any indicator".
    pub indicators: Vec<PostIndicator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_only_leaves_open() {
        assert_eq!(PostIndicator::Open.close(), Some(PostIndicator::Closed));
        assert_eq!(PostIndicator::Closed.close(), None);
        assert_eq!(PostIndicator::Banned.close(), None);
    }

    #[test]
    fn ban_is_terminal() {
        assert_eq!(PostIndicator::Open.ban(), Some(PostIndicator::Banned));
        assert_eq!(PostIndicator::Closed.ban(), Some(PostIndicator::Banned));
        assert_eq!(PostIndicator::Banned.ban(), None);
    }

    #[test]
    fn indicator_round_trips_through_text() {
        for ind in [PostIndicator::Open, PostIndicator::Closed, PostIndicator::Banned] {
            assert_eq!(PostIndicator::parse(ind.as_str()), Some(ind));
        }
        assert_eq!(PostIndicator::parse("ban"), None);
    }

    #[test]
    fn page_clamps_limit_and_offset() {
        assert_eq!(Page::clamped(None, None, 20), Page { limit: 20, offset: 0 });
        assert_eq!(Page::clamped(Some(0), Some(-5), 20), Page { limit: 20, offset: 0 });
        assert_eq!(Page::clamped(Some(500), Some(40), 20), Page { limit: 100, offset: 40 });
    }
}
