//! # services
//!
//! The forum interaction engine: post/comment lifecycle, the vote toggle,
//! the moderation state machine, read-time score aggregation, and the
//! notification dispatcher. Everything here is written against the port
//! traits in `domains`; no adapter types leak in.

pub mod comments;
pub mod moderation;
pub mod notifications;
pub mod posts;
pub mod score;
pub mod votes;

pub use comments::{CommentPage, CommentService, CommentView, DEFAULT_COMMENT_PAGE};
pub use moderation::ModerationService;
pub use notifications::{
    NotificationDispatcher, NotificationPage, NotificationService, NotificationView,
    DEFAULT_NOTIFICATION_PAGE,
};
pub use posts::{PostDetail, PostPage, PostService, PostSort, PostSummary, DEFAULT_POST_PAGE};
pub use score::{net_score, ScoreAggregator};
pub use votes::{VoteReceipt, VoteService};

use domains::{AuthContext, EventSink, ForumEvent, Post, PostIndicator};

/// Policy tunables threaded in from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForumSettings {
    /// Whether the `yours` listing includes the caller's own banned posts.
    pub mine_includes_banned: bool,
}

/// Banned posts are hidden from everyone but moderators.
pub(crate) fn post_visible_to(post: &Post, caller: Option<&AuthContext>) -> bool {
    post.indicator != PostIndicator::Banned || caller.is_some_and(|c| c.is_moderator())
}

/// Publish an event, isolating sink failures from the primary mutation:
/// the store write has already committed, so a failing dispatcher degrades
/// the action instead of rolling it back.
pub(crate) async fn publish_or_log(events: &dyn EventSink, event: ForumEvent) {
    if let Err(err) = events.publish(event).await {
        tracing::warn!(error = %err, "event dispatch failed; primary mutation already committed");
    }
}
