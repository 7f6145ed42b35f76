//! # Notification pipeline
//!
//! The dispatcher consumes forum events and turns each into at most one
//! unread notification row. The one rule that never bends: an actor is
//! never notified about their own action.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use domains::{
    AuthContext, EntityRef, EventSink, ForumEvent, NewNotification, Notification,
    NotificationIndicator, NotificationKind, NotificationRepo, Page, Result, UserDirectory,
};

pub const DEFAULT_NOTIFICATION_PAGE: i64 = 30;

/// Longest comment excerpt carried in a notification body.
const EXCERPT_CHARS: usize = 120;

pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepo>,
}

impl NotificationDispatcher {
    pub fn new(notifications: Arc<dyn NotificationRepo>) -> Self {
        Self { notifications }
    }

    /// Insert one unread row unless the rules say skip. Recipient and kind
    /// are typed, so "absent" can only happen for the title. Returns
    /// whether a row was written.
    async fn notify(&self, new: NewNotification) -> Result<bool> {
        if new.title.is_empty() {
            return Ok(false);
        }
        if new.actor_id == Some(new.recipient_id) {
            // Self-notify suppression.
            return Ok(false);
        }
        self.notifications.insert(new).await?;
        Ok(true)
    }
}

#[async_trait]
impl EventSink for NotificationDispatcher {
    async fn publish(&self, event: ForumEvent) -> Result<()> {
        let draft = match event {
            ForumEvent::CommentCreated { post, comment } => NewNotification {
                recipient_id: post.owner_id,
                actor_id: Some(comment.owner_id),
                kind: NotificationKind::CommentOnPost,
                title: "New comment on your post".into(),
                body: Some(excerpt(&comment.content)),
                subject: Some(EntityRef::post(post.id)),
                meta: json!({ "post_id": post.id, "comment_id": comment.id }),
            },
            ForumEvent::PostUpvoted { post, voter_id } => NewNotification {
                recipient_id: post.owner_id,
                actor_id: Some(voter_id),
                kind: NotificationKind::UpvoteOnPost,
                title: "Your post was upvoted".into(),
                body: Some(post.title.clone()),
                subject: Some(EntityRef::post(post.id)),
                meta: json!({ "post_id": post.id }),
            },
            ForumEvent::PostClosed { post, closed_by } => NewNotification {
                recipient_id: post.owner_id,
                actor_id: Some(closed_by),
                kind: NotificationKind::PostClosed,
                title: "Your post was closed".into(),
                body: Some(post.title.clone()),
                subject: Some(EntityRef::post(post.id)),
                meta: json!({ "post_id": post.id }),
            },
            ForumEvent::PostBanned { post, moderator_id, reason } => NewNotification {
                recipient_id: post.owner_id,
                actor_id: Some(moderator_id),
                kind: NotificationKind::PostBanned,
                title: "Your post was removed by a moderator".into(),
                body: Some(post.title.clone()),
                subject: Some(EntityRef::post(post.id)),
                meta: json!({ "post_id": post.id, "reason": reason }),
            },
        };
        self.notify(draft).await.map(|_| ())
    }
}

fn excerpt(content: &str) -> String {
    let mut taken: String = content.chars().take(EXCERPT_CHARS).collect();
    if taken.len() < content.len() {
        taken.push('…');
    }
    taken
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub actor_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPage {
    pub items: Vec<NotificationView>,
    pub total: i64,
}

/// Read side of the pipeline: everything is scoped to the authenticated
/// recipient; there is no cross-user access path.
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
    users: Arc<dyn UserDirectory>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepo>, users: Arc<dyn UserDirectory>) -> Self {
        Self { notifications, users }
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        indicator: Option<NotificationIndicator>,
        page: Page,
    ) -> Result<NotificationPage> {
        let rows = self
            .notifications
            .list_for(ctx.user_id, indicator, page)
            .await?;
        let total = self.notifications.count_for(ctx.user_id, indicator).await?;
        let mut items = Vec::with_capacity(rows.len());
        for notification in rows {
            let actor_name = match notification.actor_id {
                Some(actor) => self.users.display_name(actor).await?,
                None => None,
            };
            items.push(NotificationView { notification, actor_name });
        }
        Ok(NotificationPage { items, total })
    }

    pub async fn unread_count(&self, ctx: &AuthContext) -> Result<i64> {
        self.notifications.unread_count(ctx.user_id).await
    }

    pub async fn mark_read(&self, ctx: &AuthContext, id: Uuid) -> Result<u64> {
        self.notifications.mark_read(ctx.user_id, id).await
    }

    pub async fn mark_all_read(&self, ctx: &AuthContext) -> Result<u64> {
        self.notifications.mark_all_read(ctx.user_id).await
    }
}
