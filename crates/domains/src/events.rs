//! # Domain Events
//!
//! Mutating services publish one of these tagged events after the primary
//! mutation commits. The notification dispatcher consumes them; swapping or
//! disabling it never touches the state-machine code.

use uuid::Uuid;

use crate::models::{Comment, Post};

#[derive(Debug, Clone)]
pub enum ForumEvent {
    /// A comment was created on `post` (top-level or reply).
    CommentCreated { post: Post, comment: Comment },
    /// An upvote was applied to `post` (a fresh +1 row or a flip onto +1,
    /// never a cleared toggle).
    PostUpvoted { post: Post, voter_id: Uuid },
    PostClosed { post: Post, closed_by: Uuid },
    PostBanned { post: Post, moderator_id: Uuid, reason: String },
}
