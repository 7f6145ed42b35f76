//! # SQLite adapter
//!
//! Implements the data mapping between the SQLite relational model and the
//! `domains` entities. One store struct carries the pool and implements
//! every repo port; the binary hands out `Arc<SqliteStore>` coerced to the
//! individual trait objects.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use domains::{
    AppError, Comment, CommentRepo, EntityKind, EntityRef, NewComment, NewNotification, NewPost,
    Notification, NotificationIndicator, NotificationKind, NotificationRepo, Page, Post,
    PostIndicator, PostQuery, PostRepo, Result, UserDirectory, Vote, VoteRepo,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

pub struct SqliteStore {
    pool: SqlitePool,
}

// Helpers for UUID conversion. SQLite has no native UUID type, so ids
// travel as 16-byte BLOBs.
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

fn store_err(err: sqlx::Error) -> AppError {
    AppError::StoreError(err.to_string())
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(store_err)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(store_err)?;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::StoreError(e.to_string()))?;
        Ok(Self { pool })
    }

    /// In-memory store for tests and local experiments. Pinned to a single
    /// never-expiring connection: each new connection to `:memory:` would
    /// otherwise see a fresh empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(store_err)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(store_err)?;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::StoreError(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The user directory is owned by the profile service; this upsert
    /// exists for the seed binary and tests only.
    pub async fn upsert_user(&self, id: Uuid, display_name: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, display_name) VALUES (?, ?) \
             ON CONFLICT (id) DO UPDATE SET display_name = excluded.display_name",
        )
        .bind(uuid_to_blob(id))
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }
}

fn post_from_row(row: &SqliteRow) -> Result<Post> {
    let indicator: String = row.get("indicator");
    Ok(Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        owner_id: blob_to_uuid(row.get::<Vec<u8>, _>("owner_id").as_slice()),
        title: row.get("title"),
        content: row.get("content"),
        image_ref: row.get("image_ref"),
        indicator: PostIndicator::parse(&indicator)
            .ok_or_else(|| AppError::StoreError(format!("unknown post indicator: {indicator}")))?,
        created_at: row.get("created_at"),
    })
}

fn comment_from_row(row: &SqliteRow) -> Comment {
    Comment {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        post_id: blob_to_uuid(row.get::<Vec<u8>, _>("post_id").as_slice()),
        owner_id: blob_to_uuid(row.get::<Vec<u8>, _>("owner_id").as_slice()),
        parent_id: row
            .get::<Option<Vec<u8>>, _>("parent_id")
            .map(|b| blob_to_uuid(b.as_slice())),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

fn notification_from_row(row: &SqliteRow) -> Result<Notification> {
    let kind: String = row.get("type");
    let indicator: String = row.get("indicator");
    let subject = match (
        row.get::<Option<String>, _>("subject_type"),
        row.get::<Option<Vec<u8>>, _>("subject_id"),
    ) {
        (Some(kind), Some(id)) => EntityKind::parse(&kind)
            .map(|kind| EntityRef { kind, id: blob_to_uuid(id.as_slice()) }),
        _ => None,
    };
    Ok(Notification {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        recipient_id: blob_to_uuid(row.get::<Vec<u8>, _>("recipient_id").as_slice()),
        actor_id: row
            .get::<Option<Vec<u8>>, _>("actor_id")
            .map(|b| blob_to_uuid(b.as_slice())),
        kind: NotificationKind::parse(&kind)
            .ok_or_else(|| AppError::StoreError(format!("unknown notification type: {kind}")))?,
        title: row.get("title"),
        body: row.get("body"),
        subject,
        meta: serde_json::from_str(&row.get::<String, _>("meta")).unwrap_or_default(),
        indicator: NotificationIndicator::parse(&indicator).ok_or_else(|| {
            AppError::StoreError(format!("unknown notification indicator: {indicator}"))
        })?,
        created_at: row.get("created_at"),
    })
}

fn vote_from_row(row: &SqliteRow) -> Result<Vote> {
    let kind: String = row.get("entity_type");
    Ok(Vote {
        voter_id: blob_to_uuid(row.get::<Vec<u8>, _>("voter_id").as_slice()),
        entity: EntityRef {
            kind: EntityKind::parse(&kind)
                .ok_or_else(|| AppError::StoreError(format!("unknown entity type: {kind}")))?,
            id: blob_to_uuid(row.get::<Vec<u8>, _>("entity_id").as_slice()),
        },
        value: row.get::<i64, _>("value") as i32,
    })
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn insert(&self, new: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::now_v7(),
            owner_id: new.owner_id,
            title: new.title,
            content: new.content,
            image_ref: new.image_ref,
            indicator: PostIndicator::Open,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO forum_posts (id, owner_id, title, content, image_ref, indicator, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.id))
        .bind(uuid_to_blob(post.owner_id))
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_ref)
        .bind(post.indicator.as_str())
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(post)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, owner_id, title, content, image_ref, indicator, created_at \
             FROM forum_posts WHERE id = ?",
        )
        .bind(uuid_to_blob(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn list(&self, query: PostQuery) -> Result<Vec<Post>> {
        let mut sql = String::from(
            "SELECT id, owner_id, title, content, image_ref, indicator, created_at \
             FROM forum_posts WHERE 1=1",
        );
        if query.text.is_some() {
            sql.push_str(" AND (title LIKE ? OR content LIKE ?)");
        }
        if query.owner_id.is_some() {
            sql.push_str(" AND owner_id = ?");
        }
        if !query.indicators.is_empty() {
            let marks = vec!["?"; query.indicators.len()].join(", ");
            sql.push_str(&format!(" AND indicator IN ({marks})"));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = sqlx::query(&sql);
        if let Some(text) = &query.text {
            let needle = format!("%{text}%");
            stmt = stmt.bind(needle.clone()).bind(needle);
        }
        if let Some(owner) = query.owner_id {
            stmt = stmt.bind(uuid_to_blob(owner));
        }
        for indicator in &query.indicators {
            stmt = stmt.bind(indicator.as_str());
        }

        let rows = stmt.fetch_all(&self.pool).await.map_err(store_err)?;
        rows.iter().map(post_from_row).collect()
    }

    async fn set_indicator(&self, id: Uuid, indicator: PostIndicator) -> Result<()> {
        sqlx::query("UPDATE forum_posts SET indicator = ? WHERE id = ?")
            .bind(indicator.as_str())
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn insert(&self, new: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::now_v7(),
            post_id: new.post_id,
            owner_id: new.owner_id,
            parent_id: new.parent_id,
            content: new.content,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO forum_comments (id, post_id, owner_id, parent_id, content, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.id))
        .bind(uuid_to_blob(comment.post_id))
        .bind(uuid_to_blob(comment.owner_id))
        .bind(comment.parent_id.map(uuid_to_blob))
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(comment)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, post_id, owner_id, parent_id, content, created_at \
             FROM forum_comments WHERE id = ?",
        )
        .bind(uuid_to_blob(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn list_for_post(
        &self,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<Comment>> {
        let rows = match parent_id {
            Some(parent) => {
                sqlx::query(
                    "SELECT id, post_id, owner_id, parent_id, content, created_at \
                     FROM forum_comments WHERE post_id = ? AND parent_id = ? \
                     ORDER BY created_at ASC LIMIT ? OFFSET ?",
                )
                .bind(uuid_to_blob(post_id))
                .bind(uuid_to_blob(parent))
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, post_id, owner_id, parent_id, content, created_at \
                     FROM forum_comments WHERE post_id = ? \
                     ORDER BY created_at ASC LIMIT ? OFFSET ?",
                )
                .bind(uuid_to_blob(post_id))
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_err)?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM forum_comments WHERE post_id = ?")
            .bind(uuid_to_blob(post_id))
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(row.get("n"))
    }

    async fn count_matching(&self, post_id: Uuid, parent_id: Option<Uuid>) -> Result<i64> {
        let row = match parent_id {
            Some(parent) => {
                sqlx::query(
                    "SELECT COUNT(*) AS n FROM forum_comments WHERE post_id = ? AND parent_id = ?",
                )
                .bind(uuid_to_blob(post_id))
                .bind(uuid_to_blob(parent))
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS n FROM forum_comments WHERE post_id = ?")
                    .bind(uuid_to_blob(post_id))
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(store_err)?;
        Ok(row.get("n"))
    }
}

#[async_trait]
impl VoteRepo for SqliteStore {
    async fn find(&self, voter_id: Uuid, entity: EntityRef) -> Result<Option<Vote>> {
        let row = sqlx::query(
            "SELECT voter_id, entity_type, entity_id, value FROM votes \
             WHERE voter_id = ? AND entity_type = ? AND entity_id = ?",
        )
        .bind(uuid_to_blob(voter_id))
        .bind(entity.kind.as_str())
        .bind(uuid_to_blob(entity.id))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        row.as_ref().map(vote_from_row).transpose()
    }

    async fn upsert(&self, vote: Vote) -> Result<()> {
        // The ON CONFLICT arm is what makes concurrent casts from the same
        // voter safe: the loser of an insert race becomes an update.
        sqlx::query(
            "INSERT INTO votes (voter_id, entity_type, entity_id, value) VALUES (?, ?, ?, ?) \
             ON CONFLICT (voter_id, entity_type, entity_id) DO UPDATE SET value = excluded.value",
        )
        .bind(uuid_to_blob(vote.voter_id))
        .bind(vote.entity.kind.as_str())
        .bind(uuid_to_blob(vote.entity.id))
        .bind(vote.value as i64)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn clear(&self, voter_id: Uuid, entity: EntityRef) -> Result<()> {
        sqlx::query("DELETE FROM votes WHERE voter_id = ? AND entity_type = ? AND entity_id = ?")
            .bind(uuid_to_blob(voter_id))
            .bind(entity.kind.as_str())
            .bind(uuid_to_blob(entity.id))
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn list_for_entity(&self, entity: EntityRef) -> Result<Vec<Vote>> {
        let rows = sqlx::query(
            "SELECT voter_id, entity_type, entity_id, value FROM votes \
             WHERE entity_type = ? AND entity_id = ?",
        )
        .bind(entity.kind.as_str())
        .bind(uuid_to_blob(entity.id))
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        rows.iter().map(vote_from_row).collect()
    }
}

#[async_trait]
impl NotificationRepo for SqliteStore {
    async fn insert(&self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::now_v7(),
            recipient_id: new.recipient_id,
            actor_id: new.actor_id,
            kind: new.kind,
            title: new.title,
            body: new.body,
            subject: new.subject,
            meta: new.meta,
            indicator: NotificationIndicator::Unread,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO notifications \
             (id, recipient_id, actor_id, type, title, body, subject_type, subject_id, meta, indicator, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(notification.id))
        .bind(uuid_to_blob(notification.recipient_id))
        .bind(notification.actor_id.map(uuid_to_blob))
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.subject.map(|s| s.kind.as_str()))
        .bind(notification.subject.map(|s| uuid_to_blob(s.id)))
        .bind(notification.meta.to_string())
        .bind(notification.indicator.as_str())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(notification)
    }

    async fn list_for(
        &self,
        recipient_id: Uuid,
        indicator: Option<NotificationIndicator>,
        page: Page,
    ) -> Result<Vec<Notification>> {
        let rows = match indicator {
            Some(indicator) => {
                sqlx::query(
                    "SELECT id, recipient_id, actor_id, type, title, body, subject_type, \
                            subject_id, meta, indicator, created_at \
                     FROM notifications WHERE recipient_id = ? AND indicator = ? \
                     ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(uuid_to_blob(recipient_id))
                .bind(indicator.as_str())
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, recipient_id, actor_id, type, title, body, subject_type, \
                            subject_id, meta, indicator, created_at \
                     FROM notifications WHERE recipient_id = ? \
                     ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(uuid_to_blob(recipient_id))
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_err)?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn count_for(
        &self,
        recipient_id: Uuid,
        indicator: Option<NotificationIndicator>,
    ) -> Result<i64> {
        let row = match indicator {
            Some(indicator) => {
                sqlx::query(
                    "SELECT COUNT(*) AS n FROM notifications \
                     WHERE recipient_id = ? AND indicator = ?",
                )
                .bind(uuid_to_blob(recipient_id))
                .bind(indicator.as_str())
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS n FROM notifications WHERE recipient_id = ?")
                    .bind(uuid_to_blob(recipient_id))
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(store_err)?;
        Ok(row.get("n"))
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        self.count_for(recipient_id, Some(NotificationIndicator::Unread))
            .await
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET indicator = 'read' WHERE id = ? AND recipient_id = ?",
        )
        .bind(uuid_to_blob(id))
        .bind(uuid_to_blob(recipient_id))
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET indicator = 'read' \
             WHERE recipient_id = ? AND indicator = 'unread'",
        )
        .bind(uuid_to_blob(recipient_id))
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn display_name(&self, id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query("SELECT display_name FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(row.map(|r| r.get("display_name")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_post(owner_id: Uuid) -> (SqliteStore, Post) {
        let store = SqliteStore::in_memory().await.unwrap();
        let post = PostRepo::insert(
            &store,
            NewPost {
                owner_id,
                title: "Leaf spot?".into(),
                content: "Dark rings on the older leaves.".into(),
                image_ref: None,
            },
        )
        .await
        .unwrap();
        (store, post)
    }

    #[tokio::test]
    async fn insert_then_find_round_trips_a_post() {
        let owner = Uuid::now_v7();
        let (store, post) = store_with_post(owner).await;
        let found = PostRepo::find(&store, post.id).await.unwrap().unwrap();
        assert_eq!(found.id, post.id);
        assert_eq!(found.owner_id, owner);
        assert_eq!(found.indicator, PostIndicator::Open);
    }

    #[tokio::test]
    async fn list_honors_indicator_and_text_filters() {
        let (store, post) = store_with_post(Uuid::now_v7()).await;
        PostRepo::set_indicator(&store, post.id, PostIndicator::Banned)
            .await
            .unwrap();

        let visible = PostRepo::list(
            &store,
            PostQuery {
                indicators: vec![PostIndicator::Open, PostIndicator::Closed],
                ..PostQuery::default()
            },
        )
        .await
        .unwrap();
        assert!(visible.is_empty());

        let by_text = PostRepo::list(
            &store,
            PostQuery {
                text: Some("older leaves".into()),
                indicators: vec![PostIndicator::Banned],
                ..PostQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_text.len(), 1);
    }

    #[tokio::test]
    async fn vote_upsert_keeps_a_single_row_per_voter() {
        let (store, post) = store_with_post(Uuid::now_v7()).await;
        let voter = Uuid::now_v7();
        let entity = EntityRef::post(post.id);

        store
            .upsert(Vote { voter_id: voter, entity, value: 1 })
            .await
            .unwrap();
        store
            .upsert(Vote { voter_id: voter, entity, value: -1 })
            .await
            .unwrap();

        let rows = store.list_for_entity(entity).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, -1);
    }

    #[tokio::test]
    async fn clearing_an_absent_vote_succeeds() {
        let (store, post) = store_with_post(Uuid::now_v7()).await;
        store
            .clear(Uuid::now_v7(), EntityRef::post(post.id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn comment_listing_filters_by_parent_and_pages_chronologically() {
        let (store, post) = store_with_post(Uuid::now_v7()).await;
        let author = Uuid::now_v7();
        let top = CommentRepo::insert(
            &store,
            NewComment {
                post_id: post.id,
                owner_id: author,
                parent_id: None,
                content: "first".into(),
            },
        )
        .await
        .unwrap();
        CommentRepo::insert(
            &store,
            NewComment {
                post_id: post.id,
                owner_id: author,
                parent_id: Some(top.id),
                content: "reply".into(),
            },
        )
        .await
        .unwrap();

        let page = Page::clamped(None, None, 50);
        let all = store.list_for_post(post.id, None, page).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].content, "first");

        let replies = store
            .list_for_post(post.id, Some(top.id), page)
            .await
            .unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].parent_id, Some(top.id));

        assert_eq!(store.count_for_post(post.id).await.unwrap(), 2);
        assert_eq!(store.count_matching(post.id, Some(top.id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_read_is_scoped_to_the_recipient() {
        let store = SqliteStore::in_memory().await.unwrap();
        let recipient = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let notification = NotificationRepo::insert(
            &store,
            NewNotification {
                recipient_id: recipient,
                actor_id: Some(Uuid::now_v7()),
                kind: NotificationKind::CommentOnPost,
                title: "New comment on your post".into(),
                body: None,
                subject: None,
                meta: serde_json::json!({}),
            },
        )
        .await
        .unwrap();

        assert_eq!(store.mark_read(stranger, notification.id).await.unwrap(), 0);
        assert_eq!(store.unread_count(recipient).await.unwrap(), 1);
        assert_eq!(store.mark_read(recipient, notification.id).await.unwrap(), 1);
        assert_eq!(store.unread_count(recipient).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn notification_round_trip_preserves_meta_and_subject() {
        let store = SqliteStore::in_memory().await.unwrap();
        let recipient = Uuid::now_v7();
        let subject = EntityRef::post(Uuid::now_v7());
        NotificationRepo::insert(
            &store,
            NewNotification {
                recipient_id: recipient,
                actor_id: None,
                kind: NotificationKind::PostBanned,
                title: "Your post was removed by a moderator".into(),
                body: Some("Leaf spot?".into()),
                subject: Some(subject),
                meta: serde_json::json!({ "reason": "spam" }),
            },
        )
        .await
        .unwrap();

        let rows = store
            .list_for(recipient, None, Page::clamped(None, None, 30))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, Some(subject));
        assert_eq!(rows[0].meta["reason"], "spam");
        assert_eq!(rows[0].indicator, NotificationIndicator::Unread);
    }
}
