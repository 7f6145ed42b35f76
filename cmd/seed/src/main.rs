//! Development seed: two users, a post with a threaded comment, and one
//! upvote. Ids are fixed so bearer tokens minted against them stay valid
//! across reseeds.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::{uuid, Uuid};

use configs::AppConfig;
use domains::{CommentRepo, EntityRef, NewComment, NewPost, PostRepo, Vote, VoteRepo};
use storage_adapters::SqliteStore;

const AMARA: Uuid = uuid!("018f0000-0000-7000-8000-000000000001");
const KOFI: Uuid = uuid!("018f0000-0000-7000-8000-000000000002");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = SqliteStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to the database")?;

    store.upsert_user(AMARA, "Amara Diallo").await?;
    store.upsert_user(KOFI, "Kofi Mensah").await?;

    let post = PostRepo::insert(
        &store,
        NewPost {
            owner_id: AMARA,
            title: "Yellow spots on tomato leaves".into(),
            content: "Started on the lower leaves after last week's rain. \
                      Spreading upward fast — early blight?"
                .into(),
            image_ref: None,
        },
    )
    .await?;

    let comment = CommentRepo::insert(
        &store,
        NewComment {
            post_id: post.id,
            owner_id: KOFI,
            parent_id: None,
            content: "Looks like early blight to me. Remove the affected \
                      leaves and try a copper fungicide."
                .into(),
        },
    )
    .await?;

    store
        .upsert(Vote {
            voter_id: KOFI,
            entity: EntityRef::post(post.id),
            value: 1,
        })
        .await?;

    info!(post = %post.id, comment = %comment.id, "seeded demo forum data");
    info!("user ids: amara={AMARA} kofi={KOFI}");
    Ok(())
}
