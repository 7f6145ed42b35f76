//! HTTP handlers. Each one resolves identity, parses input, delegates to
//! the service layer, and wraps the outcome in the envelope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use domains::{AppError, EntityKind, NotificationIndicator, Page};
use services::{
    PostSort, VoteReceipt, DEFAULT_COMMENT_PAGE, DEFAULT_NOTIFICATION_PAGE, DEFAULT_POST_PAGE,
};

use crate::envelope::{ok, ApiResult};
use crate::extract::{ApiJson, ApiQuery, Identity, RequireAuth};
use crate::AppState;

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("bad_id"))
}

pub async fn health() -> Json<Value> {
    ok(json!({}))
}

#[derive(Deserialize)]
pub struct ListPostsQuery {
    q: Option<String>,
    sort: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Identity(caller): Identity,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> ApiResult<Json<Value>> {
    let sort = match query.sort.as_deref() {
        Some(s) => PostSort::parse(s)?,
        None => PostSort::Latest,
    };
    let page = Page::clamped(query.limit, query.offset, DEFAULT_POST_PAGE);
    let result = state
        .posts
        .list(caller.as_ref(), query.q.as_deref(), sort, page)
        .await?;
    Ok(ok(json!({ "items": result.items, "total": result.total })))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostBody {
    title: Option<String>,
    content: Option<String>,
    image_ref: Option<String>,
}

pub async fn create_post(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    ApiJson(body): ApiJson<CreatePostBody>,
) -> ApiResult<impl IntoResponse> {
    let id = state
        .posts
        .create(
            &ctx,
            body.title.as_deref().unwrap_or(""),
            body.content.as_deref().unwrap_or(""),
            body.image_ref,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(json!({ "id": id }))))
}

pub async fn post_detail(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let detail = state.posts.get(caller.as_ref(), id).await?;
    Ok(ok(json!({ "post": detail })))
}

#[derive(Deserialize)]
pub struct ListCommentsQuery {
    parent_id: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Identity(caller): Identity,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<ListCommentsQuery>,
) -> ApiResult<Json<Value>> {
    let post_id = parse_id(&id)?;
    let parent_id = query
        .parent_id
        .as_deref()
        .map(|raw| Uuid::parse_str(raw).map_err(|_| AppError::validation("bad_parent")))
        .transpose()?;
    let page = Page::clamped(query.limit, query.offset, DEFAULT_COMMENT_PAGE);
    let result = state
        .comments
        .list(caller.as_ref(), post_id, parent_id, page)
        .await?;
    Ok(ok(json!({ "items": result.items, "total": result.total })))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentBody {
    content: Option<String>,
    parent_id: Option<Uuid>,
}

pub async fn create_comment(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CreateCommentBody>,
) -> ApiResult<impl IntoResponse> {
    let post_id = parse_id(&id)?;
    let comment_id = state
        .comments
        .create(
            &ctx,
            post_id,
            body.content.as_deref().unwrap_or(""),
            body.parent_id,
        )
        .await?;
    Ok((StatusCode::CREATED, ok(json!({ "id": comment_id }))))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteBody {
    vote: Option<i32>,
}

fn vote_response(receipt: VoteReceipt) -> Json<Value> {
    if receipt.cleared {
        ok(json!({ "cleared": true }))
    } else {
        ok(json!({}))
    }
}

pub async fn vote_post(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<VoteBody>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let value = body.vote.ok_or_else(|| AppError::validation("bad_vote"))?;
    let receipt = state.votes.cast(&ctx, EntityKind::Post, id, value).await?;
    Ok(vote_response(receipt))
}

pub async fn vote_comment(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<VoteBody>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let value = body.vote.ok_or_else(|| AppError::validation("bad_vote"))?;
    let receipt = state
        .votes
        .cast(&ctx, EntityKind::Comment, id, value)
        .await?;
    Ok(vote_response(receipt))
}

pub async fn close_post(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    state.moderation.close(&ctx, id).await?;
    Ok(ok(json!({})))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BanBody {
    reason: Option<String>,
}

pub async fn ban_post(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BanBody>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    state
        .moderation
        .ban(&ctx, id, body.reason.as_deref().unwrap_or(""))
        .await?;
    Ok(ok(json!({})))
}

#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    indicator: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    ApiQuery(query): ApiQuery<ListNotificationsQuery>,
) -> ApiResult<Json<Value>> {
    let indicator = query
        .indicator
        .as_deref()
        .map(|raw| {
            NotificationIndicator::parse(raw)
                .ok_or_else(|| AppError::validation("bad_indicator"))
        })
        .transpose()?;
    let page = Page::clamped(query.limit, query.offset, DEFAULT_NOTIFICATION_PAGE);
    let result = state.notifications.list(&ctx, indicator, page).await?;
    Ok(ok(json!({ "items": result.items, "total": result.total })))
}

pub async fn unread_count(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> ApiResult<Json<Value>> {
    let count = state.notifications.unread_count(&ctx).await?;
    Ok(ok(json!({ "count": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let updated = state.notifications.mark_read(&ctx, id).await?;
    Ok(ok(json!({ "updated": updated })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> ApiResult<Json<Value>> {
    let updated = state.notifications.mark_all_read(&ctx).await?;
    Ok(ok(json!({ "updated": updated })))
}
