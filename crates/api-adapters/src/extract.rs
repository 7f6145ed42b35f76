//! Request extractors: caller identity and strict input schemas.
//!
//! Identity is threaded into every handler as an explicit value; there is
//! no ambient "current user" anywhere in the core.

use std::convert::Infallible;

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use domains::{AppError, AuthContext};

use crate::envelope::ApiError;
use crate::AppState;

/// Optional identity. Reads degrade to anonymous on a missing or
/// unresolvable token rather than failing the request.
pub struct Identity(pub Option<AuthContext>);

/// Required identity: 401 with `no_token` when the header is missing and
/// the resolver's own code when verification fails.
pub struct RequireAuth(pub AuthContext);

fn bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = match bearer(parts) {
            Some(token) => state.identity.resolve(token).await.ok(),
            None => None,
        };
        Ok(Identity(ctx))
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer(parts) else {
            return Err(ApiError(AppError::AuthenticationError("no_token".into())));
        };
        state
            .identity
            .resolve(token)
            .await
            .map(RequireAuth)
            .map_err(ApiError)
    }
}

/// Strict JSON body: malformed or unknown-shaped payloads are rejected
/// inside the uniform envelope instead of axum's plain-text default.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(_) => Err(ApiError(AppError::validation("malformed_payload"))),
        }
    }
}

/// Same treatment for query strings.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(_) => Err(ApiError(AppError::validation("malformed_query"))),
        }
    }
}
