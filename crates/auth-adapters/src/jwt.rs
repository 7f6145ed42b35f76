//! HS256 implementation of `IdentityProvider`.
//!
//! Token payloads follow the account service's convention: the user id in
//! `id` (older tokens used `uid`), the role as a lowercase string. The
//! legacy role literal `admin` maps to moderator authority.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use uuid::Uuid;

use domains::{AppError, AuthContext, IdentityProvider, Result, Role};

#[derive(Debug, Deserialize)]
struct Claims {
    id: Option<Uuid>,
    uid: Option<Uuid>,
    role: Option<String>,
}

pub struct JwtIdentity {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    /// `exp` is required and validated; everything else in the default
    /// validation stays as-is.
    pub fn new(secret: SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn resolve(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "token verification failed");
            AppError::AuthenticationError("invalid_token".into())
        })?;
        let claims = data.claims;
        let user_id = claims
            .id
            .or(claims.uid)
            .ok_or_else(|| AppError::AuthenticationError("bad_token_payload".into()))?;
        let role = match claims.role.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("moderator") || r.eq_ignore_ascii_case("admin") => {
                Role::Moderator
            }
            _ => Role::User,
        };
        Ok(AuthContext { user_id, role })
    }
}
