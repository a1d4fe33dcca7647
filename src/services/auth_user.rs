use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use tracing::{error, warn};

use crate::config::Config;
use crate::dto::claims_dto::Claims;
use crate::dto::user_dto::UserProfile;
use crate::error::AppError;

/// The authenticated caller. Handlers scope every roster and game query by
/// `claims.sub`.
pub struct AuthUser(pub Claims);

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = parts.extensions.get::<Arc<Config>>().cloned().ok_or_else(|| {
            error!("Config extension missing, cannot validate tokens");
            AppError::Unauthorized
        })?;

        let header_token = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_string);

        // browsers cannot set headers on a websocket upgrade
        let token = match header_token {
            Some(token) => token,
            None => Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|q| q.0.token)
                .ok_or(AppError::Unauthorized)?,
        };

        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("Token decoding failed: {:?}", e);
            AppError::Unauthorized
        })?;

        Ok(AuthUser(claims.claims))
    }
}

/// Signs a token for `user`. Returns the token and its lifetime in seconds.
pub fn issue_token(config: &Config, user: &UserProfile) -> Result<(String, i64), AppError> {
    let ttl = Duration::hours(config.token_ttl_hours);
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        username: user.username.clone(),
        exp: (Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, ttl.num_seconds()))
}
