use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::dto::picker_dto::SharedSessions;
use crate::dto::user_dto::{CreateUser, LoginUser, TokenResponse, User, UserProfile};
use crate::error::AppError;
use crate::services::auth_user::{AuthUser, issue_token};

fn required(field: Option<String>) -> Option<String> {
    field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/**
 * POST to register a new account.
 */
pub async fn create_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Json(payload): Json<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(username), Some(password)) = (
        required(payload.email),
        required(payload.username),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };
    let email = email.to_lowercase();

    info!("Registering {}", email);

    let cost = config.bcrypt_cost;
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        username,
        password: hashed,
        created_at: Utc::now(),
    };

    /* The UNIQUE email column decides who registered first */
    sqlx::query(
        r#"
        INSERT INTO users (id, email, username, password, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password)
    .bind(user.created_at)
    .execute(&pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            warn!("Registration for existing account {}", user.email);
            AppError::Conflict("User already exists")
        }
        other => AppError::Database(other),
    })?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

/* POST to log the user in */
pub async fn login_user(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    Json(payload): Json<LoginUser>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (required(payload.email), payload.password) else {
        return Err(AppError::BadRequest("Missing credentials".to_string()));
    };

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, username, password, created_at FROM users WHERE email = ?",
    )
    .bind(email.to_lowercase())
    .fetch_optional(&pool)
    .await?;

    let Some(user) = user else {
        warn!("Login attempt for unknown account {}", email);
        return Err(AppError::InvalidCredentials);
    };

    let stored = user.password.clone();
    if !tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored)).await?? {
        warn!("Wrong password for {}", user.email);
        return Err(AppError::InvalidCredentials);
    }

    let profile = UserProfile::from(user);
    let (token, expires_in) = issue_token(&config, &profile)?;
    info!("Issued token for {}", profile.email);

    Ok(Json(TokenResponse { token, expires_in }))
}

/**
 * DELETE the caller's account, its roster and any running games.
 */
pub async fn remove_user(
    AuthUser(claims): AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Extension(sessions): Extension<SharedSessions>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found"));
    }

    sessions.write().await.retain(|key, _| key.owner_id != user_id);
    info!("Removed account {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
