use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::dto::team_dto::{CreateTeamMember, MemberStatus, Removed, UpdateStatus};
use crate::error::AppError;
use crate::services::auth_user::AuthUser;
use crate::services::roster;

const BAD_STATUS: &str = "Status must be either 'active' or 'inactive'";

fn parse_status(raw: &str) -> Result<MemberStatus, AppError> {
    raw.parse().map_err(|_| AppError::BadRequest(BAD_STATUS.to_string()))
}

/**
 * GET the caller's team members, newest first.
 */
pub async fn get_members(
    Extension(pool): Extension<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    info!("Fetching team members for {}", claims.sub);
    let members = roster::list_members(&pool, &claims.sub).await?;
    Ok(Json(members))
}

/**
 * POST to add a team member.
 */
pub async fn create_member(
    Extension(pool): Extension<SqlitePool>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateTeamMember>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(name), Some(status)) = (payload.name, payload.status) else {
        return Err(AppError::BadRequest("Name and status are required".to_string()));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be blank".to_string()));
    }
    let status = parse_status(&status)?;

    info!("Adding team member {} ({})", name, status);
    let member = roster::create_member(&pool, &claims.sub, name, status).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/**
 * PATCH a team member's status.
 */
pub async fn update_status(
    Extension(pool): Extension<SqlitePool>,
    AuthUser(claims): AuthUser,
    Path(member_id): Path<String>,
    Json(payload): Json<UpdateStatus>,
) -> Result<impl IntoResponse, AppError> {
    let status = payload
        .status
        .as_deref()
        .ok_or_else(|| AppError::BadRequest(BAD_STATUS.to_string()))
        .and_then(parse_status)?;

    match roster::set_status(&pool, &claims.sub, &member_id, status).await? {
        Some(member) => {
            info!("Team member {} is now {}", member.id, member.status);
            Ok(Json(member))
        }
        None => {
            warn!("Status update for unknown team member {}", member_id);
            Err(AppError::NotFound("Team member not found"))
        }
    }
}

/**
 * DELETE a single team member.
 */
pub async fn delete_member(
    Extension(pool): Extension<SqlitePool>,
    AuthUser(claims): AuthUser,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    info!("Deleting team member {}", member_id);

    if !roster::delete_member(&pool, &claims.sub, &member_id).await? {
        return Err(AppError::NotFound("Team member not found"));
    }

    Ok(Json(Removed {
        message: "Team member deleted".to_string(),
        deleted: None,
    }))
}

/**
 * DELETE every team member the caller owns.
 */
pub async fn delete_all_members(
    Extension(pool): Extension<SqlitePool>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let deleted = roster::delete_all(&pool, &claims.sub).await?;
    info!("Deleted {} team members for {}", deleted, claims.sub);

    Ok(Json(Removed {
        message: "All team members deleted".to_string(),
        deleted: Some(deleted),
    }))
}
