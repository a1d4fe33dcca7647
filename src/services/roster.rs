//! Owner-scoped queries over `team_members`.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::team_dto::{MemberStatus, TeamMember};

const MEMBER_COLUMNS: &str = "id, owner_id, name, status, created_at";

/// Newest first.
pub async fn list_members(pool: &SqlitePool, owner_id: &str) -> Result<Vec<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM team_members WHERE owner_id = ? ORDER BY created_at DESC, id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn list_active_members(pool: &SqlitePool, owner_id: &str) -> Result<Vec<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM team_members WHERE owner_id = ? AND status = ? ORDER BY created_at DESC, id"
    ))
    .bind(owner_id)
    .bind(MemberStatus::Active)
    .fetch_all(pool)
    .await
}

pub async fn create_member(
    pool: &SqlitePool,
    owner_id: &str,
    name: &str,
    status: MemberStatus,
) -> Result<TeamMember, sqlx::Error> {
    let member = TeamMember {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        status,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO team_members (id, owner_id, name, status, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&member.id)
    .bind(&member.owner_id)
    .bind(&member.name)
    .bind(member.status)
    .bind(member.created_at)
    .execute(pool)
    .await?;

    Ok(member)
}

/// `None` when the member does not exist or belongs to someone else.
pub async fn set_status(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
    status: MemberStatus,
) -> Result<Option<TeamMember>, sqlx::Error> {
    let result = sqlx::query("UPDATE team_members SET status = ? WHERE id = ? AND owner_id = ?")
        .bind(status)
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query_as::<_, TeamMember>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM team_members WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_member(pool: &SqlitePool, owner_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all(pool: &SqlitePool, owner_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM team_members WHERE owner_id = ?")
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
