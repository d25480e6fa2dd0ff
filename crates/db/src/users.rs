use chrono::{DateTime, Utc};
use common::UserAccount;
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Db, DbError};

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

pub async fn find_user_by_email(db: &Db, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

pub async fn insert_user(
    db: &Db,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"INSERT INTO users (email, password_hash, role)
           VALUES ($1, $2, $3)
           RETURNING id, email, password_hash, role, created_at"#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

/// Account listing for the admin dashboard, optionally narrowed to one role.
pub async fn list_accounts(db: &Db, role: Option<&str>) -> Result<Vec<UserAccount>, DbError> {
    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT id, email, role, created_at FROM users",
    );
    if let Some(role) = role {
        qb.push(" WHERE role = ");
        qb.push_bind(role);
    }
    qb.push(" ORDER BY created_at DESC");
    let rows: Vec<UserAccount> = qb.build_query_as().fetch_all(&db.0).await?;
    Ok(rows)
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RoleCount {
    pub role: String,
    pub total: i64,
}

pub async fn count_users_by_role(db: &Db) -> Result<Vec<RoleCount>, DbError> {
    let rows = sqlx::query_as::<_, RoleCount>(
        "SELECT role, COUNT(*)::BIGINT AS total FROM users GROUP BY role ORDER BY role",
    )
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}
