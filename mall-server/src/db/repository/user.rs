//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserResponse, UserUpdate};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, password, phone, email, balance, points, status, created_at, updated_at FROM users";

const USER_RESPONSE_SELECT: &str =
    "SELECT id, username, phone, email, balance, points, status, created_at FROM users";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<UserResponse>> {
    let sql = format!("{} ORDER BY created_at DESC", USER_RESPONSE_SELECT);
    let rows = sqlx::query_as::<_, UserResponse>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserResponse>> {
    let sql = format!("{} WHERE id = ?", USER_RESPONSE_SELECT);
    let row = sqlx::query_as::<_, UserResponse>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Full row including the password hash, for credential checks only
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{} WHERE username = ?", USER_SELECT);
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// 手机号是否已被 `exclude_id` 之外的用户占用
pub async fn phone_in_use(
    pool: &SqlitePool,
    phone: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE phone = ?1 AND id != COALESCE(?2, -1)",
    )
    .bind(phone)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// 邮箱是否已被 `exclude_id` 之外的用户占用
pub async fn email_in_use(
    pool: &SqlitePool,
    email: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE email = ?1 AND id != COALESCE(?2, -1)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// `password_hash` is the already-hashed credential; plain passwords
/// never reach this layer.
pub async fn create(
    pool: &SqlitePool,
    data: &UserCreate,
    password_hash: &str,
) -> RepoResult<UserResponse> {
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate("Username already exists".into()));
    }
    if let Some(phone) = data.phone.as_deref()
        && phone_in_use(pool, phone, None).await?
    {
        return Err(RepoError::Duplicate("Phone number already registered".into()));
    }
    if let Some(email) = data.email.as_deref()
        && email_in_use(pool, email, None).await?
    {
        return Err(RepoError::Duplicate("Email already registered".into()));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password, phone, email, balance, points, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, 0, 1, ?5, ?5) RETURNING id",
    )
    .bind(&data.username)
    .bind(password_hash)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<UserResponse> {
    if let Some(email) = data.email.as_deref()
        && email_in_use(pool, email, Some(id)).await?
    {
        return Err(RepoError::Duplicate("Email already used by another user".into()));
    }
    if let Some(phone) = data.phone.as_deref()
        && phone_in_use(pool, phone, Some(id)).await?
    {
        return Err(RepoError::Duplicate(
            "Phone number already used by another user".into(),
        ));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET email = COALESCE(?1, email), phone = COALESCE(?2, phone), updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.email)
    .bind(&data.phone)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE users SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}
