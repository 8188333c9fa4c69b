//! Admin Repository

use super::{RepoError, RepoResult};
use shared::models::{Admin, AdminCreate, AdminResponse, AdminUpdate, ROLE_ADMIN};
use sqlx::SqlitePool;

const ADMIN_SELECT: &str = "SELECT id, username, password, name, role, phone, email, status, last_login, created_at, updated_at FROM admins";

const ADMIN_RESPONSE_SELECT: &str =
    "SELECT id, username, name, role, phone, email, status, last_login, created_at FROM admins";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<AdminResponse>> {
    let sql = format!("{} ORDER BY created_at DESC", ADMIN_RESPONSE_SELECT);
    let rows = sqlx::query_as::<_, AdminResponse>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AdminResponse>> {
    let sql = format!("{} WHERE id = ?", ADMIN_RESPONSE_SELECT);
    let row = sqlx::query_as::<_, AdminResponse>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Full row including the password hash, for credential checks only
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Admin>> {
    let sql = format!("{} WHERE username = ?", ADMIN_SELECT);
    let row = sqlx::query_as::<_, Admin>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Search with dynamic filters; every filter is optional and they combine
/// with AND. `created_from`/`created_to` are a half-open millis window.
pub async fn search(
    pool: &SqlitePool,
    username: Option<&str>,
    role: Option<&str>,
    status: Option<i64>,
    created_from: Option<i64>,
    created_to: Option<i64>,
) -> RepoResult<Vec<AdminResponse>> {
    let mut conditions: Vec<&str> = Vec::new();
    if username.is_some() {
        conditions.push("username LIKE ?");
    }
    if role.is_some() {
        conditions.push("role = ?");
    }
    if status.is_some() {
        conditions.push("status = ?");
    }
    if created_from.is_some() {
        conditions.push("created_at >= ?");
    }
    if created_to.is_some() {
        conditions.push("created_at < ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!(
        "{}{} ORDER BY created_at DESC",
        ADMIN_RESPONSE_SELECT, where_clause
    );

    let mut query = sqlx::query_as::<_, AdminResponse>(&sql);
    if let Some(u) = username {
        query = query.bind(format!("%{u}%"));
    }
    if let Some(r) = role {
        query = query.bind(r.to_string());
    }
    if let Some(s) = status {
        query = query.bind(s);
    }
    if let Some(from) = created_from {
        query = query.bind(from);
    }
    if let Some(to) = created_to {
        query = query.bind(to);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// 手机号是否已被 `exclude_id` 之外的管理员占用
pub async fn phone_in_use(
    pool: &SqlitePool,
    phone: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM admins WHERE phone = ?1 AND id != COALESCE(?2, -1)",
    )
    .bind(phone)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// 邮箱是否已被 `exclude_id` 之外的管理员占用
pub async fn email_in_use(
    pool: &SqlitePool,
    email: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM admins WHERE email = ?1 AND id != COALESCE(?2, -1)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// `password_hash` is the already-hashed credential. A missing role
/// defaults to [`ROLE_ADMIN`].
pub async fn create(
    pool: &SqlitePool,
    data: &AdminCreate,
    password_hash: &str,
) -> RepoResult<AdminResponse> {
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate("Username already exists".into()));
    }
    if let Some(email) = data.email.as_deref()
        && email_in_use(pool, email, None).await?
    {
        return Err(RepoError::Duplicate("Email already in use".into()));
    }
    if let Some(phone) = data.phone.as_deref()
        && phone_in_use(pool, phone, None).await?
    {
        return Err(RepoError::Duplicate("Phone number already in use".into()));
    }

    let role = data.role.as_deref().unwrap_or(ROLE_ADMIN);
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO admins (username, password, name, role, phone, email, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(&data.username)
    .bind(password_hash)
    .bind(&data.name)
    .bind(role)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create admin".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: AdminUpdate) -> RepoResult<AdminResponse> {
    if let Some(email) = data.email.as_deref()
        && email_in_use(pool, email, Some(id)).await?
    {
        return Err(RepoError::Duplicate("Email already used by another admin".into()));
    }
    if let Some(phone) = data.phone.as_deref()
        && phone_in_use(pool, phone, Some(id)).await?
    {
        return Err(RepoError::Duplicate(
            "Phone number already used by another admin".into(),
        ));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE admins SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), email = COALESCE(?3, email), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Admin {id} not found")))
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE admins SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin {id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM admins WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin {id} not found")));
    }
    Ok(())
}

/// Stamp `last_login` after a successful credential check
pub async fn touch_last_login(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE admins SET last_login = ?1, updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
