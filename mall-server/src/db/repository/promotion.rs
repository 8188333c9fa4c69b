//! Promotion Repository
//!
//! Activity windows are stored as unix-millis bounds; callers parse the
//! wire date strings before reaching this layer.

use super::{RepoError, RepoResult};
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};
use sqlx::SqlitePool;

const PROMOTION_SELECT: &str = "SELECT id, name, promotion_type, start_time, end_time, discount_value, min_amount, created_at, updated_at FROM promotions";

fn validate_period(start_time: i64, end_time: i64) -> RepoResult<()> {
    if start_time >= end_time {
        return Err(RepoError::Validation(
            "start_time must be before end_time".into(),
        ));
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Promotion>> {
    let sql = format!("{} ORDER BY created_at DESC", PROMOTION_SELECT);
    let rows = sqlx::query_as::<_, Promotion>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Promotion>> {
    let sql = format!("{} WHERE id = ?", PROMOTION_SELECT);
    let row = sqlx::query_as::<_, Promotion>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: &PromotionCreate,
    start_time: i64,
    end_time: i64,
) -> RepoResult<Promotion> {
    validate_period(start_time, end_time)?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO promotions (name, promotion_type, start_time, end_time, discount_value, min_amount, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.promotion_type)
    .bind(start_time)
    .bind(end_time)
    .bind(data.discount_value)
    .bind(data.min_amount)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create promotion".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &PromotionUpdate,
    start_time: Option<i64>,
    end_time: Option<i64>,
) -> RepoResult<Promotion> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Promotion {id} not found")))?;

    // Validate the merged window, not just the changed bound
    let new_start = start_time.unwrap_or(current.start_time);
    let new_end = end_time.unwrap_or(current.end_time);
    validate_period(new_start, new_end)?;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE promotions SET name = COALESCE(?1, name), promotion_type = COALESCE(?2, promotion_type), start_time = ?3, end_time = ?4, discount_value = COALESCE(?5, discount_value), min_amount = COALESCE(?6, min_amount), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(&data.promotion_type)
    .bind(new_start)
    .bind(new_end)
    .bind(data.discount_value)
    .bind(data.min_amount)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Promotion {id} not found")))
}

/// Delete a promotion and its product links in one transaction
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM promotion_products WHERE promotion_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("DELETE FROM promotions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    // Dropping the transaction without commit rolls the link deletes back
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Promotion {id} not found")));
    }

    tx.commit().await?;
    Ok(())
}
