//! Analytics Repository
//!
//! Read-only aggregates over orders, order items and products. Time
//! windows are half-open millis ranges computed by the caller in the
//! configured business timezone.

use super::RepoResult;
use serde::Serialize;
use sqlx::SqlitePool;

/// Raw aggregates backing the overview cards. "Today" and "yesterday"
/// are whatever windows the caller passed in.
#[derive(Debug, Clone, Default)]
pub struct OverviewTotals {
    pub today_sales: f64,
    pub today_orders: i64,
    pub today_completed: i64,
    pub yesterday_sales: f64,
    pub yesterday_orders: i64,
    pub yesterday_completed: i64,
}

pub async fn overview_totals(
    pool: &SqlitePool,
    yesterday_start: i64,
    today_start: i64,
    today_end: i64,
) -> RepoResult<OverviewTotals> {
    let (today_sales, today_orders, today_completed, yesterday_sales, yesterday_orders, yesterday_completed) =
        sqlx::query_as::<_, (f64, i64, i64, f64, i64, i64)>(
            "SELECT \
             COALESCE(SUM(CASE WHEN created_at >= ?2 AND status = 'completed' THEN total_amount END), 0.0), \
             COALESCE(SUM(CASE WHEN created_at >= ?2 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN created_at >= ?2 AND status = 'completed' THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN created_at < ?2 AND status = 'completed' THEN total_amount END), 0.0), \
             COALESCE(SUM(CASE WHEN created_at < ?2 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN created_at < ?2 AND status = 'completed' THEN 1 ELSE 0 END), 0) \
             FROM orders WHERE created_at >= ?1 AND created_at < ?3",
        )
        .bind(yesterday_start)
        .bind(today_start)
        .bind(today_end)
        .fetch_one(pool)
        .await?;

    Ok(OverviewTotals {
        today_sales,
        today_orders,
        today_completed,
        yesterday_sales,
        yesterday_orders,
        yesterday_completed,
    })
}

/// `(created_at, total_amount)` of completed orders since `since`,
/// oldest first; the caller buckets them per day or month.
pub async fn completed_sales_since(
    pool: &SqlitePool,
    since: i64,
) -> RepoResult<Vec<(i64, f64)>> {
    let rows = sqlx::query_as::<_, (i64, f64)>(
        "SELECT created_at, total_amount FROM orders WHERE status = 'completed' AND created_at >= ? ORDER BY created_at",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-category product count plus completed sales quantity and amount
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryStat {
    pub category: String,
    pub count: i64,
    pub total_sales: i64,
    pub total_amount: f64,
}

pub async fn category_distribution(pool: &SqlitePool) -> RepoResult<Vec<CategoryStat>> {
    let rows = sqlx::query_as::<_, CategoryStat>(
        "SELECT p.category, \
         COUNT(DISTINCT p.id) AS count, \
         COALESCE(SUM(CASE WHEN o.status = 'completed' THEN oi.quantity END), 0) AS total_sales, \
         COALESCE(SUM(CASE WHEN o.status = 'completed' THEN oi.quantity * oi.price END), 0.0) AS total_amount \
         FROM products p \
         LEFT JOIN order_items oi ON oi.product_id = p.id \
         LEFT JOIN orders o ON o.id = oi.order_id \
         GROUP BY p.category \
         ORDER BY total_sales DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-product completed sales within a period, ranked by quantity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HotProductRow {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub sales: i64,
    pub amount: f64,
}

pub async fn hot_products(
    pool: &SqlitePool,
    since: i64,
    limit: i64,
) -> RepoResult<Vec<HotProductRow>> {
    let rows = sqlx::query_as::<_, HotProductRow>(
        "SELECT p.id, p.name, p.image_url, \
         COALESCE(SUM(CASE WHEN o.status = 'completed' AND o.created_at >= ?1 THEN oi.quantity END), 0) AS sales, \
         COALESCE(SUM(CASE WHEN o.status = 'completed' AND o.created_at >= ?1 THEN oi.quantity * oi.price END), 0.0) AS amount \
         FROM products p \
         LEFT JOIN order_items oi ON oi.product_id = p.id \
         LEFT JOIN orders o ON o.id = oi.order_id \
         GROUP BY p.id, p.name, p.image_url \
         ORDER BY sales DESC \
         LIMIT ?2",
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Total completed item quantity in the period; denominator for the
/// hot-product share percentages.
pub async fn completed_quantity_since(pool: &SqlitePool, since: i64) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(oi.quantity), 0) FROM order_items oi JOIN orders o ON o.id = oi.order_id WHERE o.status = 'completed' AND o.created_at >= ?",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
