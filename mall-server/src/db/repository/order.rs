//! Order Repository
//!
//! The order lifecycle core: creation with guarded stock decrements, the
//! pending → completed / cancelled transitions, and stock restore on
//! cancellation. Every mutating path runs inside a single transaction;
//! an early return drops the transaction and rolls everything back.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderCreate, OrderItem, OrderStats, OrderWithUser};
use sqlx::SqlitePool;

const ORDER_SELECT: &str =
    "SELECT id, order_no, user_id, total_amount, status, created_at, updated_at FROM orders";

const ORDER_WITH_USER_SELECT: &str = "SELECT o.id, o.order_no, o.user_id, u.username, o.total_amount, o.status, o.created_at, o.updated_at FROM orders o LEFT JOIN users u ON o.user_id = u.id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<OrderWithUser>> {
    let sql = format!("{} ORDER BY o.created_at DESC", ORDER_WITH_USER_SELECT);
    let rows = sqlx::query_as::<_, OrderWithUser>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn status_of<'e, E>(executor: E, id: i64) -> RepoResult<Option<String>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(status)
}

/// Create an order in `pending` with all its items, decrementing each
/// product's stock through a guarded conditional update.
///
/// Either the header, every item row and every stock decrement persist,
/// or none do. Errors:
/// - [`RepoError::NotFound`] — a referenced product does not exist
/// - [`RepoError::Validation`] — a product has insufficient stock
/// - [`RepoError::Duplicate`] — the generated `order_no` collided
pub async fn create(pool: &SqlitePool, data: &OrderCreate, order_no: &str) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (order_no, user_id, total_amount, status, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', ?4, ?4) RETURNING id",
    )
    .bind(order_no)
    .bind(data.user_id)
    .bind(data.total_amount)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in &data.items {
        // Existence first, so a missing product is not reported as out of stock
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = ?")
            .bind(item.product_id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!(
                "Product {} not found",
                item.product_id
            )));
        }

        // Guarded decrement: zero rows affected means insufficient stock
        let rows = sqlx::query(
            "UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND stock >= ?1",
        )
        .bind(item.quantity)
        .bind(now)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::Validation(format!(
                "Product {} is out of stock",
                item.product_id
            )));
        }

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Transition pending → completed
pub async fn process(pool: &SqlitePool, id: i64) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = 'completed', updated_at = ?1 WHERE id = ?2 AND status = 'pending'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match status_of(pool, id).await? {
            Some(_) => Err(RepoError::Validation(
                "Only pending orders can be processed".into(),
            )),
            None => Err(RepoError::NotFound(format!("Order {id} not found"))),
        };
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Transition pending → cancelled and restore stock for every item
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE orders SET status = 'cancelled', updated_at = ?1 WHERE id = ?2 AND status = 'pending'",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return match status_of(&mut *tx, id).await? {
            Some(_) => Err(RepoError::Validation(
                "Only pending orders can be cancelled".into(),
            )),
            None => Err(RepoError::NotFound(format!("Order {id} not found"))),
        };
    }

    // Restore stock, aggregated per product so repeated lines for the
    // same product sum instead of overwriting each other
    sqlx::query(
        "UPDATE products SET stock = stock + (SELECT COALESCE(SUM(oi.quantity), 0) FROM order_items oi WHERE oi.order_id = ?1 AND oi.product_id = products.id), updated_at = ?2 WHERE id IN (SELECT product_id FROM order_items WHERE order_id = ?1)",
    )
    .bind(id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Order counters plus today's completed income over the given
/// half-open business-day window.
pub async fn stats(pool: &SqlitePool, day_start: i64, day_end: i64) -> RepoResult<OrderStats> {
    let (total_orders, pending_orders, completed_orders, today_income) =
        sqlx::query_as::<_, (i64, i64, i64, f64)>(
            "SELECT COUNT(*), \
             COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN status = 'completed' AND created_at >= ?1 AND created_at < ?2 THEN total_amount END), 0.0) \
             FROM orders",
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(pool)
        .await?;

    Ok(OrderStats {
        total_orders,
        pending_orders,
        completed_orders,
        today_income,
    })
}
