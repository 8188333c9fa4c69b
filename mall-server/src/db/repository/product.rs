//! Product Repository
//!
//! Stock mutations live in the order repository so they always run
//! inside the order transaction.

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductWithSales};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, name, category, price, stock, description, image_url, status, created_at, updated_at FROM products";

const PRODUCT_WITH_SALES_SELECT: &str = "SELECT p.id, p.name, p.category, p.price, p.stock, p.description, p.image_url, p.status, COALESCE(SUM(oi.quantity), 0) AS sales_count, p.created_at, p.updated_at FROM products p LEFT JOIN order_items oi ON oi.product_id = p.id";

fn validate_price(price: f64) -> RepoResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Product price must be positive: {price}"
        )));
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductWithSales>> {
    let sql = format!(
        "{} GROUP BY p.id ORDER BY p.created_at DESC",
        PRODUCT_WITH_SALES_SELECT
    );
    let rows = sqlx::query_as::<_, ProductWithSales>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE id = ?", PRODUCT_SELECT);
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    validate_price(data.price)?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, category, price, stock, description, image_url, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(data.price)
    .bind(data.stock.unwrap_or(0))
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price {
        validate_price(price)?;
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), category = COALESCE(?2, category), price = COALESCE(?3, price), stock = COALESCE(?4, stock), description = COALESCE(?5, description), image_url = COALESCE(?6, image_url), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(data.price)
    .bind(data.stock)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE products SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
