//! Order lifecycle integration tests over a throwaway SQLite database.
//!
//! Exercises the transactional create/process/cancel paths directly at
//! the repository layer: atomicity of failed creations, the pending-only
//! state machine, and stock conservation on cancel.

use mall_server::db::DbService;
use mall_server::db::repository::{RepoError, order, product, user};
use shared::models::{OrderCreate, OrderItemInput, Product, ProductCreate, UserCreate};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("mall.db");
    let db = DbService::new(path.to_str().expect("temp path is valid UTF-8"))
        .await
        .expect("Failed to open test database");
    (db, dir)
}

async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    let data = UserCreate {
        username: username.to_string(),
        password: "ignored".to_string(),
        phone: None,
        email: None,
    };
    user::create(pool, &data, "$argon2id$fake-hash")
        .await
        .expect("Failed to seed user")
        .id
}

async fn seed_product(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> Product {
    let data = ProductCreate {
        name: name.to_string(),
        category: "test".to_string(),
        price,
        stock: Some(stock),
        description: None,
        image_url: None,
    };
    product::create(pool, data)
        .await
        .expect("Failed to seed product")
}

async fn stock_of(pool: &SqlitePool, id: i64) -> i64 {
    product::find_by_id(pool, id)
        .await
        .expect("Failed to read product")
        .expect("Product should exist")
        .stock
}

fn line(product_id: i64, quantity: i64, price: f64) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity,
        price,
    }
}

#[tokio::test]
async fn test_create_order_persists_header_items_and_stock() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 20.0, 10).await;
    let b = seed_product(pool, "Gadget", 20.0, 10).await;

    let data = OrderCreate {
        user_id,
        total_amount: 100.0,
        items: vec![line(a.id, 2, 20.0), line(b.id, 3, 20.0)],
    };
    let created = order::create(pool, &data, "ORD1000000000001")
        .await
        .expect("Order creation should succeed");

    assert_eq!(created.status, "pending");
    assert_eq!(created.total_amount, 100.0);
    assert_eq!(created.order_no, "ORD1000000000001");

    let items = order::find_items(pool, created.id)
        .await
        .expect("Failed to read items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[1].quantity, 3);
    // Unit prices captured at order time
    assert_eq!(items[0].price, 20.0);

    assert_eq!(stock_of(pool, a.id).await, 8);
    assert_eq!(stock_of(pool, b.id).await, 7);
}

#[tokio::test]
async fn test_failed_creation_leaves_nothing_behind() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 5).await;

    // Second line references a product that does not exist
    let data = OrderCreate {
        user_id,
        total_amount: 30.0,
        items: vec![line(a.id, 2, 10.0), line(9999, 1, 10.0)],
    };
    let err = order::create(pool, &data, "ORD1000000000002")
        .await
        .expect_err("Creation with a missing product must fail");
    assert!(matches!(err, RepoError::NotFound(_)));

    // No order row, no item rows, no stock decrement visible afterward
    let orders = order::find_all(pool).await.expect("Failed to list orders");
    assert!(orders.is_empty());
    assert_eq!(stock_of(pool, a.id).await, 5);
}

#[tokio::test]
async fn test_oversized_order_is_rejected_whole() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 5).await;
    let b = seed_product(pool, "Gadget", 10.0, 1).await;

    // First line fits, second exceeds the available stock
    let data = OrderCreate {
        user_id,
        total_amount: 50.0,
        items: vec![line(a.id, 3, 10.0), line(b.id, 2, 10.0)],
    };
    let err = order::create(pool, &data, "ORD1000000000003")
        .await
        .expect_err("Out-of-stock order must fail");
    assert!(matches!(err, RepoError::Validation(_)));

    let orders = order::find_all(pool).await.expect("Failed to list orders");
    assert!(orders.is_empty());
    assert_eq!(stock_of(pool, a.id).await, 5);
    assert_eq!(stock_of(pool, b.id).await, 1);
}

#[tokio::test]
async fn test_cancel_restores_stock_per_item() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 10).await;
    let b = seed_product(pool, "Gadget", 10.0, 10).await;

    let data = OrderCreate {
        user_id,
        total_amount: 50.0,
        items: vec![line(a.id, 3, 10.0), line(b.id, 2, 10.0)],
    };
    let created = order::create(pool, &data, "ORD1000000000004")
        .await
        .expect("Order creation should succeed");
    assert_eq!(stock_of(pool, a.id).await, 7);
    assert_eq!(stock_of(pool, b.id).await, 8);

    let cancelled = order::cancel(pool, created.id)
        .await
        .expect("Cancelling a pending order should succeed");
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(stock_of(pool, a.id).await, 10);
    assert_eq!(stock_of(pool, b.id).await, 10);
}

#[tokio::test]
async fn test_cancel_sums_repeated_product_lines() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 10).await;

    // The same product appears on two lines
    let data = OrderCreate {
        user_id,
        total_amount: 30.0,
        items: vec![line(a.id, 1, 10.0), line(a.id, 2, 10.0)],
    };
    let created = order::create(pool, &data, "ORD1000000000005")
        .await
        .expect("Order creation should succeed");
    assert_eq!(stock_of(pool, a.id).await, 7);

    order::cancel(pool, created.id)
        .await
        .expect("Cancel should succeed");
    assert_eq!(stock_of(pool, a.id).await, 10);
}

#[tokio::test]
async fn test_process_succeeds_once_then_rejects() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 10).await;

    let data = OrderCreate {
        user_id,
        total_amount: 10.0,
        items: vec![line(a.id, 1, 10.0)],
    };
    let created = order::create(pool, &data, "ORD1000000000006")
        .await
        .expect("Order creation should succeed");

    let processed = order::process(pool, created.id)
        .await
        .expect("Processing a pending order should succeed");
    assert_eq!(processed.status, "completed");

    // Second attempt hits the guard and leaves the status untouched
    let err = order::process(pool, created.id)
        .await
        .expect_err("Processing twice must fail");
    assert!(matches!(err, RepoError::Validation(_)));

    let current = order::find_by_id(pool, created.id)
        .await
        .expect("Failed to read order")
        .expect("Order should exist");
    assert_eq!(current.status, "completed");
}

#[tokio::test]
async fn test_cancel_completed_order_is_rejected_without_stock_change() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 10).await;

    let data = OrderCreate {
        user_id,
        total_amount: 20.0,
        items: vec![line(a.id, 2, 10.0)],
    };
    let created = order::create(pool, &data, "ORD1000000000007")
        .await
        .expect("Order creation should succeed");
    order::process(pool, created.id)
        .await
        .expect("Processing should succeed");

    let err = order::cancel(pool, created.id)
        .await
        .expect_err("Cancelling a completed order must fail");
    assert!(matches!(err, RepoError::Validation(_)));

    let current = order::find_by_id(pool, created.id)
        .await
        .expect("Failed to read order")
        .expect("Order should exist");
    assert_eq!(current.status, "completed");
    // No stock was restored by the rejected cancel
    assert_eq!(stock_of(pool, a.id).await, 8);
}

#[tokio::test]
async fn test_transitions_on_missing_order_report_not_found() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let err = order::process(pool, 42).await.expect_err("No such order");
    assert!(matches!(err, RepoError::NotFound(_)));

    let err = order::cancel(pool, 42).await.expect_err("No such order");
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_order_no_is_rejected() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 10).await;

    let data = OrderCreate {
        user_id,
        total_amount: 10.0,
        items: vec![line(a.id, 1, 10.0)],
    };
    order::create(pool, &data, "ORD1000000000008")
        .await
        .expect("First creation should succeed");

    let err = order::create(pool, &data, "ORD1000000000008")
        .await
        .expect_err("Reusing an order number must fail");
    assert!(matches!(err, RepoError::Duplicate(_)));

    // The failed attempt must not have decremented stock again
    assert_eq!(stock_of(pool, a.id).await, 9);
}

#[tokio::test]
async fn test_stats_counts_by_status() {
    let (db, _dir) = setup().await;
    let pool = &db.pool;

    let user_id = seed_user(pool, "alice").await;
    let a = seed_product(pool, "Widget", 10.0, 100).await;

    for (n, advance) in [("ORD2000000000001", false), ("ORD2000000000002", true)] {
        let data = OrderCreate {
            user_id,
            total_amount: 10.0,
            items: vec![line(a.id, 1, 10.0)],
        };
        let created = order::create(pool, &data, n)
            .await
            .expect("Order creation should succeed");
        if advance {
            order::process(pool, created.id)
                .await
                .expect("Processing should succeed");
        }
    }

    let stats = order::stats(pool, 0, i64::MAX)
        .await
        .expect("Stats query should succeed");
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.pending_orders, 1);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.today_income, 10.0);
}
