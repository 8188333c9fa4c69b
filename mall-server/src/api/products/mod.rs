//! Product API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/products | GET | 无 |
//! | /api/products | POST | 需要 |
//! | /api/products/{id} | PUT | 需要 |
//! | /api/products/{id}/status | PATCH | 需要 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}/status", patch(handler::update_status))
}
