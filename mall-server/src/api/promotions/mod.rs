//! Promotion API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/promotions | GET | 无 |
//! | /api/promotions | POST | 需要 |
//! | /api/promotions/{id} | PUT / DELETE | 需要 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/promotions", promotion_routes())
}

fn promotion_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
