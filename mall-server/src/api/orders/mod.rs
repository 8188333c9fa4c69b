//! Order API 模块
//!
//! 订单生命周期接口。所有状态变更都经过 `OrderStatus` 状态机，
//! 包括通用的 `PATCH /status` 入口。
//!
//! | 路径 | 方法 | 认证 | 说明 |
//! |------|------|------|------|
//! | /api/orders | GET | 无 | 订单列表 (含用户名) |
//! | /api/orders | POST | 可配置 | 下单 (事务扣减库存) |
//! | /api/orders/stats | GET | 需要 | 订单统计 |
//! | /api/orders/{id}/status | PATCH | 需要 | 状态变更 (经状态机路由) |
//! | /api/orders/{id}/process | POST | 需要 | pending → completed |
//! | /api/orders/{id}/cancel | POST | 需要 | pending → cancelled + 回补库存 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats", get(handler::stats))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/process", post(handler::process))
        .route("/{id}/cancel", post(handler::cancel))
}
