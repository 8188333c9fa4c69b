//! Analytics API 模块
//!
//! 只读聚合查询，全部需要认证。响应字段为 camelCase，
//! 时间窗口按业务时区计算。
//!
//! | 路径 | 说明 |
//! |------|------|
//! | /api/analytics/overview | 今日概览卡片 (含环比) |
//! | /api/analytics/sales-trend | 销售趋势 (week/month/year) |
//! | /api/analytics/category-distribution | 分类分布 |
//! | /api/analytics/hot-products | 热销 TOP5 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/analytics", analytics_routes())
}

fn analytics_routes() -> Router<ServerState> {
    Router::new()
        .route("/overview", get(handler::overview))
        .route("/sales-trend", get(handler::sales_trend))
        .route("/category-distribution", get(handler::category_distribution))
        .route("/hot-products", get(handler::hot_products))
}
