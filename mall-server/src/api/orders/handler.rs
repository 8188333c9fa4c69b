//! Order API Handlers
//!
//! 创建/流转走 repository 的事务函数；这里负责载荷校验、
//! 错误码映射和响应组装。

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{RepoError, order};
use crate::order_money;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message, time};
use shared::models::{Order, OrderCreate, OrderStats, OrderStatus, OrderWithUser};

/// 订单相关的 RepoError → AppError 映射
fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => {
            if msg.starts_with("Product") {
                AppError::with_message(ErrorCode::ProductNotFound, msg)
            } else {
                AppError::with_message(ErrorCode::OrderNotFound, msg)
            }
        }
        RepoError::Validation(msg) => {
            if msg.contains("out of stock") {
                AppError::with_message(ErrorCode::ProductOutOfStock, msg)
            } else {
                AppError::with_message(ErrorCode::OrderNotPending, msg)
            }
        }
        other => other.into(),
    }
}

/// 下单成功的扁平响应: `{"success": true, "order_no": "ORD<millis>"}`
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub success: bool,
    pub order_no: String,
}

/// GET /api/orders - 订单列表 (新订单在前，关联用户名)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<OrderWithUser>>>> {
    let orders = order::find_all(state.pool()).await.map_err(map_err)?;
    Ok(ok(orders))
}

/// POST /api/orders - 下单
///
/// 校验订单载荷 (非空、单行边界、总额与行合计一致)，生成订单号，
/// 在单个事务中写入订单头、订单行并按 `stock >= qty` 守卫扣减库存。
/// 任何一步失败整体回滚，调用方看不到半个订单。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderCreated>> {
    order_money::validate_order(&payload)?;

    let order_no = shared::util::generate_order_no();
    let created = order::create(state.pool(), &payload, &order_no)
        .await
        .map_err(map_err)?;

    tracing::info!(
        order_no = %created.order_no,
        user_id = created.user_id,
        total_amount = created.total_amount,
        items = payload.items.len(),
        "Order created"
    );

    Ok(Json(OrderCreated {
        success: true,
        order_no: created.order_no,
    }))
}

/// GET /api/orders/stats - 订单统计
///
/// `todayIncome` 按业务时区的今日窗口统计已完成订单。
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let tz = state.timezone();
    let today = time::today(tz);
    let stats = order::stats(
        state.pool(),
        time::day_start_millis(today, tz),
        time::day_end_millis(today, tz),
    )
    .await
    .map_err(map_err)?;
    Ok(ok(stats))
}

/// POST /api/orders/{id}/process - 处理订单 (pending → completed)
pub async fn process(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let updated = order::process(state.pool(), id).await.map_err(map_err)?;
    tracing::info!(order_no = %updated.order_no, "Order processed");
    Ok(ok_with_message(updated, "Order processed successfully"))
}

/// POST /api/orders/{id}/cancel - 取消订单 (pending → cancelled)
///
/// 同一事务内回补所有订单行的库存。
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let updated = order::cancel(state.pool(), id).await.map_err(map_err)?;
    tracing::info!(order_no = %updated.order_no, "Order cancelled, stock restored");
    Ok(ok_with_message(updated, "Order cancelled successfully"))
}

/// PATCH /status 请求体
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /api/orders/{id}/status - 通用状态变更入口
///
/// 不允许绕过状态机：目标状态解析为 [`OrderStatus`] 后分派到
/// process / cancel 的同一守卫路径，未知或非法目标一律 400。
pub async fn update_status(
    state: State<ServerState>,
    path: Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let target = OrderStatus::from_str(&payload.status)
        .map_err(|e| AppError::with_message(ErrorCode::OrderInvalidStatus, e))?;

    match target {
        OrderStatus::Completed => process(state, path).await,
        OrderStatus::Cancelled => cancel(state, path).await,
        OrderStatus::Pending => Err(AppError::with_message(
            ErrorCode::OrderInvalidStatus,
            "Orders cannot transition back to pending",
        )),
    }
}
