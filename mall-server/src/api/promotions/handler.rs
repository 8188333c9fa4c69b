//! Promotion API Handlers
//!
//! 活动时间在这里从字符串解析成 unix millis；`active`/`inactive`
//! 标签按当前时间现算，不落库。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, promotion};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message, time};
use shared::models::{Promotion, PromotionCreate, PromotionUpdate, PromotionView};

/// 促销相关的 RepoError → AppError 映射
fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::PromotionNotFound, msg),
        RepoError::Validation(msg) => {
            AppError::with_message(ErrorCode::PromotionInvalidPeriod, msg)
        }
        other => other.into(),
    }
}

/// GET /api/promotions - 活动列表 (状态按当前时间计算)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<PromotionView>>>> {
    let now = shared::util::now_millis();
    let promotions = promotion::find_all(state.pool()).await.map_err(map_err)?;
    let views = promotions
        .into_iter()
        .map(|p| PromotionView::at(p, now))
        .collect();
    Ok(ok(views))
}

/// POST /api/promotions - 创建活动
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PromotionCreate>,
) -> AppResult<Json<ApiResponse<Promotion>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.promotion_type, "type", MAX_SHORT_TEXT_LEN)?;

    let tz = state.timezone();
    let start_time = time::parse_datetime_millis(&payload.start_time, tz)?;
    let end_time = time::parse_datetime_millis(&payload.end_time, tz)?;

    let created = promotion::create(state.pool(), &payload, start_time, end_time)
        .await
        .map_err(map_err)?;

    tracing::info!(promotion_id = created.id, name = %created.name, "Promotion created");
    Ok(ok_with_message(created, "Promotion created successfully"))
}

/// PUT /api/promotions/{id} - 更新活动
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PromotionUpdate>,
) -> AppResult<Json<ApiResponse<Promotion>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let tz = state.timezone();
    let start_time = payload
        .start_time
        .as_deref()
        .map(|s| time::parse_datetime_millis(s, tz))
        .transpose()?;
    let end_time = payload
        .end_time
        .as_deref()
        .map(|s| time::parse_datetime_millis(s, tz))
        .transpose()?;

    let updated = promotion::update(state.pool(), id, &payload, start_time, end_time)
        .await
        .map_err(map_err)?;
    Ok(ok_with_message(updated, "Promotion updated successfully"))
}

/// DELETE /api/promotions/{id} - 删除活动
///
/// 活动与其商品关联在同一事务内一并删除。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    promotion::delete(state.pool(), id).await.map_err(map_err)?;
    tracing::info!(promotion_id = id, "Promotion deleted");
    Ok(Json(ApiResponse::ok_with_message(
        "Promotion deleted successfully",
    )))
}
