//! Product API Handlers
//!
//! 库存扣减/回补不在这里：它们只发生在订单事务内。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductView, status_flag};

/// 商品相关的 RepoError → AppError 映射
fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::ProductInvalidPrice, msg),
        other => other.into(),
    }
}

/// GET /api/products - 商品列表 (含累计销量，新商品在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<ProductView>>>> {
    let products = product::find_all(state.pool()).await.map_err(map_err)?;
    let views = products.into_iter().map(ProductView::from).collect();
    Ok(ok(views))
}

/// POST /api/products - 创建商品 (默认上架)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(stock) = payload.stock
        && stock < 0
    {
        return Err(AppError::validation("stock must not be negative"));
    }

    let created = product::create(state.pool(), payload)
        .await
        .map_err(map_err)?;

    tracing::info!(product_id = created.id, name = %created.name, "Product created");
    Ok(ok_with_message(created, "Product created successfully"))
}

/// PUT /api/products/{id} - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(category) = payload.category.as_deref() {
        validate_required_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(stock) = payload.stock
        && stock < 0
    {
        return Err(AppError::validation("stock must not be negative"));
    }

    let updated = product::update(state.pool(), id, payload)
        .await
        .map_err(map_err)?;
    Ok(ok_with_message(updated, "Product updated successfully"))
}

/// PATCH /status 请求体
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /api/products/{id}/status - 上架/下架
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<ApiResponse<()>>> {
    let flag = status_flag(&payload.status).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid status '{}', expected 'active' or 'inactive'",
            payload.status
        ))
    })?;

    product::update_status(state.pool(), id, flag)
        .await
        .map_err(map_err)?;

    let message = if flag == 1 {
        "Product activated"
    } else {
        "Product deactivated"
    };
    Ok(Json(ApiResponse::ok_with_message(message)))
}
