//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message, password};
use shared::models::{UserCreate, UserResponse, UserUpdate, status_flag};

/// 会员相关的 RepoError → AppError 映射
///
/// 重复注册按字段区分错误码；消息由 repository 层给出。
pub(crate) fn map_user_repo_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::UserNotFound, msg),
        RepoError::Duplicate(msg) => {
            let code = if msg.starts_with("Phone") {
                ErrorCode::PhoneTaken
            } else if msg.starts_with("Email") {
                ErrorCode::EmailTaken
            } else {
                ErrorCode::UsernameTaken
            };
            AppError::with_message(code, msg)
        }
        other => other.into(),
    }
}

/// GET /api/users - 会员列表 (不含密码，新用户在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = user::find_all(state.pool())
        .await
        .map_err(map_user_repo_err)?;
    Ok(ok(users))
}

/// POST /api/users - 管理侧创建会员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    let created = user::create(state.pool(), &payload, &password_hash)
        .await
        .map_err(map_user_repo_err)?;

    tracing::info!(user_id = created.id, username = %created.username, "User created");
    Ok(ok_with_message(created, "User created successfully"))
}

/// PUT /api/users/{id} - 更新联系方式
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let updated = user::update(state.pool(), id, payload)
        .await
        .map_err(map_user_repo_err)?;
    Ok(ok_with_message(updated, "User updated successfully"))
}

/// PATCH /status 请求体
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /api/users/{id}/status - 启用/禁用会员
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

    user::update_status(state.pool(), id, flag)
        .await
        .map_err(map_user_repo_err)?;

    let message = if flag == 1 {
        "User enabled"
    } else {
        "User disabled"
    };
    Ok(Json(ApiResponse::ok_with_message(message)))
}
