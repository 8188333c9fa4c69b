//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, admin, analytics};
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message, password, time};
use shared::client::AdminLoginResponse;
use shared::client::LoginRequest;
use shared::models::{
    AdminCreate, AdminResponse, AdminUpdate, ROLE_SUPER_ADMIN, status_flag,
};

/// 登录失败时的固定延迟，与会员登录一致
const LOGIN_FAILURE_DELAY_MS: u64 = 100;

/// 管理员相关的 RepoError → AppError 映射
fn map_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::AdminNotFound, msg),
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

/// POST /api/admin/login - 管理员登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AdminLoginResponse>>> {
    let found = admin::find_by_username(state.pool(), &payload.username).await?;

    let Some(account) = found else {
        return Err(login_failure(&payload.username).await);
    };
    if !password::verify_password(&payload.password, &account.password) {
        return Err(login_failure(&payload.username).await);
    }
    if account.status != 1 {
        security_log!(
            "WARN",
            "admin_login_disabled",
            username = payload.username
        );
        return Err(AppError::account_disabled());
    }

    admin::touch_last_login(state.pool(), account.id).await?;

    let jwt = state
        .get_jwt_service()
        .generate_token(account.id, &account.username, &account.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(admin_id = account.id, username = %account.username, "Admin logged in");
    Ok(ok_with_message(
        AdminLoginResponse {
            admin: AdminResponse::from(account),
            token: format!("Bearer {jwt}"),
        },
        "Login successful",
    ))
}

async fn login_failure(username: &str) -> AppError {
    security_log!("WARN", "admin_login_failed", username = username.to_string());
    tokio::time::sleep(Duration::from_millis(LOGIN_FAILURE_DELAY_MS)).await;
    AppError::invalid_credentials()
}

/// 注册请求体 (引导用，固定 admin 角色)
#[derive(Debug, Deserialize)]
pub struct AdminRegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// POST /api/admin/register - 管理员注册 (引导接口)
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<AdminRegisterRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    let data = AdminCreate {
        username: payload.username,
        password: payload.password,
        name: payload.name,
        role: None,
        phone: None,
        email: None,
    };
    let created = admin::create(state.pool(), &data, &password_hash)
        .await
        .map_err(map_err)?;

    tracing::info!(admin_id = created.id, username = %created.username, "Admin registered");
    Ok(Json(ApiResponse::ok_with_message("Registration successful")))
}

/// 个人信息响应: 管理员资料 + 今日经营子统计 + 角色权限
#[derive(Debug, Serialize)]
pub struct AdminProfile {
    #[serde(flatten)]
    pub admin: AdminResponse,
    pub today_orders: i64,
    pub today_sales: f64,
    pub permissions: serde_json::Value,
}

/// GET /api/admin/profile - 当前管理员信息
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<AdminProfile>>> {
    let account = admin::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;

    let tz = state.timezone();
    let today = time::today(tz);
    let today_start = time::day_start_millis(today, tz);
    let today_end = time::day_end_millis(today, tz);
    // 昨日窗口置空 (start == today_start)，只取今日聚合
    let totals =
        analytics::overview_totals(state.pool(), today_start, today_start, today_end).await?;

    let is_super = account.role == ROLE_SUPER_ADMIN;
    let permissions = json!({
        "manage_products": true,
        "manage_orders": true,
        "manage_users": true,
        "manage_promotions": true,
        "manage_admins": is_super,
    });

    Ok(ok(AdminProfile {
        admin: account,
        today_orders: totals.today_orders,
        today_sales: totals.today_sales,
        permissions,
    }))
}

/// GET /api/admins - 管理员列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<AdminResponse>>>> {
    let admins = admin::find_all(state.pool()).await.map_err(map_err)?;
    Ok(ok(admins))
}

/// 搜索过滤参数，全部可选，AND 组合
#[derive(Debug, Deserialize)]
pub struct AdminSearchQuery {
    pub username: Option<String>,
    pub role: Option<String>,
    /// `active` / `inactive`
    pub status: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// 搜索响应: `{success, data, total}`
#[derive(Debug, Serialize)]
pub struct AdminSearchResponse {
    pub success: bool,
    pub data: Vec<AdminResponse>,
    pub total: usize,
}

/// GET /api/admins/search - 条件搜索
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<AdminSearchQuery>,
) -> AppResult<Json<AdminSearchResponse>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            status_flag(s).ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid status '{s}', expected 'active' or 'inactive'"
                ))
            })
        })
        .transpose()?;

    let tz = state.timezone();
    let created_from = query
        .start_date
        .as_deref()
        .map(|d| time::parse_date(d).map(|date| time::day_start_millis(date, tz)))
        .transpose()?;
    let created_to = query
        .end_date
        .as_deref()
        .map(|d| time::parse_date(d).map(|date| time::day_end_millis(date, tz)))
        .transpose()?;

    let admins = admin::search(
        state.pool(),
        query.username.as_deref(),
        query.role.as_deref(),
        status,
        created_from,
        created_to,
    )
    .await
    .map_err(map_err)?;

    Ok(Json(AdminSearchResponse {
        success: true,
        total: admins.len(),
        data: admins,
    }))
}

/// POST /api/admins - 创建管理员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AdminCreate>,
) -> AppResult<Json<ApiResponse<AdminResponse>>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    let created = admin::create(state.pool(), &payload, &password_hash)
        .await
        .map_err(map_err)?;

    tracing::info!(admin_id = created.id, username = %created.username, "Admin created");
    Ok(ok_with_message(created, "Admin created successfully"))
}

/// PUT /api/admins/{id} - 更新管理员资料
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdate>,
) -> AppResult<Json<ApiResponse<AdminResponse>>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let updated = admin::update(state.pool(), id, payload)
        .await
        .map_err(map_err)?;
    Ok(ok_with_message(updated, "Admin updated successfully"))
}

/// super_admin 账号不可被普通管理接口修改或删除
async fn reject_super_admin_target(
    state: &ServerState,
    id: i64,
    code: ErrorCode,
) -> AppResult<()> {
    let target = admin::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;
    if target.role == ROLE_SUPER_ADMIN {
        return Err(AppError::new(code));
    }
    Ok(())
}

/// DELETE /api/admins/{id} - 删除管理员
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    reject_super_admin_target(&state, id, ErrorCode::CannotDeleteSuperAdmin).await?;

    admin::delete(state.pool(), id).await.map_err(map_err)?;
    security_log!(
        "INFO",
        "admin_deleted",
        admin_id = id,
        deleted_by = current.username
    );
    Ok(Json(ApiResponse::ok_with_message(
        "Admin deleted successfully",
    )))
}

/// PATCH /status 请求体
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /api/admins/{id}/status - 启用/禁用管理员
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

    reject_super_admin_target(&state, id, ErrorCode::CannotModifySuperAdmin).await?;

    admin::update_status(state.pool(), id, flag)
        .await
        .map_err(map_err)?;

    let message = if flag == 1 {
        "Admin enabled"
    } else {
        "Admin disabled"
    };
    Ok(Json(ApiResponse::ok_with_message(message)))
}
