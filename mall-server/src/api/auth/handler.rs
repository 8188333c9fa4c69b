//! Auth API Handlers

use axum::{Json, extract::State};
use std::time::Duration;

use crate::api::users::map_user_repo_err;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message, password};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{UserCreate, UserResponse};

/// 登录失败时的固定延迟，拉平用户存在与否的响应时间差
const LOGIN_FAILURE_DELAY_MS: u64 = 100;

/// 会员角色 (写入 JWT)
const ROLE_USER: &str = "user";

/// POST /api/register - 会员注册
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let data = UserCreate {
        username: payload.username,
        password: payload.password,
        phone: payload.phone,
        email: payload.email,
    };
    let created = user::create(state.pool(), &data, &password_hash)
        .await
        .map_err(map_user_repo_err)?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");
    Ok(Json(ApiResponse::ok_with_message("Registration successful")))
}

/// POST /api/login - 会员登录
///
/// 用户不存在和密码错误返回同一个 `InvalidCredentials`，并带固定
/// 小延迟；禁用账号返回 403。
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let found = user::find_by_username(state.pool(), &payload.username).await?;

    let Some(account) = found else {
        return Err(login_failure(&payload.username).await);
    };
    if !password::verify_password(&payload.password, &account.password) {
        return Err(login_failure(&payload.username).await);
    }
    if account.status != 1 {
        security_log!("WARN", "login_disabled_account", username = payload.username);
        return Err(AppError::account_disabled());
    }

    let jwt = state
        .get_jwt_service()
        .generate_token(account.id, &account.username, ROLE_USER)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = account.id, username = %account.username, "User logged in");
    Ok(ok_with_message(
        LoginResponse {
            user: UserResponse::from(account),
            token: format!("Bearer {jwt}"),
        },
        "Login successful",
    ))
}

async fn login_failure(username: &str) -> AppError {
    security_log!("WARN", "login_failed", username = username.to_string());
    tokio::time::sleep(Duration::from_millis(LOGIN_FAILURE_DELAY_MS)).await;
    AppError::invalid_credentials()
}

/// GET /api/user/profile - 当前用户信息 (不含密码)
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let found = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ok(found))
}

/// GET /api/verify-token - 回显已认证身份
pub async fn verify_token(current: CurrentUser) -> Json<ApiResponse<UserInfo>> {
    ok(UserInfo {
        id: current.id,
        username: current.username,
        role: current.role,
    })
}
