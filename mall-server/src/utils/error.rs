//! 统一错误处理
//!
//! 错误类型与响应结构统一来自 [`shared::error`]：
//! - [`AppError`] - 带数字错误码的应用错误
//! - [`ApiResponse`] - API 统一响应结构
//!
//! # 错误码区间
//!
//! | 区间 | 分类 |
//! |------|------|
//! | 0xxx | 通用 |
//! | 1xxx | 认证 |
//! | 2xxx | 权限 |
//! | 3xxx | 用户 / 管理员 |
//! | 4xxx | 订单 |
//! | 5xxx | 促销活动 |
//! | 6xxx | 商品 (65xx: 文件上传) |
//! | 9xxx | 系统 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::UserNotFound))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
