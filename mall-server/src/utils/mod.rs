//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`ApiResponse`] - 错误与响应类型 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 业务时区时间换算
//! - [`password`] - 密码哈希
//! - [`validation`] - 输入长度校验

pub mod error;
pub mod logger;
pub mod password;
pub mod time;
pub mod validation;

// Re-export error types from the error module (which re-exports from shared)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
