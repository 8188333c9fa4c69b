//! Auth API 模块
//!
//! 会员注册、登录与令牌自检。
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/register | POST | 无 |
//! | /api/login | POST | 无 |
//! | /api/user/profile | GET | 需要 |
//! | /api/verify-token | GET | 需要 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/register", post(handler::register))
        .route("/api/login", post(handler::login))
        .route("/api/user/profile", get(handler::profile))
        .route("/api/verify-token", get(handler::verify_token))
}
