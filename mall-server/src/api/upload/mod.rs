//! Upload API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/upload | POST | 需要 |
//! | /uploads/{filename} | GET | 无 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload_image))
        .route("/uploads/{filename}", get(handler::serve_image))
}
