//! User API 模块 (管理侧会员管理)
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/users | GET / POST | 需要 |
//! | /api/users/{id} | PUT | 需要 |
//! | /api/users/{id}/status | PATCH | 需要 |

mod handler;

pub(crate) use handler::map_user_repo_err;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}/status", patch(handler::update_status))
}
