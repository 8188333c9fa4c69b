//! Admin API 模块
//!
//! 登录/注册是公开引导接口；其余管理接口在 [`require_auth`] 之上
//! 叠加 [`require_admin`]，非管理员令牌一律 403。
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/admin/login | POST | 无 |
//! | /api/admin/register | POST | 无 |
//! | /api/admin/profile | GET | 需要 + admin |
//! | /api/admins | GET / POST | 需要 + admin |
//! | /api/admins/search | GET | 需要 + admin |
//! | /api/admins/{id} | PUT / DELETE | 需要 + admin |
//! | /api/admins/{id}/status | PATCH | 需要 + admin |
//!
//! [`require_auth`]: crate::auth::require_auth
//! [`require_admin`]: crate::auth::require_admin

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public = Router::new()
        .route("/api/admin/login", post(handler::login))
        .route("/api/admin/register", post(handler::register));

    let guarded = Router::new()
        .route("/api/admin/profile", get(handler::profile))
        .nest("/api/admins", admin_routes())
        .route_layer(axum_middleware::from_fn(require_admin));

    public.merge(guarded)
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
}
