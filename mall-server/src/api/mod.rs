//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册/登录/个人信息
//! - [`users`] - 会员管理接口
//! - [`admins`] - 管理员接口
//! - [`products`] - 商品管理接口
//! - [`promotions`] - 促销活动接口
//! - [`orders`] - 订单生命周期接口
//! - [`analytics`] - 统计分析接口
//! - [`upload`] - 图片上传接口

pub mod auth;
pub mod health;
pub mod upload;

// Accounts
pub mod admins;
pub mod users;

// Catalog
pub mod products;
pub mod promotions;

// Orders and reporting
pub mod analytics;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
