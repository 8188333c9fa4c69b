//! 核心模块 - 配置、状态、服务器
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 共享服务句柄 (数据库、JWT)
//! - [`Server`] - HTTP 服务器启动和关闭

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
