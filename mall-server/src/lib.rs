//! Mall Server - 商城订单后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) + 嵌入式迁移，repository 自由函数
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **订单核心** (`db::repository::order`): 事务化创建/流转 + 库存守卫
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mall-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装 + 中间件栈
//! ├── db/            # 连接池、迁移、repository
//! ├── order_money/   # Decimal 金额校验
//! └── utils/         # 日志、时间、校验、密码
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod order_money;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 进程启动准备: dotenv + 日志
///
/// 必须在 [`Config::from_env`] 之前调用，.env 里的变量才会生效。
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = log_dir.as_deref() {
        let _ = std::fs::create_dir_all(dir);
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    __  ___      ____
   /  |/  /___ _/ / /
  / /|_/ / __ `/ / /
 / /  / / /_/ / / /
/_/  /_/\__,_/_/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
