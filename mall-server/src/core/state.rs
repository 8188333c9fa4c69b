use std::path::PathBuf;
use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，Clone 成本极低。
/// 进程启动时创建一次，注入到路由层，所有 handler 通过
/// `State<ServerState>` 获取。数据库连接池随进程结束 drop 关闭，
/// 不存在全局可变状态。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 创建工作目录和上传目录，打开数据库 (执行迁移)，构造 JWT 服务。
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;

        let db = DbService::new(&config.database_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
        };

        std::fs::create_dir_all(state.uploads_dir())
            .map_err(|e| AppError::internal(format!("Failed to create uploads dir: {e}")))?;

        Ok(state)
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 业务时区
    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// 上传图片存储目录
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
            .join("uploads")
            .join("images")
    }
}
