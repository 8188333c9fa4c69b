use std::str::FromStr;

use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件、日志) |
/// | SERVER_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | <WORK_DIR>/mall.db | SQLite 数据库文件 |
/// | JWT_SECRET | (开发环境自动生成) | JWT 密钥，至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期(分钟) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无，仅 stdout) | 日志文件目录 |
/// | ORDER_CREATE_REQUIRES_AUTH | false | 下单是否要求登录 |
/// | TIMEZONE | UTC | 业务时区 (统计日窗口) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mall SERVER_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、上传图片、日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub server_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (未设置则仅输出到 stdout)
    pub log_dir: Option<String>,
    /// 下单接口是否要求登录
    ///
    /// 历史行为是开放下单，其余写操作要求令牌；这里保留为显式开关。
    pub order_create_requires_auth: bool,
    /// 业务时区，用于统计的"今天"窗口
    pub timezone: Tz,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{work_dir}/mall.db"));

        Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            order_create_requires_auth: std::env::var("ORDER_CREATE_REQUIRES_AUTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| Tz::from_str(&tz).ok())
                .unwrap_or(chrono_tz::UTC),
            work_dir,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景：临时目录 + 随机端口
    pub fn with_overrides(work_dir: impl Into<String>, server_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/mall.db", config.work_dir);
        config.server_port = server_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides_repoints_database() {
        let config = Config::with_overrides("/tmp/mall-test", 0);
        assert_eq!(config.work_dir, "/tmp/mall-test");
        assert_eq!(config.database_path, "/tmp/mall-test/mall.db");
        assert_eq!(config.server_port, 0);
    }
}
