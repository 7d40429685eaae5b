use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | DATABASE_URL | {WORK_DIR}/orema.db | SQLite 数据库路径 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，设置后按天滚动 |
/// | BOOTSTRAP_ESTABLISHMENT | Mon établissement | 首次启动创建的门店名 |
/// | BOOTSTRAP_ADMIN_USERNAME | admin | 首次启动创建的超级管理员 |
/// | BOOTSTRAP_ADMIN_PASSWORD | (无) | 超级管理员密码，未设置则跳过初始化 |
/// | AUTH_FIXED_DELAY_MS | 300 | 登录固定延迟 (毫秒) |
///
/// JWT_* 变量见 [`JwtConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_url: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub bootstrap: BootstrapConfig,
    /// 登录接口固定延迟，防止计时攻击
    pub auth_fixed_delay_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

/// First-start data
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub establishment_name: String,
    pub admin_username: String,
    pub admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("orema.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            database_url,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            bootstrap: BootstrapConfig {
                establishment_name: std::env::var("BOOTSTRAP_ESTABLISHMENT")
                    .unwrap_or_else(|_| "Mon établissement".into()),
                admin_username: std::env::var("BOOTSTRAP_ADMIN_USERNAME")
                    .unwrap_or_else(|_| "admin".into()),
                admin_password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
                    .ok()
                    .filter(|s| !s.is_empty()),
            },
            auth_fixed_delay_ms: std::env::var("AUTH_FIXED_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            work_dir,
        }
    }

    /// 测试配置：内存数据库、无登录延迟、固定 JWT 密钥
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            database_url: ":memory:".into(),
            http_port: 0,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-0123456789".into(),
                expiration_minutes: 60,
                issuer: "orema-server".into(),
                audience: "orema-clients".into(),
            },
            environment: "test".into(),
            log_level: "warn".into(),
            log_dir: None,
            bootstrap: BootstrapConfig {
                establishment_name: "Test".into(),
                admin_username: "admin".into(),
                admin_password: None,
            },
            auth_fixed_delay_ms: 0,
            shutdown_timeout_ms: 1000,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
