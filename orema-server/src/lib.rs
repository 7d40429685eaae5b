//! Oréma N+ Server - 餐厅收银 / 桌台管理后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移、仓储函数
//! - **认证** (`auth`): JWT + Argon2 认证，权限矩阵，路由授权
//! - **桌台** (`tables`): 转台、并单
//! - **订单** (`orders`): 开单、加菜、折扣、结账、取消
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! orema-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT、权限矩阵、路由授权
//! ├── db/            # 数据库层
//! ├── orders/        # 订单生命周期与金额计算
//! ├── tables/        # 转台与并单
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

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

/// 设置运行环境: 加载 .env、确保工作目录存在、初始化日志
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____                            _   _
  / __ \________  ____ ___  ____ _/ | / /_
 / / / / ___/ _ \/ __ `__ \/ __ `/  |/ /| |_
/ /_/ / /  /  __/ / / / / / /_/ / /|  /_   _|
\____/_/   \___/_/ /_/ /_/\__,_/_/ |_/  |_|
    "#
    );
}
