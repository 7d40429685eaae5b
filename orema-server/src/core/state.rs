use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, PermissionCache};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::bootstrap::bootstrap_if_empty;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池句柄实现浅拷贝，每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | permissions | Arc<PermissionCache> | 门店权限矩阵缓存 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 角色权限覆盖缓存
    pub permissions: Arc<PermissionCache>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库并执行迁移
    /// 2. 空库时创建默认门店和超级管理员
    /// 3. 初始化 JWT 服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        if config.database_url != ":memory:" {
            std::fs::create_dir_all(&config.work_dir)?;
        }

        let db = DbService::open(&config.database_url).await?;
        bootstrap_if_empty(&db.pool, &config.bootstrap).await?;

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// 使用已有连接池构造 (测试)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
            permissions: Arc::new(PermissionCache::new()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
