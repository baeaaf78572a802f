use std::path::PathBuf;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::{LiveSync, OrderService, WaitTimePolicy};
use crate::services::MenuCatalog;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价的 `Clone` (内部为 `Arc` / 连接池句柄)。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | catalog | MenuCatalog | 菜单缓存 |
/// | wait_policy | WaitTimePolicy | 等待时间阈值 |
/// | orders | OrderService | 订单生命周期 |
/// | live | LiveSync | 轮询快照 / 指纹 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    pub catalog: MenuCatalog,
    pub wait_policy: WaitTimePolicy,
    pub orders: OrderService,
    pub live: LiveSync,
}

impl ServerState {
    /// 在已打开的连接池上组装服务并加载缓存
    ///
    /// 空菜单会写入默认菜单，缺失的阈值会写入默认值。
    pub async fn with_pool(config: Config, pool: SqlitePool) -> AppResult<Self> {
        let catalog = MenuCatalog::new(pool.clone());
        catalog.warmup().await?;

        let wait_policy = WaitTimePolicy::new(pool.clone());
        wait_policy.warmup().await?;

        let orders = OrderService::new(
            pool.clone(),
            catalog.clone(),
            wait_policy.clone(),
            config.extra_shot_price,
        );
        let live = LiveSync::new(pool.clone(), wait_policy.clone());

        Ok(Self {
            config,
            pool,
            catalog,
            wait_policy,
            orders,
            live,
        })
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (迁移)
    /// 3. 菜单缓存与等待阈值
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work directory {}: {e}",
                config.work_dir
            ))
        })?;

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::internal(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        tracing::info!(path = %db_path.display(), "Database ready");

        Self::with_pool(config.clone(), db_service.pool).await
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("wait_policy", &self.wait_policy)
            .finish_non_exhaustive()
    }
}
