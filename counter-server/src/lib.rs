//! Counter Server - 饮品柜台订单追踪服务
//!
//! # 架构概述
//!
//! - **订单生命周期** (`orders`): 下单定价、状态流转、等待时长分级、实时快照指纹
//! - **菜单目录** (`services`): 带缓存的菜单与价格查询
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! counter-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件层
//! ├── middleware/    # 请求日志
//! ├── services/      # 菜单目录
//! ├── orders/        # 订单生命周期、等待时长、实时同步、统计
//! ├── utils/         # 日志、输入校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use orders::{LiveSync, OrderService, WaitTimePolicy};
pub use routes::build_app;
pub use services::MenuCatalog;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 `.env` 并按环境变量初始化日志
///
/// Returns the loaded config so `main` reads the environment once.
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    config
}

pub fn print_banner() {
    println!(
        r#"
   ______                  __
  / ____/___  __  ______  / /____  _____
 / /   / __ \/ / / / __ \/ __/ _ \/ ___/
/ /___/ /_/ / /_/ / / / / /_/  __/ /
\____/\____/\__,_/_/ /_/\__/\___/_/
    "#
    );
}
