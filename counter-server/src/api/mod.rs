//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单生命周期、实时快照、统计
//! - [`customers`] - 顾客列表与历史
//! - [`menu`] - 菜单管理
//! - [`settings`] - 等待时间阈值

pub mod customers;
pub mod health;
pub mod menu;
pub mod orders;
pub mod settings;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
