//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`ApiResponse`] - 错误与响应 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`validation`] - 输入校验与清洗

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
