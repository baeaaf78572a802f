//! Shared types for the counter order tracker
//!
//! Wire models, request payloads and the unified error system used by
//! `counter-server` and any client that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
