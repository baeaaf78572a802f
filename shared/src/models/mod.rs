//! Data models
//!
//! Shared between counter-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod live;
pub mod menu_item;
pub mod order;
pub mod settings;

// Re-exports
pub use live::*;
pub use menu_item::*;
pub use order::*;
pub use settings::*;
