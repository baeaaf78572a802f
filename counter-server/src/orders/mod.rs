//! Order Lifecycle Module
//!
//! - **lifecycle**: `OrderService`, validation, pricing, status changes, reads
//! - **wait_time**: `WaitTimePolicy`, wait minutes and tier classification
//! - **live_sync**: `LiveSync`, fingerprinted snapshots for polling clients
//! - **money**: decimal price arithmetic
//! - **stats**: completed-order statistics
//!
//! # Data Flow
//!
//! ```text
//! HTTP → OrderService → repository::order → SQLite
//!                ↓
//!         WaitTimePolicy (read-time wait fields)
//!                ↓
//!          LiveSync (fingerprint → 304 / snapshot)
//! ```

pub mod lifecycle;
pub mod live_sync;
pub mod money;
pub mod stats;
pub mod wait_time;

// Re-exports
pub use lifecycle::{OrderService, parse_status_filter};
pub use live_sync::{LiveFilter, LiveOutcome, LiveSync};
pub use wait_time::WaitTimePolicy;
