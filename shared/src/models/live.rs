// shared/src/models/live.rs
use serde::{Deserialize, Serialize};

use super::order::{OrderView, StatusCounts};

/// 轮询快照
///
/// 客户端保存 `fingerprint`，下次轮询时回传；指纹一致时服务器返回 304。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSnapshot {
    pub orders: Vec<OrderView>,
    /// Counts over all orders, independent of the filter
    pub counts: StatusCounts,
    pub fingerprint: String,
    /// Server time of the read (Unix millis)
    pub timestamp: i64,
}
