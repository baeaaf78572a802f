//! Order API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET / POST | 列表 (status 可重复, search) / 创建 |
//! | /api/orders/live | GET | 实时快照 (ETag / 304) |
//! | /api/orders/queue | GET | 看板快照, 最早的在前 (ETag / 304) |
//! | /api/orders/counts | GET | 各状态数量 |
//! | /api/orders/completed/summary | GET | 已完成订单统计 |
//! | /api/orders/{id} | GET / DELETE | 详情 / 删除 |
//! | /api/orders/{id}/status | PUT | 更新状态 |
//! | /api/orders/{id}/label | GET | 标签行 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/live", get(handler::live))
        .route("/queue", get(handler::queue))
        .route("/counts", get(handler::counts))
        .route("/completed/summary", get(handler::completed_summary))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/label", get(handler::label))
}
