//! Customer API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/customers | GET | 顾客名单 (去重, 按字母) |
//! | /api/customers/{name}/history | GET | 最近 10 单 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{name}/history", get(handler::history))
}
