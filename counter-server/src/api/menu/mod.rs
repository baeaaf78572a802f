//! Menu API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/menu | GET / POST | 按类型分组的菜单 / 新增 |
//! | /api/menu/{id} | PUT / DELETE | 改名或改价 / 删除 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
