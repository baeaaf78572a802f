//! Settings API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings/wait-time-thresholds",
        get(handler::get_thresholds).put(handler::update_thresholds),
    )
}
