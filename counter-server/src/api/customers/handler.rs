//! Customer API Handlers

use axum::extract::{Path, State};
use shared::models::CustomerHistory;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/customers - 顾客名单
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<String>>> {
    let customers = state.orders.customers().await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/{name}/history - 顾客最近订单
pub async fn history(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<CustomerHistory>> {
    let history = state.orders.customer_history(&name).await?;
    Ok(ApiResponse::success(history))
}
