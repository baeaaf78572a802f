//! Menu API Handlers
//!
//! Every mutation reloads the catalog cache before responding, so the next
//! order is priced with the new menu.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{MenuGroups, MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/menu - 菜单 (按类型分组)
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<MenuGroups>> {
    Ok(ApiResponse::success(state.catalog.grouped()))
}

/// POST /api/menu - 新增菜单项
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<ApiResponse<MenuItem>> {
    let item = state.catalog.add(payload).await?;
    Ok(ApiResponse::success_with_message("Menu item added", item))
}

/// PUT /api/menu/{id} - 改名 / 改价
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<ApiResponse<MenuItem>> {
    let item = state.catalog.update(id, payload).await?;
    Ok(ApiResponse::success_with_message("Menu item updated", item))
}

/// DELETE /api/menu/{id} - 删除菜单项
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.catalog.delete(id).await?;
    Ok(ApiResponse::ok())
}
