//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use http::{HeaderMap, StatusCode, header};
use serde::Deserialize;
use shared::models::{
    CompletedSummary, CreateOrderRequest, OrderCreated, OrderLabel, OrderView, StatusCounts,
    UpdateStatusRequest,
};

use crate::core::ServerState;
use crate::orders::{LiveFilter, LiveOutcome, parse_status_filter};
use crate::utils::{ApiResponse, AppResult};

/// Query params for the live snapshot
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    /// active (default) | all | pending | in_progress | completed
    pub status: Option<String>,
    /// Fingerprint of the client's last snapshot (alternative to If-None-Match)
    pub fingerprint: Option<String>,
}

/// Query params for the board view
#[derive(Debug, Default, Deserialize)]
pub struct QueueQuery {
    pub fingerprint: Option<String>,
}

/// Strip `W/` and quotes from an entity tag
fn normalize_etag(raw: &str) -> &str {
    let tag = raw.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}

/// Fingerprint the client already has: `?fingerprint=` wins over `If-None-Match`
fn client_fingerprint<'a>(headers: &'a HeaderMap, query: Option<&'a str>) -> Option<&'a str> {
    if let Some(fp) = query.map(normalize_etag).filter(|fp| !fp.is_empty()) {
        return Some(fp);
    }
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(normalize_etag)
        .filter(|fp| !fp.is_empty())
}

/// 304 with ETag, or 200 with body, ETag and `Cache-Control: no-cache`
fn live_response(outcome: LiveOutcome) -> Response {
    let etag = format!("\"{}\"", outcome.fingerprint());
    match outcome {
        LiveOutcome::NotModified { .. } => {
            (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response()
        }
        LiveOutcome::Changed(snapshot) => (
            [
                (header::ETAG, etag),
                (header::CACHE_CONTROL, "no-cache".to_string()),
            ],
            Json(snapshot),
        )
            .into_response(),
    }
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<ApiResponse<OrderCreated>> {
    let order = state.orders.create_order(payload).await?;
    Ok(ApiResponse::success_with_message(
        "Order created",
        OrderCreated::from(&order),
    ))
}

/// GET /api/orders?status=pending&status=in_progress&search=ada - 订单列表
///
/// `status` may repeat or be comma separated. Absent means pending and
/// in progress; `all` means every status.
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<ApiResponse<Vec<OrderView>>> {
    let tokens: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "status")
        .flat_map(|(_, value)| value.split(','))
        .filter(|token| !token.trim().is_empty())
        .collect();
    let statuses = parse_status_filter(tokens.as_slice())?;
    let search = params
        .iter()
        .find(|(key, _)| key == "search")
        .map(|(_, value)| value.as_str());

    let orders = state
        .orders
        .list_orders(statuses, search, shared::util::now_millis())
        .await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderView>> {
    let order = state
        .orders
        .get_order(id, shared::util::now_millis())
        .await?;
    Ok(ApiResponse::success(order))
}

/// PUT /api/orders/{id}/status - 更新状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<OrderView>> {
    let order = state.orders.update_status(id, &payload.status).await?;
    let view = state
        .wait_policy
        .view(order, shared::util::now_millis());
    Ok(ApiResponse::success_with_message("Status updated", view))
}

/// DELETE /api/orders/{id} - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.orders.delete_order(id).await?;
    Ok(ApiResponse::ok())
}

/// GET /api/orders/{id}/label - 标签内容
pub async fn label(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderLabel>> {
    let label = state.orders.label(id).await?;
    Ok(ApiResponse::success(label))
}

/// GET /api/orders/live?status=active - 实时快照
pub async fn live(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<LiveQuery>,
) -> AppResult<Response> {
    let filter = LiveFilter::parse(query.status.as_deref())?;
    let client_fp = client_fingerprint(&headers, query.fingerprint.as_deref());
    let outcome = state
        .live
        .snapshot(filter, client_fp, shared::util::now_millis())
        .await?;
    Ok(live_response(outcome))
}

/// GET /api/orders/queue - 看板快照
pub async fn queue(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<QueueQuery>,
) -> AppResult<Response> {
    let client_fp = client_fingerprint(&headers, query.fingerprint.as_deref());
    let outcome = state
        .live
        .queue_snapshot(client_fp, shared::util::now_millis())
        .await?;
    Ok(live_response(outcome))
}

/// GET /api/orders/counts - 各状态数量
pub async fn counts(State(state): State<ServerState>) -> AppResult<ApiResponse<StatusCounts>> {
    let counts = state.orders.counts().await?;
    Ok(ApiResponse::success(counts))
}

/// GET /api/orders/completed/summary - 已完成订单统计
pub async fn completed_summary(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<CompletedSummary>> {
    let summary = state
        .orders
        .completed_summary(shared::util::now_millis())
        .await?;
    Ok(ApiResponse::success(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_normalize_etag() {
        assert_eq!(normalize_etag("\"abc\""), "abc");
        assert_eq!(normalize_etag("W/\"abc\""), "abc");
        assert_eq!(normalize_etag(" abc "), "abc");
    }

    #[test]
    fn test_client_fingerprint_precedence() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_fingerprint(&headers, None), None);

        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"from-header\""));
        assert_eq!(client_fingerprint(&headers, None), Some("from-header"));
        assert_eq!(client_fingerprint(&headers, Some("from-query")), Some("from-query"));
        assert_eq!(client_fingerprint(&headers, Some("")), Some("from-header"));
    }
}
