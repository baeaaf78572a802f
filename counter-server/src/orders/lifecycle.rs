//! Order Lifecycle Engine
//!
//! Validates and prices new orders, moves them between statuses and serves
//! every read path with freshly computed wait fields.
//!
//! # Flow
//!
//! ```text
//! CreateOrderRequest → validate → price (MenuCatalog) → INSERT (pending)
//! update_status(raw) → validate token → UPDATE
//! reads → repository → WaitTimePolicy::views(now)
//! ```

use rust_decimal::Decimal;
use shared::models::{
    CompletedSummary, CreateOrderRequest, CustomerHistory, Order, OrderLabel, OrderStatus,
    OrderView, StatusCounts,
};
use sqlx::SqlitePool;

use super::money::{order_price, to_f64};
use super::stats;
use super::wait_time::WaitTimePolicy;
use crate::db::repository::RepoError;
use crate::db::repository::order::{self, OrderInsert, OrderQuery, OrderSort};
use crate::services::MenuCatalog;
use crate::utils::validation::{
    validate_customer_name, validate_menu_item_name, validate_notes, validate_optional_menu_item,
    validate_search_query, validate_status, validate_temperature,
};
use crate::utils::{AppError, AppResult};

/// Orders shown in a customer's history
const HISTORY_LIMIT: i64 = 10;

/// Parse repeated `status` tokens
///
/// No tokens means the active statuses (pending, in progress). Any `all`
/// token yields an empty list, which the store reads as every status.
pub fn parse_status_filter<S: AsRef<str>>(raw: &[S]) -> AppResult<Vec<OrderStatus>> {
    if raw.is_empty() {
        return Ok(vec![OrderStatus::Pending, OrderStatus::InProgress]);
    }
    let mut statuses = Vec::new();
    for token in raw {
        let token = token.as_ref().trim();
        if token == "all" {
            return Ok(Vec::new());
        }
        let status = validate_status(token)?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    catalog: MenuCatalog,
    policy: WaitTimePolicy,
    extra_shot_price: Decimal,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        catalog: MenuCatalog,
        policy: WaitTimePolicy,
        extra_shot_price: Decimal,
    ) -> Self {
        Self {
            pool,
            catalog,
            policy,
            extra_shot_price,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Validate, price and store a new pending order
    pub async fn create_order(&self, req: CreateOrderRequest) -> AppResult<Order> {
        let customer_name = validate_customer_name(&req.customer_name)?;
        let drink = validate_menu_item_name("drink", &req.drink)?;
        let milk = validate_menu_item_name("milk", &req.milk)?;
        let syrup = validate_optional_menu_item("syrup", req.syrup.as_deref())?;
        let foam = validate_optional_menu_item("foam", req.foam.as_deref())?;
        let temperature = validate_temperature(&req.temperature)?;
        let notes = validate_notes(req.notes.as_deref())?;

        let drink_price = self.catalog.drink_price(&drink);
        if drink_price.is_none() {
            tracing::warn!(drink = %drink, "Drink has no catalog price, charging 0");
        }
        let price = order_price(drink_price, req.extra_shot, self.extra_shot_price);

        let created = order::insert(
            &self.pool,
            OrderInsert {
                customer_name,
                drink,
                milk,
                syrup,
                foam,
                temperature,
                extra_shot: req.extra_shot,
                notes,
                price: to_f64(price),
            },
        )
        .await?;

        tracing::info!(
            order_id = created.id,
            customer = %created.customer_name,
            drink = %created.drink,
            price = created.price,
            "Order created"
        );
        Ok(created)
    }

    /// Set the status of an order. Any transition is allowed.
    pub async fn update_status(&self, id: i64, raw_status: &str) -> AppResult<Order> {
        let status = validate_status(raw_status)?;
        let updated = order::update_status(&self.pool, id, status)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::order_not_found(id),
                other => other.into(),
            })?;

        tracing::info!(order_id = id, status = %status, "Order status updated");
        Ok(updated)
    }

    pub async fn delete_order(&self, id: i64) -> AppResult<()> {
        if !order::delete(&self.pool, id).await? {
            return Err(AppError::order_not_found(id));
        }
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    async fn find(&self, id: i64) -> AppResult<Order> {
        order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::order_not_found(id))
    }

    pub async fn get_order(&self, id: i64, now_ms: i64) -> AppResult<OrderView> {
        let order = self.find(id).await?;
        Ok(self.policy.view(order, now_ms))
    }

    /// Orders by status rank, newest first. Empty `statuses` means all.
    pub async fn list_orders(
        &self,
        statuses: Vec<OrderStatus>,
        search: Option<&str>,
        now_ms: i64,
    ) -> AppResult<Vec<OrderView>> {
        let query = OrderQuery {
            statuses,
            search: validate_search_query(search)?,
            sort: OrderSort::RankNewest,
            limit: None,
        };
        let orders = order::list(&self.pool, &query).await?;
        Ok(self.policy.views(orders, now_ms))
    }

    pub async fn label(&self, id: i64) -> AppResult<OrderLabel> {
        let order = self.find(id).await?;
        Ok(OrderLabel::for_order(&order))
    }

    pub async fn counts(&self) -> AppResult<StatusCounts> {
        Ok(order::counts(&self.pool).await?)
    }

    pub async fn customers(&self) -> AppResult<Vec<String>> {
        Ok(order::customer_names(&self.pool).await?)
    }

    /// Last orders of customers whose name contains `raw_name`
    pub async fn customer_history(&self, raw_name: &str) -> AppResult<CustomerHistory> {
        let customer_name = validate_customer_name(raw_name)?;
        let orders = order::customer_history(&self.pool, &customer_name, HISTORY_LIMIT).await?;
        Ok(CustomerHistory {
            total_orders: orders.len(),
            customer_name,
            orders,
        })
    }

    /// Statistics over completed orders; wait estimates use `now_ms`
    pub async fn completed_summary(&self, now_ms: i64) -> AppResult<CompletedSummary> {
        let query = OrderQuery {
            statuses: vec![OrderStatus::Completed],
            sort: OrderSort::Newest,
            ..Default::default()
        };
        let completed = order::list(&self.pool, &query).await?;
        Ok(stats::summarize(&completed, now_ms))
    }
}
