//! Order Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::settings::WaitTier;

/// Order fulfillment status
///
/// Transitions are free-form; the rank only drives display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Display rank: pending(1) < in_progress(2) < completed(3)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
        }
    }

    /// Pending and in-progress orders accumulate wait time
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "'{}' is not one of pending, in_progress, completed",
                other
            )),
        }
    }
}

/// Drink temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Temperature {
    Hot,
    Iced,
}

impl Temperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Iced => "Iced",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hot" => Ok(Self::Hot),
            "Iced" => Ok(Self::Iced),
            other => Err(format!("'{}' is not one of Hot, Iced", other)),
        }
    }
}

/// Order entity
///
/// Field order is the canonical serialization order hashed by live-state
/// fingerprints. It must not contain read-time derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub drink: String,
    pub milk: String,
    pub syrup: Option<String>,
    pub foam: Option<String>,
    pub temperature: Temperature,
    pub extra_shot: bool,
    pub notes: String,
    pub status: OrderStatus,
    /// Fixed at creation, never repriced
    pub price: f64,
    /// Unix millis, set by the storage layer
    pub created_at: i64,
}

/// Order as returned by read paths: stored fields plus the volatile,
/// read-time derived wait fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// Minutes since creation for active orders, 0 for completed
    pub wait_time_minutes: f64,
    pub wait_tier: WaitTier,
}

/// Create order payload
///
/// Text fields arrive raw and are validated / sanitized server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub drink: String,
    #[serde(default)]
    pub milk: String,
    #[serde(default)]
    pub syrup: Option<String>,
    #[serde(default)]
    pub foam: Option<String>,
    pub temperature: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub extra_shot: bool,
}

/// Response of a successful create-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: i64,
    pub customer_name: String,
    pub drink: String,
    pub price: f64,
    pub extra_shot: bool,
    pub status: OrderStatus,
}

impl From<&Order> for OrderCreated {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            drink: order.drink.clone(),
            price: order.price,
            extra_shot: order.extra_shot,
            status: order.status,
        }
    }
}

/// Update status payload (raw token, validated server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Order counts per status (always over the whole order set)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub total: i64,
}

/// Printable label content for one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLabel {
    pub order_id: i64,
    pub lines: Vec<String>,
}

impl OrderLabel {
    pub fn for_order(order: &Order) -> Self {
        let mut lines = vec![
            format!("{}'s {}", order.customer_name, order.drink),
            format!("Milk: {}", order.milk),
            format!("Syrup: {}", order.syrup.as_deref().unwrap_or("None")),
            format!("Foam: {}", order.foam.as_deref().unwrap_or("Regular")),
            format!("Temp: {}", order.temperature),
        ];
        if order.extra_shot {
            lines.push("+ Extra Shot".to_string());
        }
        if !order.notes.is_empty() {
            lines.push(format!("Note: {}", order.notes));
        }
        Self {
            order_id: order.id,
            lines,
        }
    }
}

/// Count of orders for one customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCount {
    pub customer_name: String,
    pub orders: u64,
}

/// Statistics over completed orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletedSummary {
    pub total_drinks: u64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    /// Estimated average wait in minutes: age at read time minus prep time, floored at 0
    pub avg_wait_time: f64,
    pub total_extra_shots: u64,
    pub drink_counts: BTreeMap<String, u64>,
    pub milk_counts: BTreeMap<String, u64>,
    pub syrup_counts: BTreeMap<String, u64>,
    pub foam_counts: BTreeMap<String, u64>,
    pub temperature_counts: BTreeMap<String, u64>,
    pub most_popular_drink: Option<String>,
    pub most_popular_milk: Option<String>,
    pub most_popular_syrup: Option<String>,
    pub top_customers: Vec<CustomerCount>,
}

/// Recent order history of one customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHistory {
    pub customer_name: String,
    pub orders: Vec<Order>,
    pub total_orders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: 1,
            customer_name: "Ada".to_string(),
            drink: "Latte".to_string(),
            milk: "Oat".to_string(),
            syrup: None,
            foam: Some("Extra Foam".to_string()),
            temperature: Temperature::Iced,
            extra_shot: true,
            notes: "half sweet".to_string(),
            status: OrderStatus::Pending,
            price: 5.0,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!(
            "in_progress".parse::<OrderStatus>(),
            Ok(OrderStatus::InProgress)
        );
        assert_eq!(
            "completed".parse::<OrderStatus>(),
            Ok(OrderStatus::Completed)
        );
        assert!("Completed".parse::<OrderStatus>().is_err());
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_rank_order() {
        assert!(OrderStatus::Pending.rank() < OrderStatus::InProgress.rank());
        assert!(OrderStatus::InProgress.rank() < OrderStatus::Completed.rank());
    }

    #[test]
    fn test_status_serde_matches_as_str() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_temperature_parse() {
        assert_eq!("Hot".parse::<Temperature>(), Ok(Temperature::Hot));
        assert_eq!("Iced".parse::<Temperature>(), Ok(Temperature::Iced));
        assert!("Warm".parse::<Temperature>().is_err());
    }

    #[test]
    fn test_order_view_flattens_order() {
        let view = OrderView {
            order: sample_order(),
            wait_time_minutes: 3.5,
            wait_tier: WaitTier::Normal,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["customer_name"], "Ada");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["temperature"], "Iced");
        assert_eq!(json["wait_time_minutes"], 3.5);
        assert_eq!(json["wait_tier"], "normal");
    }

    #[test]
    fn test_label_lines() {
        let label = OrderLabel::for_order(&sample_order());
        assert_eq!(
            label.lines,
            vec![
                "Ada's Latte",
                "Milk: Oat",
                "Syrup: None",
                "Foam: Extra Foam",
                "Temp: Iced",
                "+ Extra Shot",
                "Note: half sweet",
            ]
        );
    }

    #[test]
    fn test_label_omits_empty_note_and_shot() {
        let mut order = sample_order();
        order.extra_shot = false;
        order.notes.clear();
        order.foam = None;
        let label = OrderLabel::for_order(&order);
        assert_eq!(label.lines.len(), 5);
        assert_eq!(label.lines[3], "Foam: Regular");
    }
}
