//! Completed-order statistics

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{CompletedSummary, CustomerCount, Order};
use shared::util::{MILLIS_PER_MINUTE, round1};

use super::money::{to_decimal, to_f64};

const TOP_CUSTOMERS: usize = 5;

/// Assumed preparation time, subtracted from an order's age to estimate its wait
const PREP_MINUTES: f64 = 3.0;

fn bump(counts: &mut BTreeMap<String, u64>, key: &str) {
    *counts.entry(key.to_string()).or_default() += 1;
}

/// Highest count wins; ties go to the alphabetically first key
fn most_common(counts: &BTreeMap<String, u64>) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;
    for (key, &n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((key, n));
        }
    }
    best.map(|(key, _)| key.clone())
}

/// Summarize completed orders at `now_ms`. Missing syrup counts as "None",
/// missing foam as "Regular", an empty milk as "None".
///
/// Completion times are not stored, so the wait is estimated from the order's
/// age minus [`PREP_MINUTES`].
pub fn summarize(orders: &[Order], now_ms: i64) -> CompletedSummary {
    let mut summary = CompletedSummary::default();
    let mut revenue = Decimal::ZERO;
    let mut wait_total = 0.0;
    let mut customers: BTreeMap<String, u64> = BTreeMap::new();

    for order in orders {
        summary.total_drinks += 1;
        revenue += to_decimal(order.price);
        let age = (now_ms - order.created_at) as f64 / MILLIS_PER_MINUTE as f64;
        wait_total += (age - PREP_MINUTES).max(0.0);
        if order.extra_shot {
            summary.total_extra_shots += 1;
        }

        let milk = if order.milk.is_empty() { "None" } else { order.milk.as_str() };
        bump(&mut summary.drink_counts, &order.drink);
        bump(&mut summary.milk_counts, milk);
        bump(&mut summary.syrup_counts, order.syrup.as_deref().unwrap_or("None"));
        bump(&mut summary.foam_counts, order.foam.as_deref().unwrap_or("Regular"));
        bump(&mut summary.temperature_counts, order.temperature.as_str());
        bump(&mut customers, &order.customer_name);
    }

    summary.total_revenue = to_f64(revenue);
    if summary.total_drinks > 0 {
        summary.avg_order_value = to_f64(revenue / Decimal::from(summary.total_drinks));
        summary.avg_wait_time = round1(wait_total / summary.total_drinks as f64);
    }
    summary.most_popular_drink = most_common(&summary.drink_counts);
    summary.most_popular_milk = most_common(&summary.milk_counts);
    summary.most_popular_syrup = most_common(&summary.syrup_counts);

    let mut top: Vec<CustomerCount> = customers
        .into_iter()
        .map(|(customer_name, orders)| CustomerCount {
            customer_name,
            orders,
        })
        .collect();
    // Stable sort keeps alphabetical order among equal counts
    top.sort_by(|a, b| b.orders.cmp(&a.orders));
    top.truncate(TOP_CUSTOMERS);
    summary.top_customers = top;

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, Temperature};

    fn completed(id: i64, name: &str, drink: &str, price: f64) -> Order {
        Order {
            id,
            customer_name: name.into(),
            drink: drink.into(),
            milk: "Oat".into(),
            syrup: None,
            foam: None,
            temperature: Temperature::Hot,
            extra_shot: false,
            notes: String::new(),
            status: OrderStatus::Completed,
            price,
            created_at: 0,
        }
    }

    #[test]
    fn test_empty() {
        let s = summarize(&[], 0);
        assert_eq!(s.total_drinks, 0);
        assert_eq!(s.total_revenue, 0.0);
        assert_eq!(s.avg_order_value, 0.0);
        assert_eq!(s.avg_wait_time, 0.0);
        assert!(s.most_popular_drink.is_none());
        assert!(s.most_popular_milk.is_none());
        assert!(s.most_popular_syrup.is_none());
        assert!(s.top_customers.is_empty());
    }

    #[test]
    fn test_totals_and_breakdowns() {
        let mut iced = completed(3, "Bob", "Coffee", 4.0);
        iced.temperature = Temperature::Iced;
        iced.extra_shot = true;
        iced.syrup = Some("Vanilla".into());
        iced.foam = Some("No Foam".into());
        let orders = vec![
            completed(1, "Ada", "Latte", 4.0),
            completed(2, "Ada", "Latte", 5.0),
            iced,
        ];

        let s = summarize(&orders, 0);
        assert_eq!(s.total_drinks, 3);
        assert_eq!(s.total_revenue, 13.0);
        assert_eq!(s.avg_order_value, 4.33);
        assert_eq!(s.total_extra_shots, 1);
        assert_eq!(s.drink_counts["Latte"], 2);
        assert_eq!(s.syrup_counts["None"], 2);
        assert_eq!(s.syrup_counts["Vanilla"], 1);
        assert_eq!(s.foam_counts["Regular"], 2);
        assert_eq!(s.temperature_counts["Iced"], 1);
        assert_eq!(s.most_popular_drink.as_deref(), Some("Latte"));
        assert_eq!(s.most_popular_milk.as_deref(), Some("Oat"));
        assert_eq!(s.most_popular_syrup.as_deref(), Some("None"));
        assert_eq!(
            s.top_customers,
            vec![
                CustomerCount {
                    customer_name: "Ada".into(),
                    orders: 2
                },
                CustomerCount {
                    customer_name: "Bob".into(),
                    orders: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_customers_capped_and_tie_broken_by_name() {
        let orders: Vec<Order> = ["Fay", "Eve", "Dan", "Cat", "Bob", "Ada"]
            .iter()
            .enumerate()
            .map(|(i, name)| completed(i as i64, name, "Coffee", 3.0))
            .collect();
        let s = summarize(&orders, 0);
        let names: Vec<_> = s.top_customers.iter().map(|c| c.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bob", "Cat", "Dan", "Eve"]);
    }

    #[test]
    fn test_most_popular_tie() {
        let orders = vec![
            completed(1, "Ada", "Mocha", 4.0),
            completed(2, "Bob", "Coffee", 3.0),
        ];
        assert_eq!(summarize(&orders, 0).most_popular_drink.as_deref(), Some("Coffee"));
    }

    #[test]
    fn test_avg_wait_subtracts_prep_time() {
        const MINUTE: i64 = 60_000;
        let mut recent = completed(3, "Cat", "Latte", 4.0);
        recent.created_at = 9 * MINUTE;
        let orders = vec![
            completed(1, "Ada", "Latte", 4.0),
            completed(2, "Bob", "Latte", 4.0),
            recent,
        ];

        // Ages 10, 10, 1 minutes -> waits 7, 7, 0 (floored)
        let s = summarize(&orders, 10 * MINUTE);
        assert_eq!(s.avg_wait_time, 4.7);
    }

    #[test]
    fn test_most_popular_milk_and_syrup() {
        let mut almond = completed(1, "Ada", "Latte", 4.0);
        almond.milk = "Almond".into();
        almond.syrup = Some("Caramel".into());
        let mut almond_again = completed(2, "Bob", "Latte", 4.0);
        almond_again.milk = "Almond".into();
        almond_again.syrup = Some("Caramel".into());
        let mut no_milk = completed(3, "Cat", "Coffee", 3.0);
        no_milk.milk = String::new();

        let s = summarize(&[almond, almond_again, no_milk], 0);
        assert_eq!(s.milk_counts["None"], 1);
        assert_eq!(s.most_popular_milk.as_deref(), Some("Almond"));
        assert_eq!(s.most_popular_syrup.as_deref(), Some("Caramel"));
    }
}
