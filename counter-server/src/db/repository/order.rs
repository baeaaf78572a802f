//! Order Repository
//!
//! Dynamic filters are assembled with `QueryBuilder`: structure via `push`,
//! every external value via `push_bind`.

use super::{RepoError, RepoResult};
use crate::utils::validation::escape_like;
use shared::models::{Order, OrderStatus, StatusCounts, Temperature};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str = "id, customer_name, drink, milk, syrup, foam, temperature, extra_shot, notes, status, price, created_at";

/// `CASE status WHEN 'pending' THEN 1 ... END` from [`OrderStatus::rank`]
fn push_status_rank(qb: &mut QueryBuilder<'_, Sqlite>) {
    qb.push("CASE status");
    for status in OrderStatus::ALL {
        qb.push(format!(" WHEN '{}' THEN {}", status.as_str(), status.rank()));
    }
    qb.push(" END");
}

/// Validated, priced order ready for insertion
#[derive(Debug, Clone)]
pub struct OrderInsert {
    pub customer_name: String,
    pub drink: String,
    pub milk: String,
    pub syrup: Option<String>,
    pub foam: Option<String>,
    pub temperature: Temperature,
    pub extra_shot: bool,
    pub notes: String,
    pub price: f64,
}

/// Result ordering for list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    /// Status rank, then newest first
    #[default]
    RankNewest,
    /// Status rank, then oldest id first (board view)
    RankOldest,
    /// Newest first, ignoring status
    Newest,
}

impl OrderSort {
    fn push_order_by(self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" ORDER BY ");
        match self {
            Self::RankNewest => {
                push_status_rank(qb);
                qb.push(", created_at DESC, id DESC");
            }
            Self::RankOldest => {
                push_status_rank(qb);
                qb.push(", id ASC");
            }
            Self::Newest => {
                qb.push("created_at DESC, id DESC");
            }
        }
    }
}

/// List query: empty `statuses` means every status
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub statuses: Vec<OrderStatus>,
    pub search: Option<String>,
    pub sort: OrderSort,
    pub limit: Option<i64>,
}

pub async fn insert(pool: &SqlitePool, data: OrderInsert) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (customer_name, drink, milk, syrup, foam, temperature, extra_shot, notes, status, price, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.customer_name)
    .bind(&data.drink)
    .bind(&data.milk)
    .bind(&data.syrup)
    .bind(&data.foam)
    .bind(data.temperature)
    .bind(data.extra_shot)
    .bind(&data.notes)
    .bind(OrderStatus::Pending)
    .bind(data.price)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Hard delete. Returns false when no such order existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn list(pool: &SqlitePool, query: &OrderQuery) -> RepoResult<Vec<Order>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM orders WHERE 1=1"));

    if !query.statuses.is_empty() {
        qb.push(" AND status IN (");
        let mut separated = qb.separated(", ");
        for status in &query.statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
    }

    if let Some(term) = &query.search {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (customer_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR drink LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR notes LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    query.sort.push_order_by(&mut qb);

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

/// Per-status counts over the whole table
pub async fn counts(pool: &SqlitePool) -> RepoResult<StatusCounts> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    let mut counts = StatusCounts::default();
    for (status, n) in rows {
        match status {
            OrderStatus::Pending => counts.pending = n,
            OrderStatus::InProgress => counts.in_progress = n,
            OrderStatus::Completed => counts.completed = n,
        }
        counts.total += n;
    }
    Ok(counts)
}

/// Distinct customer names, alphabetical
pub async fn customer_names(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT customer_name FROM orders ORDER BY customer_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Most recent orders whose customer name contains `name`
pub async fn customer_history(pool: &SqlitePool, name: &str, limit: i64) -> RepoResult<Vec<Order>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM orders WHERE customer_name LIKE "
    ));
    qb.push_bind(format!("%{}%", escape_like(name)))
        .push(" ESCAPE '\\'");
    OrderSort::Newest.push_order_by(&mut qb);
    qb.push(" LIMIT ").push_bind(limit);

    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    fn sample(name: &str, drink: &str) -> OrderInsert {
        OrderInsert {
            customer_name: name.to_string(),
            drink: drink.to_string(),
            milk: "Oat".to_string(),
            syrup: None,
            foam: Some("Extra Foam".to_string()),
            temperature: Temperature::Hot,
            extra_shot: false,
            notes: String::new(),
            price: 4.0,
        }
    }

    /// Pin created_at so ordering tests do not depend on the clock
    async fn set_created_at(pool: &SqlitePool, id: i64, created_at: i64) {
        sqlx::query("UPDATE orders SET created_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[test]
    fn test_status_rank_sql_follows_enum_rank() {
        let mut qb = QueryBuilder::<Sqlite>::new("");
        push_status_rank(&mut qb);
        assert_eq!(
            qb.sql(),
            "CASE status WHEN 'pending' THEN 1 WHEN 'in_progress' THEN 2 WHEN 'completed' THEN 3 END"
        );
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = test_pool().await;
        let order = insert(&pool, sample("Ada", "Latte")).await.unwrap();

        assert!(order.id > 0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.syrup, None);
        assert_eq!(order.foam.as_deref(), Some("Extra Foam"));
        assert!(order.created_at > 0);

        let found = find_by_id(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(found, order);
        assert!(find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let pool = test_pool().await;
        let first = insert(&pool, sample("Ada", "Latte")).await.unwrap();
        assert!(delete(&pool, first.id).await.unwrap());
        assert!(!delete(&pool, first.id).await.unwrap());

        let second = insert(&pool, sample("Bob", "Coffee")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_update_status() {
        let pool = test_pool().await;
        let order = insert(&pool, sample("Ada", "Latte")).await.unwrap();

        let updated = update_status(&pool, order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.created_at, order.created_at);
        assert_eq!(updated.price, order.price);

        // Back to pending is allowed
        let reopened = update_status(&pool, order.id, OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reopened.status, OrderStatus::Pending);

        let err = update_status(&pool, 999, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_rank_then_newest() {
        let pool = test_pool().await;
        let a = insert(&pool, sample("A", "Latte")).await.unwrap();
        let b = insert(&pool, sample("B", "Latte")).await.unwrap();
        let c = insert(&pool, sample("C", "Latte")).await.unwrap();
        set_created_at(&pool, a.id, 1_000).await;
        set_created_at(&pool, b.id, 2_000).await;
        set_created_at(&pool, c.id, 3_000).await;
        update_status(&pool, c.id, OrderStatus::InProgress).await.unwrap();

        let orders = list(&pool, &OrderQuery::default()).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);

        let board = list(
            &pool,
            &OrderQuery {
                sort: OrderSort::RankOldest,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<i64> = board.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let pool = test_pool().await;
        let a = insert(&pool, sample("A", "Latte")).await.unwrap();
        let b = insert(&pool, sample("B", "Latte")).await.unwrap();
        insert(&pool, sample("C", "Latte")).await.unwrap();
        update_status(&pool, a.id, OrderStatus::Completed).await.unwrap();
        update_status(&pool, b.id, OrderStatus::InProgress).await.unwrap();

        let completed = list(
            &pool,
            &OrderQuery {
                statuses: vec![OrderStatus::Completed],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a.id);

        let active = list(
            &pool,
            &OrderQuery {
                statuses: vec![OrderStatus::Pending, OrderStatus::InProgress],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|o| o.status.is_active()));
    }

    #[tokio::test]
    async fn test_list_search_escapes_wildcards() {
        let pool = test_pool().await;
        insert(&pool, sample("Ada", "Latte")).await.unwrap();
        let mut with_note = sample("Bob", "Coffee");
        with_note.notes = "100% oat".to_string();
        insert(&pool, with_note).await.unwrap();

        let by_name = list(
            &pool,
            &OrderQuery {
                search: Some("ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].customer_name, "Ada");

        let by_drink = list(
            &pool,
            &OrderQuery {
                search: Some("Coff".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_drink.len(), 1);

        // '%' is literal, not a wildcard
        let literal = list(
            &pool,
            &OrderQuery {
                search: Some("0%".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].customer_name, "Bob");

        let injection = list(
            &pool,
            &OrderQuery {
                search: Some("' OR 1=1 --".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(injection.is_empty());
    }

    #[tokio::test]
    async fn test_counts() {
        let pool = test_pool().await;
        assert_eq!(counts(&pool).await.unwrap(), StatusCounts::default());

        let a = insert(&pool, sample("A", "Latte")).await.unwrap();
        insert(&pool, sample("B", "Latte")).await.unwrap();
        update_status(&pool, a.id, OrderStatus::Completed).await.unwrap();

        let c = counts(&pool).await.unwrap();
        assert_eq!(
            c,
            StatusCounts {
                pending: 1,
                in_progress: 0,
                completed: 1,
                total: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_customers_and_history() {
        let pool = test_pool().await;
        for i in 0..12 {
            let order = insert(&pool, sample("Ada", "Latte")).await.unwrap();
            set_created_at(&pool, order.id, 1_000 + i).await;
        }
        insert(&pool, sample("Bob", "Coffee")).await.unwrap();

        assert_eq!(customer_names(&pool).await.unwrap(), vec!["Ada", "Bob"]);

        let history = customer_history(&pool, "Ada", 10).await.unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(history.iter().all(|o| o.customer_name == "Ada"));
    }
}
