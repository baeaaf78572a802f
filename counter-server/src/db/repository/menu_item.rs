//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemType};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, item_type, item_name, price, created_at";

/// Catalog rows written on first start (empty table only)
const DEFAULT_ITEMS: &[(MenuItemType, &str, Option<f64>)] = &[
    (MenuItemType::Drink, "Latte", Some(4.0)),
    (MenuItemType::Drink, "Coffee", Some(3.0)),
    (MenuItemType::Milk, "Whole", None),
    (MenuItemType::Milk, "Oat", None),
    (MenuItemType::Milk, "Almond", None),
    (MenuItemType::Milk, "None", None),
    (MenuItemType::Syrup, "Vanilla", None),
    (MenuItemType::Syrup, "Caramel", None),
    (MenuItemType::Syrup, "Hazelnut", None),
    (MenuItemType::Syrup, "None", None),
    (MenuItemType::Foam, "Regular", None),
    (MenuItemType::Foam, "Extra Foam", None),
    (MenuItemType::Foam, "No Foam", None),
];

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item ORDER BY item_type, item_name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn find_by_type_and_name(
    pool: &SqlitePool,
    item_type: MenuItemType,
    item_name: &str,
) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_item WHERE item_type = ? AND item_name = ? LIMIT 1"
    ))
    .bind(item_type)
    .bind(item_name)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

fn duplicate(item_type: MenuItemType, item_name: &str) -> RepoError {
    RepoError::Duplicate(format!("{item_type} '{item_name}' already exists"))
}

pub async fn create(
    pool: &SqlitePool,
    item_type: MenuItemType,
    item_name: &str,
    price: Option<f64>,
) -> RepoResult<MenuItem> {
    if find_by_type_and_name(pool, item_type, item_name)
        .await?
        .is_some()
    {
        return Err(duplicate(item_type, item_name));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_item (item_type, item_name, price, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(item_type)
    .bind(item_name)
    .bind(price)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Rename, and reprice when `price` is `Some`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    item_name: &str,
    price: Option<f64>,
) -> RepoResult<MenuItem> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))?;

    if let Some(existing) = find_by_type_and_name(pool, current.item_type, item_name).await?
        && existing.id != id
    {
        return Err(duplicate(current.item_type, item_name));
    }

    let rows = sqlx::query(
        "UPDATE menu_item SET item_name = ?1, price = COALESCE(?2, price) WHERE id = ?3",
    )
    .bind(item_name)
    .bind(price)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Delete. Returns false when no such item existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Insert the default catalog when the table is empty. Returns rows written.
pub async fn seed_defaults_if_empty(pool: &SqlitePool) -> RepoResult<usize> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menu_item")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    for (item_type, item_name, price) in DEFAULT_ITEMS {
        sqlx::query(
            "INSERT INTO menu_item (item_type, item_name, price, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(*item_type)
        .bind(*item_name)
        .bind(*price)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(count = DEFAULT_ITEMS.len(), "Seeded default menu");
    Ok(DEFAULT_ITEMS.len())
}
