//! Menu Catalog - menu items with in-memory caching
//!
//! The cache is loaded at boot (`warmup`) and reloaded after every add,
//! update and delete. Readers never touch the database. Mutations hold
//! `write_lock` across the write and the reload, so a slower reload can
//! never overwrite a newer one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::models::{MenuGroups, MenuItem, MenuItemCreate, MenuItemType, MenuItemUpdate};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, menu_item};
use crate::orders::money::{round_money, to_decimal, to_f64};
use crate::utils::validation::{validate_item_type, validate_menu_item_name, validate_price};
use crate::utils::{AppError, AppResult};

/// Menu catalog with cached items
#[derive(Clone)]
pub struct MenuCatalog {
    pool: SqlitePool,
    /// id -> item
    items: Arc<RwLock<HashMap<i64, MenuItem>>>,
    /// Serializes mutate + refresh
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl std::fmt::Debug for MenuCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuCatalog")
            .field("items_count", &self.items.read().len())
            .finish()
    }
}

impl MenuCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            items: Arc::new(RwLock::new(HashMap::new())),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    // =========================================================================
    // Warmup
    // =========================================================================

    /// Seed an empty catalog, then load everything into the cache
    pub async fn warmup(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        menu_item::seed_defaults_if_empty(&self.pool).await?;
        self.reload().await
    }

    /// Reload the cache from the store
    pub async fn refresh(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.reload().await
    }

    /// Caller holds `write_lock`
    async fn reload(&self) -> AppResult<()> {
        let items = menu_item::find_all(&self.pool).await?;
        let count = items.len();
        let fresh: HashMap<i64, MenuItem> = items.into_iter().map(|i| (i.id, i)).collect();
        *self.items.write() = fresh;
        tracing::debug!(count, "Menu catalog refreshed");
        Ok(())
    }

    // =========================================================================
    // Reads (cache only)
    // =========================================================================

    /// Current price of a drink, if the drink exists and has a price
    pub fn drink_price(&self, name: &str) -> Option<Decimal> {
        self.items
            .read()
            .values()
            .find(|i| i.item_type == MenuItemType::Drink && i.item_name == name)
            .and_then(|i| i.price)
            .map(|p| round_money(to_decimal(p)))
    }

    /// Items of one type, sorted by name
    pub fn items(&self, item_type: MenuItemType) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = self
            .items
            .read()
            .values()
            .filter(|i| i.item_type == item_type)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_name.cmp(&b.item_name).then(a.id.cmp(&b.id)));
        items
    }

    pub fn grouped(&self) -> MenuGroups {
        MenuGroups {
            drinks: self.items(MenuItemType::Drink),
            milks: self.items(MenuItemType::Milk),
            syrups: self.items(MenuItemType::Syrup),
            foams: self.items(MenuItemType::Foam),
        }
    }

    pub fn get(&self, id: i64) -> AppResult<MenuItem> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::menu_item_not_found(id))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn add(&self, data: MenuItemCreate) -> AppResult<MenuItem> {
        let item_type = validate_item_type(&data.item_type)?;
        let item_name = validate_menu_item_name("item_name", &data.item_name)?;
        let price = data.price.map(validated_price).transpose()?;

        let _guard = self.write_lock.lock().await;
        let item = menu_item::create(&self.pool, item_type, &item_name, price)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::menu_item_exists(item_type.as_str(), &item_name),
                other => other.into(),
            })?;
        self.reload().await?;

        tracing::info!(id = item.id, item_type = %item.item_type, name = %item.item_name, "Menu item added");
        Ok(item)
    }

    /// Rename, and reprice when a price is given. Existing orders keep their price.
    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> AppResult<MenuItem> {
        let item_name = validate_menu_item_name("item_name", &data.item_name)?;
        let price = data.price.map(validated_price).transpose()?;

        let _guard = self.write_lock.lock().await;
        let current = menu_item::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::menu_item_not_found(id))?;

        let item = menu_item::update(&self.pool, id, &item_name, price)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::menu_item_not_found(id),
                RepoError::Duplicate(_) => {
                    AppError::menu_item_exists(current.item_type.as_str(), &item_name)
                }
                other => other.into(),
            })?;
        self.reload().await?;

        tracing::info!(id, name = %item.item_name, price = ?item.price, "Menu item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        if !menu_item::delete(&self.pool, id).await? {
            return Err(AppError::menu_item_not_found(id));
        }
        self.reload().await?;

        tracing::info!(id, "Menu item deleted");
        Ok(())
    }
}

fn validated_price(raw: f64) -> AppResult<f64> {
    validate_price(raw).map(to_f64)
}
