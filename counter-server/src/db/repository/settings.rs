//! Settings Repository (key/value)
//!
//! Holds the wait-time thresholds. Values are stored as text.

use super::{RepoError, RepoResult};
use shared::models::WaitTimeThresholds;
use sqlx::SqlitePool;

pub const YELLOW_THRESHOLD_KEY: &str = "wait_time_yellow_threshold";
pub const RED_THRESHOLD_KEY: &str = "wait_time_red_threshold";

/// Insert default thresholds for any missing key
pub async fn ensure_defaults(pool: &SqlitePool) -> RepoResult<()> {
    let defaults = WaitTimeThresholds::default();
    let now = shared::util::now_millis();
    for (key, value) in [
        (YELLOW_THRESHOLD_KEY, defaults.yellow),
        (RED_THRESHOLD_KEY, defaults.red),
    ] {
        sqlx::query(
            "INSERT OR IGNORE INTO settings (setting_key, setting_value, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(key)
        .bind(value.to_string())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn get_value(pool: &SqlitePool, key: &str) -> RepoResult<Option<String>> {
    let value = sqlx::query_scalar::<_, String>(
        "SELECT setting_value FROM settings WHERE setting_key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(value)
}

fn parse_minutes(key: &str, raw: Option<String>, default: u32) -> RepoResult<u32> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| RepoError::Validation(format!("Setting {key} is not an integer: {value}"))),
        None => Ok(default),
    }
}

/// Current thresholds; missing keys fall back to the defaults
pub async fn get_thresholds(pool: &SqlitePool) -> RepoResult<WaitTimeThresholds> {
    let defaults = WaitTimeThresholds::default();
    let yellow = parse_minutes(
        YELLOW_THRESHOLD_KEY,
        get_value(pool, YELLOW_THRESHOLD_KEY).await?,
        defaults.yellow,
    )?;
    let red = parse_minutes(
        RED_THRESHOLD_KEY,
        get_value(pool, RED_THRESHOLD_KEY).await?,
        defaults.red,
    )?;
    Ok(WaitTimeThresholds { yellow, red })
}

/// Write both thresholds in one transaction
pub async fn update_thresholds(pool: &SqlitePool, thresholds: WaitTimeThresholds) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    for (key, value) in [
        (YELLOW_THRESHOLD_KEY, thresholds.yellow),
        (RED_THRESHOLD_KEY, thresholds.red),
    ] {
        sqlx::query(
            "INSERT INTO settings (setting_key, setting_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
             ON CONFLICT(setting_key) DO UPDATE SET setting_value = excluded.setting_value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
