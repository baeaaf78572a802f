//! Live-State Synchronizer
//!
//! Polling clients send back the fingerprint of their last snapshot. When
//! nothing changed the server answers with [`LiveOutcome::NotModified`] and
//! skips the payload.
//!
//! The fingerprint hashes the serde encoding of each [`Order`] (stored fields
//! only, declaration order) and the status counts. The payload embeds the
//! same `Order` encoding, flattened into `OrderView`, so the two cannot drift.
//! Wait time and tier are excluded: they change every minute without any
//! mutation.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use shared::models::{LiveSnapshot, Order, OrderStatus, StatusCounts};
use sqlx::SqlitePool;

use super::wait_time::WaitTimePolicy;
use crate::db::repository::order::{self, OrderQuery, OrderSort};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Which orders a live view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiveFilter {
    /// Pending and in-progress
    #[default]
    Active,
    All,
    Status(OrderStatus),
}

impl LiveFilter {
    /// Missing or blank means [`LiveFilter::Active`]
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Active),
            Some(token) => token.parse(),
        }
    }

    pub fn statuses(&self) -> Vec<OrderStatus> {
        match self {
            Self::Active => vec![OrderStatus::Pending, OrderStatus::InProgress],
            Self::All => Vec::new(),
            Self::Status(status) => vec![*status],
        }
    }
}

impl FromStr for LiveFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "all" => Ok(Self::All),
            other => other.parse::<OrderStatus>().map(Self::Status).map_err(|_| {
                let mut err = AppError::invalid_field(
                    "status",
                    format!(
                        "'{other}' is not one of active, all, pending, in_progress, completed"
                    ),
                );
                err.code = ErrorCode::InvalidOrderStatus;
                err
            }),
        }
    }
}

impl fmt::Display for LiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::All => f.write_str("all"),
            Self::Status(status) => f.write_str(status.as_str()),
        }
    }
}

/// Result of a conditional snapshot read
#[derive(Debug, Clone)]
pub enum LiveOutcome {
    NotModified { fingerprint: String },
    Changed(LiveSnapshot),
}

impl LiveOutcome {
    pub fn fingerprint(&self) -> &str {
        match self {
            Self::NotModified { fingerprint } => fingerprint,
            Self::Changed(snapshot) => &snapshot.fingerprint,
        }
    }
}

/// Stable digest of a filtered order list plus counts
///
/// First 16 bytes of SHA-256, hex encoded.
pub fn fingerprint(orders: &[Order], counts: &StatusCounts) -> AppResult<String> {
    let mut hasher = Sha256::new();
    for order in orders {
        let encoded = serde_json::to_vec(order)
            .map_err(|e| AppError::internal(format!("Failed to encode order: {e}")))?;
        hasher.update(&encoded);
        hasher.update(b"\n");
    }
    let encoded = serde_json::to_vec(counts)
        .map_err(|e| AppError::internal(format!("Failed to encode counts: {e}")))?;
    hasher.update(&encoded);

    let result = hasher.finalize();
    Ok(hex::encode(&result[..16]))
}

/// Conditional snapshot reads over the order store
#[derive(Clone)]
pub struct LiveSync {
    pool: SqlitePool,
    policy: WaitTimePolicy,
}

impl LiveSync {
    pub fn new(pool: SqlitePool, policy: WaitTimePolicy) -> Self {
        Self { pool, policy }
    }

    /// Filtered list ordered by status rank, newest first within a status
    pub async fn snapshot(
        &self,
        filter: LiveFilter,
        client_fingerprint: Option<&str>,
        now_ms: i64,
    ) -> AppResult<LiveOutcome> {
        let query = OrderQuery {
            statuses: filter.statuses(),
            sort: OrderSort::RankNewest,
            ..Default::default()
        };
        self.read(&query, client_fingerprint, now_ms).await
    }

    /// Board view: active orders, oldest first within a status
    pub async fn queue_snapshot(
        &self,
        client_fingerprint: Option<&str>,
        now_ms: i64,
    ) -> AppResult<LiveOutcome> {
        let query = OrderQuery {
            statuses: LiveFilter::Active.statuses(),
            sort: OrderSort::RankOldest,
            ..Default::default()
        };
        self.read(&query, client_fingerprint, now_ms).await
    }

    async fn read(
        &self,
        query: &OrderQuery,
        client_fingerprint: Option<&str>,
        now_ms: i64,
    ) -> AppResult<LiveOutcome> {
        let orders = order::list(&self.pool, query).await?;
        let counts = order::counts(&self.pool).await?;
        let fingerprint = fingerprint(&orders, &counts)?;

        if client_fingerprint == Some(fingerprint.as_str()) {
            tracing::trace!(%fingerprint, "Live state unchanged");
            return Ok(LiveOutcome::NotModified { fingerprint });
        }

        Ok(LiveOutcome::Changed(LiveSnapshot {
            orders: self.policy.views(orders, now_ms),
            counts,
            fingerprint,
            timestamp: now_ms,
        }))
    }
}
