//! Settings Model (wait-time thresholds)

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_YELLOW_THRESHOLD: u32 = 5;
pub const DEFAULT_RED_THRESHOLD: u32 = 10;

/// Wait-time severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitTier {
    Normal,
    Warning,
    Critical,
}

/// Wait-time thresholds in minutes. Invariant: `0 < yellow < red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeThresholds {
    pub yellow: u32,
    pub red: u32,
}

impl Default for WaitTimeThresholds {
    fn default() -> Self {
        Self {
            yellow: DEFAULT_YELLOW_THRESHOLD,
            red: DEFAULT_RED_THRESHOLD,
        }
    }
}

impl WaitTimeThresholds {
    /// Build thresholds from raw values, enforcing positivity and ordering
    pub fn try_new(yellow: i64, red: i64) -> AppResult<Self> {
        if yellow < 1 || red < 1 {
            return Err(AppError::invalid_thresholds("Thresholds must be positive")
                .with_detail("yellow", yellow)
                .with_detail("red", red));
        }
        if yellow >= red {
            return Err(AppError::invalid_thresholds(
                "Yellow threshold must be less than red threshold",
            )
            .with_detail("yellow", yellow)
            .with_detail("red", red));
        }
        let yellow = u32::try_from(yellow)
            .map_err(|_| AppError::invalid_thresholds("Yellow threshold is too large"))?;
        let red = u32::try_from(red)
            .map_err(|_| AppError::invalid_thresholds("Red threshold is too large"))?;
        Ok(Self { yellow, red })
    }
}

/// Update thresholds payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsUpdate {
    pub yellow_threshold: i64,
    pub red_threshold: i64,
}
