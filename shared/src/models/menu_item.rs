//! Menu Item Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Menu option group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MenuItemType {
    Drink,
    Milk,
    Syrup,
    Foam,
}

impl MenuItemType {
    pub const ALL: [MenuItemType; 4] = [Self::Drink, Self::Milk, Self::Syrup, Self::Foam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drink => "drink",
            Self::Milk => "milk",
            Self::Syrup => "syrup",
            Self::Foam => "foam",
        }
    }
}

impl fmt::Display for MenuItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drink" => Ok(Self::Drink),
            "milk" => Ok(Self::Milk),
            "syrup" => Ok(Self::Syrup),
            "foam" => Ok(Self::Foam),
            other => Err(format!(
                "'{}' is not one of drink, milk, syrup, foam",
                other
            )),
        }
    }
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub item_type: MenuItemType,
    pub item_name: String,
    /// Only meaningful for drinks
    pub price: Option<f64>,
    pub created_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub item_type: String,
    pub item_name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Update menu item payload: rename, and reprice when `price` is present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub item_name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Menu items grouped by type, each group sorted by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuGroups {
    pub drinks: Vec<MenuItem>,
    pub milks: Vec<MenuItem>,
    pub syrups: Vec<MenuItem>,
    pub foams: Vec<MenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_roundtrip_tokens() {
        for t in MenuItemType::ALL {
            assert_eq!(t.as_str().parse::<MenuItemType>(), Ok(t));
        }
        assert!("topping".parse::<MenuItemType>().is_err());
    }

    #[test]
    fn test_item_type_serde_lowercase() {
        let json = serde_json::to_string(&MenuItemType::Syrup).unwrap();
        assert_eq!(json, "\"syrup\"");
    }
}
