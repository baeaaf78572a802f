//! Input validation helpers
//!
//! Every text value that reaches the store passes through one of these
//! functions first. Each returns the sanitized value or a validation
//! [`AppError`] whose details name the offending field.
//!
//! Sanitization: strip control characters and `<` / `>`, collapse runs of
//! whitespace to one space, trim both ends.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use shared::error::ErrorCode;
use shared::models::{MenuItemType, OrderStatus, Temperature};

use crate::orders::money::round_money;
use crate::utils::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Customer names (printed on a 3" label)
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Menu item names: drink, milk, syrup, foam
pub const MAX_MENU_ITEM_NAME_LEN: usize = 50;

/// Order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Search queries
pub const MAX_SEARCH_LEN: usize = 100;

/// Highest accepted menu price
pub const MAX_PRICE: f64 = 1000.0;

// ── Sanitization ────────────────────────────────────────────────────

/// Strip control characters and angle brackets, collapse whitespace, trim.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control() && *c != '<' && *c != '>')
        .collect::<String>()
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn field_error(code: ErrorCode, field: &str, reason: impl Into<String>) -> AppError {
    let mut err = AppError::invalid_field(field, reason);
    err.code = code;
    err
}

fn check_required(value: String, field: &str, max_len: usize) -> AppResult<String> {
    if value.is_empty() {
        return Err(AppError::invalid_field(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::invalid_field(
            field,
            format!("is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(value)
}

// ── Field validators ────────────────────────────────────────────────

/// Customer name: required, letters / digits / spaces and `-'.&` only.
pub fn validate_customer_name(raw: &str) -> AppResult<String> {
    let name = check_required(sanitize(raw), "customer_name", MAX_CUSTOMER_NAME_LEN)?;
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '.' | '&')))
    {
        return Err(AppError::invalid_field(
            "customer_name",
            format!("contains invalid character '{bad}'"),
        ));
    }
    Ok(name)
}

/// Required menu item name (drink, milk, or the name of a catalog entry).
pub fn validate_menu_item_name(field: &str, raw: &str) -> AppResult<String> {
    check_required(sanitize(raw), field, MAX_MENU_ITEM_NAME_LEN)
}

/// Optional menu item name (syrup, foam). Blank means "not chosen".
pub fn validate_optional_menu_item(field: &str, raw: Option<&str>) -> AppResult<Option<String>> {
    match raw.map(sanitize) {
        Some(value) if !value.is_empty() => {
            check_required(value, field, MAX_MENU_ITEM_NAME_LEN).map(Some)
        }
        _ => Ok(None),
    }
}

/// Free-text notes. May be empty.
pub fn validate_notes(raw: Option<&str>) -> AppResult<String> {
    let notes = raw.map(sanitize).unwrap_or_default();
    let len = notes.chars().count();
    if len > MAX_NOTE_LEN {
        return Err(AppError::invalid_field(
            "notes",
            format!("is too long ({len} chars, max {MAX_NOTE_LEN})"),
        ));
    }
    Ok(notes)
}

/// Search query. Blank means "no search".
pub fn validate_search_query(raw: Option<&str>) -> AppResult<Option<String>> {
    match raw.map(sanitize) {
        Some(query) if !query.is_empty() => {
            let len = query.chars().count();
            if len > MAX_SEARCH_LEN {
                return Err(AppError::invalid_field(
                    "search",
                    format!("is too long ({len} chars, max {MAX_SEARCH_LEN})"),
                ));
            }
            Ok(Some(query))
        }
        _ => Ok(None),
    }
}

/// Status token: exactly one of `pending`, `in_progress`, `completed`.
pub fn validate_status(raw: &str) -> AppResult<OrderStatus> {
    raw.trim()
        .parse()
        .map_err(|reason: String| field_error(ErrorCode::InvalidOrderStatus, "status", reason))
}

/// Temperature token: `Hot` or `Iced`.
pub fn validate_temperature(raw: &str) -> AppResult<Temperature> {
    raw.trim().parse().map_err(|reason: String| {
        field_error(ErrorCode::InvalidTemperature, "temperature", reason)
    })
}

/// Menu item type token.
pub fn validate_item_type(raw: &str) -> AppResult<MenuItemType> {
    raw.trim()
        .parse()
        .map_err(|reason: String| field_error(ErrorCode::InvalidItemType, "item_type", reason))
}

/// Menu price: finite, `0 <= price <= MAX_PRICE`, rounded to cents.
pub fn validate_price(value: f64) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(field_error(
            ErrorCode::InvalidPrice,
            "price",
            "must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(field_error(ErrorCode::InvalidPrice, "price", "must not be negative"));
    }
    if value > MAX_PRICE {
        return Err(field_error(
            ErrorCode::InvalidPrice,
            "price",
            format!("must not exceed {MAX_PRICE}"),
        ));
    }
    Decimal::from_f64(value)
        .map(round_money)
        .ok_or_else(|| field_error(ErrorCode::InvalidPrice, "price", "is not representable"))
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  Ada   Lovelace "), "Ada Lovelace");
        assert_eq!(sanitize("<b>Bob</b>"), "bBob/b");
        assert_eq!(sanitize("line\nbreak\ttab"), "line break tab");
        assert_eq!(sanitize("nul\u{0}byte"), "nulbyte");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn test_customer_name() {
        assert_eq!(validate_customer_name(" Ada ").unwrap(), "Ada");
        assert_eq!(validate_customer_name("O'Brien-Smith").unwrap(), "O'Brien-Smith");
        assert_eq!(validate_customer_name("José").unwrap(), "José");

        let err = validate_customer_name("   ").unwrap_err();
        assert_eq!(err.field(), Some("customer_name"));
        assert_eq!(err.message, "Invalid customer name: must not be empty");

        let err = validate_customer_name("Robert'); DROP TABLE orders;--").unwrap_err();
        assert_eq!(err.field(), Some("customer_name"));

        let long = "a".repeat(MAX_CUSTOMER_NAME_LEN + 1);
        assert!(validate_customer_name(&long).is_err());
    }

    #[test]
    fn test_menu_item_names() {
        assert_eq!(validate_menu_item_name("drink", "Latte").unwrap(), "Latte");
        let err = validate_menu_item_name("milk", "").unwrap_err();
        assert_eq!(err.field(), Some("milk"));

        assert_eq!(validate_optional_menu_item("syrup", None).unwrap(), None);
        assert_eq!(validate_optional_menu_item("syrup", Some("  ")).unwrap(), None);
        assert_eq!(
            validate_optional_menu_item("foam", Some("Extra Foam")).unwrap(),
            Some("Extra Foam".to_string())
        );
        let long = "x".repeat(MAX_MENU_ITEM_NAME_LEN + 1);
        let err = validate_optional_menu_item("foam", Some(&long)).unwrap_err();
        assert_eq!(err.field(), Some("foam"));
    }

    #[test]
    fn test_notes() {
        assert_eq!(validate_notes(None).unwrap(), "");
        assert_eq!(validate_notes(Some(" extra hot ")).unwrap(), "extra hot");
        let long = "n".repeat(MAX_NOTE_LEN + 1);
        assert_eq!(validate_notes(Some(&long)).unwrap_err().field(), Some("notes"));
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(validate_status("pending").unwrap(), OrderStatus::Pending);
        assert_eq!(validate_status(" in_progress ").unwrap(), OrderStatus::InProgress);
        let err = validate_status("done").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
        assert_eq!(err.field(), Some("status"));
    }

    #[test]
    fn test_temperature_and_item_type() {
        assert_eq!(validate_temperature("Hot").unwrap(), Temperature::Hot);
        assert_eq!(
            validate_temperature("lukewarm").unwrap_err().code,
            ErrorCode::InvalidTemperature
        );
        assert_eq!(validate_item_type("foam").unwrap(), MenuItemType::Foam);
        assert_eq!(
            validate_item_type("cup").unwrap_err().code,
            ErrorCode::InvalidItemType
        );
    }

    #[test]
    fn test_price() {
        assert_eq!(validate_price(4.0).unwrap(), Decimal::new(400, 2));
        assert_eq!(validate_price(3.456).unwrap(), Decimal::new(346, 2));
        assert_eq!(validate_price(-1.0).unwrap_err().code, ErrorCode::InvalidPrice);
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(MAX_PRICE + 0.01).is_err());
    }

    #[test]
    fn test_search_and_escape_like() {
        assert_eq!(validate_search_query(Some("")).unwrap(), None);
        assert_eq!(validate_search_query(Some(" Ada ")).unwrap(), Some("Ada".into()));
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
