//! Shared detection patterns for handlers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A standalone three-digit order number ("order 101", "#102").
    pub static ref ORDER_ID_PATTERN: Regex = Regex::new(r"\b\d{3}\b").unwrap();
}

/// Extract the first order number mentioned in a query.
pub fn find_order_id(query: &str) -> Option<&str> {
    ORDER_ID_PATTERN.find(query).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_standalone_three_digits() {
        assert_eq!(find_order_id("Where is my order 101?"), Some("101"));
        assert_eq!(find_order_id("order #102 please"), Some("102"));
    }

    #[test]
    fn test_ignores_longer_numbers() {
        assert_eq!(find_order_id("My order 12345 is late"), None);
        assert_eq!(find_order_id("Call 5551234"), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(find_order_id("Orders 103 and 101"), Some("103"));
    }
}
