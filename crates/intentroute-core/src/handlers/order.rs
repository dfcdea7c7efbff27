//! Order-status handler: order number lookup against a static table.

use std::collections::BTreeMap;

use super::patterns::find_order_id;
use super::IntentHandler;

pub const ORDER_ID_PROMPT: &str = "Please provide a valid 3-digit order number (e.g., 101).";

#[derive(Debug, Clone)]
pub struct OrderHandler {
    orders: BTreeMap<String, String>,
}

impl OrderHandler {
    pub fn new() -> Self {
        Self::with_orders([
            ("101", "Shipped - Arriving Tomorrow"),
            ("102", "Processing - Packing in progress"),
            ("103", "Delivered - Left at front porch"),
        ])
    }

    pub fn with_orders<K, V>(orders: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            orders: orders
                .into_iter()
                .map(|(id, status)| (id.into(), status.into()))
                .collect(),
        }
    }

    /// Status of a known order.
    pub fn status(&self, order_id: &str) -> Option<&str> {
        self.orders.get(order_id).map(String::as_str)
    }
}

impl Default for OrderHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentHandler for OrderHandler {
    fn handle(&self, query: &str) -> String {
        match find_order_id(query) {
            Some(order_id) => match self.status(order_id) {
                Some(status) => format!("Order #{} status: {}", order_id, status),
                None => format!("Order #{} not found.", order_id),
            },
            None => ORDER_ID_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_order() {
        let orders = OrderHandler::new();
        assert_eq!(
            orders.handle("Where is my order 101?"),
            "Order #101 status: Shipped - Arriving Tomorrow"
        );
    }

    #[test]
    fn test_unknown_order() {
        let orders = OrderHandler::new();
        assert_eq!(orders.handle("Track order 999"), "Order #999 not found.");
    }

    #[test]
    fn test_missing_order_number() {
        let orders = OrderHandler::new();
        assert_eq!(orders.handle("Where is my package?"), ORDER_ID_PROMPT);
    }
}
