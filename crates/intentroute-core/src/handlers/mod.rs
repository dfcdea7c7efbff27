//! Intent handlers and dispatch.
//!
//! Handlers are deterministic lookups. The router decides which one runs;
//! anything it cannot route gets a fixed apology.

mod faq;
mod order;
pub mod patterns;

pub use faq::{FaqHandler, FAQ_FALLBACK};
pub use order::{OrderHandler, ORDER_ID_PROMPT};

use crate::types::{Label, RouteOutcome};

/// Response for queries that could not be routed.
pub const UNROUTABLE_RESPONSE: &str =
    "I'm having trouble understanding your request. Please try again.";

/// A handler answers a query already routed to its intent.
pub trait IntentHandler: Send + Sync {
    fn handle(&self, query: &str) -> String;
}

/// Sends a routed query to the matching handler.
pub struct Dispatcher {
    faq: Box<dyn IntentHandler>,
    order: Box<dyn IntentHandler>,
}

impl Dispatcher {
    pub fn new(faq: Box<dyn IntentHandler>, order: Box<dyn IntentHandler>) -> Self {
        Self { faq, order }
    }

    /// Produce the reply for a query given its routing outcome.
    pub fn respond(&self, outcome: &RouteOutcome, query: &str) -> String {
        match outcome.label() {
            Some(Label::Faq) => self.faq.handle(query),
            Some(Label::Order) => self.order.handle(query),
            Some(Label::Error) | None => UNROUTABLE_RESPONSE.to_string(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Box::new(FaqHandler::new()), Box::new(OrderHandler::new()))
    }
}
