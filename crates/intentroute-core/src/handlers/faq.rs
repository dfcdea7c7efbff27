//! FAQ handler: keyword lookup against a small knowledge base.

use super::IntentHandler;

/// Answer given when no keyword matches.
pub const FAQ_FALLBACK: &str = "I'm sorry, I don't have information on that topic in my FAQ.";

/// Keyword to answer, checked in order. The first keyword contained in the
/// lowercased query wins.
const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    ("return", "You can return items within 30 days of purchase."),
    ("shipping", "Shipping usually takes 3-5 business days."),
    ("hours", "We are open Mon-Fri from 9 AM to 5 PM."),
    ("location", "We are located at 123 Tech Avenue."),
];

#[derive(Debug, Clone)]
pub struct FaqHandler {
    knowledge_base: Vec<(String, String)>,
}

impl FaqHandler {
    pub fn new() -> Self {
        Self::with_entries(
            KNOWLEDGE_BASE
                .iter()
                .map(|(k, a)| (k.to_string(), a.to_string())),
        )
    }

    /// Build a handler from custom `(keyword, answer)` pairs.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            knowledge_base: entries
                .into_iter()
                .map(|(k, a)| (k.to_lowercase(), a))
                .collect(),
        }
    }
}

impl Default for FaqHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentHandler for FaqHandler {
    fn handle(&self, query: &str) -> String {
        let query_lower = query.to_lowercase();
        self.knowledge_base
            .iter()
            .find(|(keyword, _)| query_lower.contains(keyword.as_str()))
            .map(|(_, answer)| answer.clone())
            .unwrap_or_else(|| FAQ_FALLBACK.to_string())
    }
}
