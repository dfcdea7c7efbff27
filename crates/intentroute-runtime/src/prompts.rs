//! Prompts sent to the classification oracle.
//!
//! The instruction text is part of the routing contract: downstream
//! dispatch only understands the bare labels `FAQ` and `ORDER`, so the
//! oracle must be told to answer with nothing else.

/// System instruction given to every provider.
pub const SYSTEM_INSTRUCTION: &str = "You are an intelligent router for a customer service bot.
Classify the user's query into exactly one of these two intents:
1. FAQ_INTENT (General questions about returns, shipping, hours, location)
2. ORDER_INTENT (Specific questions asking about an order status, where is my package, etc.)

Output ONLY the label 'FAQ' or 'ORDER'. Do not add punctuation or explanation.";

/// Fold the instruction and the query into one prompt, for providers that
/// take a single user turn.
pub fn single_prompt(instruction: &str, query: &str) -> String {
    format!("{}\n\nUser query: {}", instruction, query)
}
