//! The built-in labeled query set.

use crate::types::Label;

pub(super) const BUILTIN_CASES: &[(&str, Label)] = &[
    // Returns
    ("What is your return policy?", Label::Faq),
    ("Can I return an item after 30 days?", Label::Faq),
    ("How do I return something?", Label::Faq),
    ("Do you accept returns on sale items?", Label::Faq),
    // Shipping
    ("How long does shipping take?", Label::Faq),
    ("What are your shipping options?", Label::Faq),
    ("Do you offer free shipping?", Label::Faq),
    ("How much does delivery cost?", Label::Faq),
    // Hours
    ("What are your store hours?", Label::Faq),
    ("When do you open?", Label::Faq),
    ("Are you open on weekends?", Label::Faq),
    ("What time do you close?", Label::Faq),
    // Location
    ("Where is your store located?", Label::Faq),
    ("What's your address?", Label::Faq),
    ("Do you have a physical store?", Label::Faq),
    // Order status with an order number
    ("Where is my order 101?", Label::Order),
    ("What's the status of order 102?", Label::Order),
    ("Track my order 103", Label::Order),
    ("Has order 101 shipped yet?", Label::Order),
    // Package tracking
    ("Where is my package?", Label::Order),
    ("When will my order arrive?", Label::Order),
    ("My order hasn't arrived yet", Label::Order),
    ("I want to track my delivery", Label::Order),
    // Delivery status
    ("Has my order been delivered?", Label::Order),
    ("Is my package out for delivery?", Label::Order),
    ("When was my order shipped?", Label::Order),
    // Ambiguous: order-specific wins over general policy
    ("I have a question about my order 101", Label::Order),
    ("Can I return order 102?", Label::Order),
    ("How do returns work?", Label::Faq),
    ("What happens if my package is lost?", Label::Faq),
];
