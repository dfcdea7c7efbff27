//! Labeled evaluation corpus.
//!
//! The built-in corpus covers the four FAQ topics (returns, shipping, hours,
//! location) and order tracking, plus a few deliberately ambiguous queries.
//! External corpora are YAML or JSON arrays validated against JSON Schema.

mod builtin;
mod parser;
mod schema;

pub use parser::{Corpus, CorpusError};
pub use schema::validate_corpus_schema;
