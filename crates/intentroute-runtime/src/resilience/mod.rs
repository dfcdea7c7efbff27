//! Rate-limit handling for intentroute-runtime.
//!
//! Providers on a free tier allow only a handful of requests per minute.
//! Rather than retrying after a rejection, requests are spaced out up front.

mod pacing;

pub use pacing::RequestPacer;
