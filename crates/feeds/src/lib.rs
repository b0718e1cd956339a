//! Storefront deal feeds.
//!
//! Each fetcher polls one upstream endpoint, parses the JSON payload and
//! returns only the deals it has not announced before.
//!
//! ## Architecture
//!
//! - `feed` - the `DealFeed` trait and `FetchOutcome`
//! - `rest` - shared HTTP client construction and GET helper
//! - `epic` / `steam` - storefront-specific parsing and deduplication

pub mod epic;
pub mod error;
pub mod feed;
pub mod rest;
pub mod steam;

#[cfg(test)]
mod test_support;

pub use epic::*;
pub use error::*;
pub use feed::*;
pub use rest::*;
pub use steam::*;
