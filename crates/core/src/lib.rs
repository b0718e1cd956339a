//! Core data types for the storefront deals bot.

pub mod deal;
pub mod seen;
pub mod source;

pub use deal::*;
pub use seen::*;
pub use source::*;
