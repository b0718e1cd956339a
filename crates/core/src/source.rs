//! Feed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream storefront a deal was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedSource {
    /// Epic Games Store free-game promotions.
    Epic,
    /// Steam featured specials.
    Steam,
}

impl FeedSource {
    /// All feeds, in the order a cycle polls them.
    pub const ALL: [FeedSource; 2] = [FeedSource::Epic, FeedSource::Steam];

    /// Human-readable storefront name.
    pub fn display_name(self) -> &'static str {
        match self {
            FeedSource::Epic => "Epic Games Store",
            FeedSource::Steam => "Steam",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
