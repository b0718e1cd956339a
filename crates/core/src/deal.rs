//! Deal records emitted by feed fetchers.

use serde::{Deserialize, Serialize};

/// A promotional offer found on a storefront.
///
/// Records are transient: a fetcher produces them and the notifier consumes
/// them in the same cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Game title as reported upstream
    pub title: String,
    /// Canonical storefront URL
    pub url: String,
    /// Discount in percent, None for free-game promotions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
}

impl DealRecord {
    /// Create a record for a game that is currently free.
    pub fn free(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            discount_percent: None,
        }
    }

    /// Create a record for a discounted game.
    pub fn discounted(title: impl Into<String>, url: impl Into<String>, discount_percent: u8) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            discount_percent: Some(discount_percent),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.discount_percent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_free_deal() {
        let deal = DealRecord::free("Foo Bar", "https://store.epicgames.com/p/foo-bar");
        assert_eq!(deal.title, "Foo Bar");
        assert_eq!(deal.discount_percent, None);
        assert!(deal.is_free());
    }

    #[test]
    fn test_discounted_deal() {
        let deal = DealRecord::discounted("Game X", "https://store.steampowered.com/app/12345", 75);
        assert_eq!(deal.discount_percent, Some(75));
        assert!(!deal.is_free());
    }

    #[test]
    fn test_serialization_omits_missing_discount() {
        let deal = DealRecord::free("Foo", "https://example.com");
        let json = serde_json::to_value(&deal).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "Foo", "url": "https://example.com" })
        );
    }
}
