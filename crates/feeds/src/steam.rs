//! Steam featured specials.

use crate::error::FeedError;
use crate::feed::{DealFeed, FetchOutcome};
use crate::rest::fetch_body;
use async_trait::async_trait;
use deals_core::{DealRecord, FeedSource, SeenSet};
use serde::Deserialize;
use tracing::debug;

/// Featured categories endpoint; specials live under `specials.items`.
pub const STEAM_FEATURED_URL: &str = "https://store.steampowered.com/api/featuredcategories/";

/// Prefix of an app page on the Steam storefront.
pub const STEAM_STORE_URL: &str = "https://store.steampowered.com/app/";

/// Minimum discount announced when none is configured.
pub const DEFAULT_DISCOUNT_THRESHOLD: u8 = 50;

/// Canonical storefront URL for an app id.
pub fn steam_store_url(app_id: u64) -> String {
    format!("{}{}", STEAM_STORE_URL, app_id)
}

#[derive(Debug, Deserialize)]
struct FeaturedCategories {
    specials: Option<Specials>,
}

#[derive(Debug, Deserialize)]
struct Specials {
    items: Option<Vec<SpecialItem>>,
}

#[derive(Debug, Deserialize)]
struct SpecialItem {
    id: Option<u64>,
    name: Option<String>,
    #[serde(default)]
    discount_percent: i64,
}

/// Fetcher for discounted Steam specials.
pub struct SteamFeedFetcher {
    client: reqwest::Client,
    endpoint: String,
    threshold: u8,
    seen: SeenSet<u64>,
}

impl SteamFeedFetcher {
    /// Create a fetcher announcing specials at or above `threshold` percent.
    pub fn new(client: reqwest::Client, threshold: u8) -> Self {
        Self {
            client,
            endpoint: STEAM_FEATURED_URL.to_string(),
            threshold,
            seen: SeenSet::new(),
        }
    }

    /// Override the featured categories endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// App ids announced so far.
    pub fn seen(&self) -> &SeenSet<u64> {
        &self.seen
    }

    /// Parse a featured categories payload and record any new specials.
    pub fn ingest(&mut self, body: &str) -> FetchOutcome {
        serde_json::from_str::<FeaturedCategories>(body)
            .map_err(FeedError::from)
            .map(|response| self.collect_deals(response))
            .into()
    }

    fn collect_deals(&mut self, response: FeaturedCategories) -> Vec<DealRecord> {
        let items = response
            .specials
            .and_then(|s| s.items)
            .unwrap_or_default();
        let threshold = i64::from(self.threshold);
        let mut deals = Vec::new();

        for item in &items {
            let Some(app_id) = item.id else {
                continue;
            };

            if item.discount_percent < threshold || self.seen.contains(&app_id) {
                continue;
            }

            let Ok(discount) = u8::try_from(item.discount_percent) else {
                debug!(
                    app_id,
                    discount = item.discount_percent,
                    "Steam: discount out of range, skipping"
                );
                continue;
            };
            if discount > 100 {
                debug!(app_id, discount, "Steam: discount out of range, skipping");
                continue;
            }

            self.seen.insert(app_id);
            let title = item
                .name
                .clone()
                .unwrap_or_else(|| format!("App {}", app_id));
            deals.push(DealRecord::discounted(title, steam_store_url(app_id), discount));
        }

        debug!(
            items = items.len(),
            threshold = self.threshold,
            new_deals = deals.len(),
            seen = self.seen.len(),
            "Steam: processed specials"
        );
        deals
    }
}

#[async_trait]
impl DealFeed for SteamFeedFetcher {
    fn source(&self) -> FeedSource {
        FeedSource::Steam
    }

    async fn fetch(&mut self) -> FetchOutcome {
        match fetch_body(&self.client, &self.endpoint).await {
            Ok(body) => self.ingest(&body),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::build_client;
    use crate::test_support::{serve_fixture, serve_slow, unreachable_url};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const GAME_X: &str = r#"{
        "specials": { "items": [
            { "id": 12345, "name": "Game X", "discount_percent": 75 }
        ] }
    }"#;

    fn payload(items: serde_json::Value) -> String {
        serde_json::json!({ "specials": { "items": items } }).to_string()
    }

    fn fetcher() -> SteamFeedFetcher {
        SteamFeedFetcher::new(reqwest::Client::new(), DEFAULT_DISCOUNT_THRESHOLD)
    }

    #[test]
    fn test_discounted_game_emitted_once() {
        let mut steam = fetcher();

        let first = steam.ingest(GAME_X);
        assert_eq!(
            first.deals(),
            &[DealRecord::discounted(
                "Game X",
                "https://store.steampowered.com/app/12345",
                75
            )]
        );

        assert!(steam.ingest(GAME_X).deals().is_empty());
        assert!(steam.seen().contains(&12345));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut steam = fetcher();
        let body = payload(serde_json::json!([
            { "id": 1, "name": "At", "discount_percent": 50 },
            { "id": 2, "name": "Below", "discount_percent": 49 }
        ]));
        let titles: Vec<_> = steam
            .ingest(&body)
            .into_deals()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["At"]);
        assert!(!steam.seen().contains(&2u64));
    }

    #[test]
    fn test_below_threshold_can_qualify_later() {
        let mut steam = fetcher();
        let below = payload(serde_json::json!([{ "id": 7, "name": "Late", "discount_percent": 40 }]));
        let above = payload(serde_json::json!([{ "id": 7, "name": "Late", "discount_percent": 60 }]));

        assert!(steam.ingest(&below).deals().is_empty());
        assert_eq!(steam.ingest(&above).deals().len(), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let mut steam = SteamFeedFetcher::new(reqwest::Client::new(), 90);
        assert_eq!(steam.threshold(), 90);
        assert!(steam.ingest(GAME_X).deals().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let mut steam = fetcher();
        let body = payload(serde_json::json!([
            { "name": "No id", "discount_percent": 90 },
            { "id": 99, "discount_percent": 80 },
            { "id": 100, "name": "No discount" }
        ]));
        let deals = steam.ingest(&body).into_deals();
        assert_eq!(
            deals,
            vec![DealRecord::discounted(
                "App 99",
                "https://store.steampowered.com/app/99",
                80
            )]
        );
    }

    #[test]
    fn test_out_of_range_discount_skipped() {
        let mut steam = fetcher();
        let body = payload(serde_json::json!([
            { "id": 1, "name": "Bogus", "discount_percent": 150 },
            { "id": 2, "name": "Huge", "discount_percent": 100000 },
            { "id": 3, "name": "Full", "discount_percent": 100 }
        ]));
        let deals = steam.ingest(&body).into_deals();
        assert_eq!(
            deals,
            vec![DealRecord::discounted(
                "Full",
                "https://store.steampowered.com/app/3",
                100
            )]
        );
        assert!(!steam.seen().contains(&1u64));
        assert!(!steam.seen().contains(&2u64));
    }

    #[test]
    fn test_missing_specials_is_empty_success() {
        let mut steam = fetcher();
        for body in ["{}", r#"{"specials":{}}"#, r#"{"specials":{"items":null}}"#] {
            let outcome = steam.ingest(body);
            assert!(!outcome.is_failed(), "{body} failed");
            assert!(outcome.deals().is_empty());
        }
    }

    #[test]
    fn test_unparsable_body_fails_without_deals() {
        let mut steam = fetcher();
        let outcome = steam.ingest("<html>Service Unavailable</html>");
        assert!(outcome.is_failed());
        assert!(outcome.deals().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_over_http() {
        let url = serve_fixture(StatusCode::OK, GAME_X).await;
        let mut steam = fetcher().with_endpoint(url);

        assert_eq!(steam.source(), FeedSource::Steam);
        assert_eq!(steam.fetch().await.deals().len(), 1);
        assert!(steam.fetch().await.deals().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_empty() {
        let url = serve_fixture(StatusCode::BAD_GATEWAY, "bad gateway").await;
        let mut steam = fetcher().with_endpoint(url);
        let outcome = steam.fetch().await;
        assert!(matches!(outcome, FetchOutcome::Failed(FeedError::HttpStatus(502))));
    }

    #[tokio::test]
    async fn test_fetch_network_error_is_empty() {
        let mut steam = fetcher().with_endpoint(unreachable_url().await);
        assert!(steam.fetch().await.into_deals().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_failure() {
        let url = serve_slow(Duration::from_secs(5)).await;
        let client = build_client(Duration::from_millis(200)).unwrap();
        let mut steam = SteamFeedFetcher::new(client, DEFAULT_DISCOUNT_THRESHOLD).with_endpoint(url);
        let outcome = steam.fetch().await;
        assert!(matches!(outcome, FetchOutcome::Failed(FeedError::Timeout(_))));
    }
}
