//! Epic Games Store free-game promotions.

use crate::error::FeedError;
use crate::feed::{DealFeed, FetchOutcome};
use crate::rest::fetch_body;
use async_trait::async_trait;
use compact_str::CompactString;
use deals_core::{DealRecord, FeedSource, SeenSet};
use serde::Deserialize;
use tracing::debug;

/// Promotions endpoint polled every cycle.
pub const EPIC_PROMOTIONS_URL: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";

/// Prefix of a product page on the Epic storefront.
pub const EPIC_STORE_URL: &str = "https://store.epicgames.com/p/";

/// Canonical storefront URL for a product slug.
pub fn epic_store_url(slug: &str) -> String {
    format!("{}{}", EPIC_STORE_URL, slug)
}

// Response shape: data.Catalog.searchStore.elements[]

#[derive(Debug, Deserialize)]
struct PromotionsResponse {
    data: PromotionsData,
}

#[derive(Debug, Deserialize)]
struct PromotionsData {
    #[serde(rename = "Catalog")]
    catalog: Catalog,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Catalog {
    search_store: SearchStore,
}

#[derive(Debug, Deserialize)]
struct SearchStore {
    elements: Vec<CatalogElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogElement {
    title: Option<String>,
    product_slug: Option<String>,
    catalog_ns: Option<CatalogNamespace>,
    offer_mappings: Option<Vec<PageMapping>>,
    promotions: Option<Promotions>,
}

#[derive(Debug, Deserialize)]
struct CatalogNamespace {
    mappings: Option<Vec<PageMapping>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMapping {
    page_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Promotions {
    promotional_offers: Option<Vec<PromotionBatch>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromotionBatch {
    promotional_offers: Vec<PromotionalOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromotionalOffer {
    discount_setting: DiscountSetting,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscountSetting {
    discount_percentage: i64,
}

impl PromotionalOffer {
    /// Epic reports the *remaining* price share; 0 means the game is free.
    fn is_free(&self) -> bool {
        self.discount_setting.discount_percentage == 0
    }
}

impl CatalogElement {
    /// Stable product slug: `productSlug`, then catalog page mappings, then
    /// offer page mappings.
    fn slug(&self) -> Option<&str> {
        fn first_page_slug(mappings: Option<&Vec<PageMapping>>) -> Option<&str> {
            mappings?
                .iter()
                .filter_map(|m| m.page_slug.as_deref())
                .find(|s| !s.is_empty())
        }

        self.product_slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| first_page_slug(self.catalog_ns.as_ref().and_then(|ns| ns.mappings.as_ref())))
            .or_else(|| first_page_slug(self.offer_mappings.as_ref()))
    }

    fn has_free_offer(&self) -> bool {
        self.promotions
            .as_ref()
            .and_then(|p| p.promotional_offers.as_ref())
            .into_iter()
            .flatten()
            .flat_map(|batch| batch.promotional_offers.iter())
            .any(PromotionalOffer::is_free)
    }
}

/// Fetcher for currently-free Epic games.
pub struct EpicFeedFetcher {
    client: reqwest::Client,
    endpoint: String,
    seen: SeenSet<CompactString>,
}

impl EpicFeedFetcher {
    /// Create a fetcher polling the public promotions endpoint.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: EPIC_PROMOTIONS_URL.to_string(),
            seen: SeenSet::new(),
        }
    }

    /// Override the promotions endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Slugs announced so far.
    pub fn seen(&self) -> &SeenSet<CompactString> {
        &self.seen
    }

    /// Parse a promotions payload and record any new free games.
    pub fn ingest(&mut self, body: &str) -> FetchOutcome {
        serde_json::from_str::<PromotionsResponse>(body)
            .map_err(FeedError::from)
            .map(|response| self.collect_deals(response))
            .into()
    }

    fn collect_deals(&mut self, response: PromotionsResponse) -> Vec<DealRecord> {
        let elements = response.data.catalog.search_store.elements;
        let mut deals = Vec::new();

        for element in &elements {
            if !element.has_free_offer() {
                continue;
            }

            let Some(slug) = element.slug() else {
                debug!(title = ?element.title, "Epic: free game has no product slug, skipping");
                continue;
            };

            let Some(title) = element.title.as_deref().filter(|t| !t.is_empty()) else {
                debug!(slug, "Epic: free game has no title, skipping");
                continue;
            };

            if self.seen.insert(CompactString::new(slug)) {
                deals.push(DealRecord::free(title, epic_store_url(slug)));
            }
        }

        debug!(
            elements = elements.len(),
            new_deals = deals.len(),
            seen = self.seen.len(),
            "Epic: processed promotions"
        );
        deals
    }
}

#[async_trait]
impl DealFeed for EpicFeedFetcher {
    fn source(&self) -> FeedSource {
        FeedSource::Epic
    }

    async fn fetch(&mut self) -> FetchOutcome {
        match fetch_body(&self.client, &self.endpoint).await {
            Ok(body) => self.ingest(&body),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}
