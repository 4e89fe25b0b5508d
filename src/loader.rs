//! Fetch a category listing and turn its first members into entities

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::{Catalog, CategoryListing};
use crate::error::LoadError;
use crate::normalize::normalize;
use crate::state::Pokemon;

/// What a load actually did compared with what was asked for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub category: String,
    pub requested: usize,
    pub available: usize,
    pub loaded: usize,
    /// Listed members with no usable name.
    pub skipped: usize,
    /// Members whose detail lookup failed.
    pub failed: usize,
}

impl LoadReport {
    pub fn capped(&self) -> bool {
        self.requested > self.available
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "{}: {} of {} loaded",
            self.category,
            self.loaded,
            self.requested.min(self.available)
        );
        if self.capped() {
            text.push_str(&format!(", only {} available", self.available));
        }
        if self.skipped > 0 {
            text.push_str(&format!(", {} unnamed", self.skipped));
        }
        if self.failed > 0 {
            text.push_str(&format!(", {} failed", self.failed));
        }
        text
    }
}

/// Fully normalized entities in listing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedBatch {
    pub items: Vec<Pokemon>,
    pub report: LoadReport,
}

/// Token of the load in flight. Starting a load cancels the previous one.
#[derive(Debug, Default)]
pub struct LoadSlot {
    current: Mutex<Option<CancellationToken>>,
}

impl LoadSlot {
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the load in flight; `false` when there was none.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Look up `category` and fetch details for its first `requested` members.
///
/// Details are fetched one at a time in listing order. Over-requesting caps
/// silently; unnamed members and failed lookups are skipped and counted.
/// Only an unusable listing is an error.
pub async fn load_batch<C: Catalog + ?Sized>(
    catalog: &C,
    category: &str,
    requested: usize,
    cancel: &CancellationToken,
) -> Result<LoadedBatch, LoadError> {
    tracing::info!(category, requested, "loading type");

    let listing = catalog
        .fetch_by_category(category)
        .await
        .map_err(|err| LoadError::unavailable(category, err.to_string()))?;
    let members = listing
        .members()
        .ok_or_else(|| LoadError::unavailable(category, "member list missing"))?;

    let available = members.len();
    let take = requested.min(available);
    let mut report = LoadReport {
        category: category.to_string(),
        requested,
        available,
        ..Default::default()
    };
    let mut items = Vec::with_capacity(take);

    for (index, member) in members[..take].iter().enumerate() {
        let Some(name) = CategoryListing::member_name(member) else {
            tracing::warn!(category, index, "skipping member without a name");
            report.skipped += 1;
            continue;
        };
        if cancel.is_cancelled() {
            tracing::info!(category, loaded = items.len(), "load cancelled");
            return Err(LoadError::Cancelled);
        }
        match catalog.fetch_detail(name).await {
            Ok(record) => {
                tracing::debug!(category, name, "fetched detail");
                items.push(normalize(&record));
            }
            Err(err) => {
                tracing::warn!(category, name, error = %err, "skipping member");
                report.failed += 1;
            }
        }
    }

    report.loaded = items.len();
    tracing::info!(
        category,
        loaded = report.loaded,
        skipped = report.skipped,
        failed = report.failed,
        "type loaded"
    );
    Ok(LoadedBatch { items, report })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::api::DetailRecord;
    use crate::collection::Collection;
    use crate::error::FetchError;

    /// In-memory catalog that records the order of detail lookups.
    #[derive(Default)]
    struct FakeCatalog {
        listings: HashMap<String, Result<Value, FetchError>>,
        missing_details: Vec<String>,
        detail_calls: Mutex<Vec<String>>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl FakeCatalog {
        fn with_listing(mut self, category: &str, names: &[Option<&str>]) -> Self {
            let members: Vec<Value> = names
                .iter()
                .map(|name| match name {
                    Some(name) => json!({ "slot": 1, "pokemon": { "name": name, "url": "" } }),
                    None => json!({ "slot": 1, "pokemon": {} }),
                })
                .collect();
            self.listings
                .insert(category.to_string(), Ok(json!({ "pokemon": members })));
            self
        }

        fn with_listing_error(mut self, category: &str, error: FetchError) -> Self {
            self.listings.insert(category.to_string(), Err(error));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.detail_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn fetch_by_category(&self, category: &str) -> Result<CategoryListing, FetchError> {
            match self.listings.get(category) {
                Some(Ok(body)) => Ok(CategoryListing { body: body.clone() }),
                Some(Err(err)) => Err(err.clone()),
                None => Err(FetchError::Status(404)),
            }
        }

        async fn fetch_detail(&self, name: &str) -> Result<DetailRecord, FetchError> {
            let count = {
                let mut calls = self.detail_calls.lock().unwrap();
                calls.push(name.to_string());
                calls.len()
            };
            if let Some((after, token)) = &self.cancel_after {
                if count >= *after {
                    token.cancel();
                }
            }
            if self.missing_details.iter().any(|missing| missing == name) {
                return Err(FetchError::Status(404));
            }
            Ok(DetailRecord {
                name: name.to_string(),
                body: json!({
                    "weight": 10,
                    "height": 3,
                    "types": [{ "type": { "name": "fire" } }],
                    "moves": [],
                }),
            })
        }
    }

    fn fire_names() -> Vec<Option<&'static str>> {
        [
            "charmander", "charmeleon", "charizard", "vulpix", "ninetales", "growlithe",
            "arcanine", "ponyta", "rapidash", "magmar",
        ]
        .into_iter()
        .map(Some)
        .collect()
    }

    fn names(batch: &LoadedBatch) -> Vec<&str> {
        batch.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_loads_first_members_in_order() {
        let catalog = FakeCatalog::default().with_listing("fire", &fire_names());
        let batch = load_batch(&catalog, "fire", 3, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(names(&batch), vec!["charmander", "charmeleon", "charizard"]);
        assert_eq!(catalog.calls(), vec!["charmander", "charmeleon", "charizard"]);
        assert_eq!(batch.report.available, 10);
        assert_eq!(batch.report.loaded, 3);
        assert!(!batch.report.capped());
    }

    #[tokio::test]
    async fn test_over_request_caps() {
        let catalog = FakeCatalog::default()
            .with_listing("ice", &[Some("jynx"), Some("lapras"), Some("articuno")]);
        let batch = load_batch(&catalog, "ice", 50, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(batch.items.len(), 3);
        assert!(batch.report.capped());
        assert_eq!(batch.report.requested, 50);
        assert_eq!(batch.report.available, 3);
    }

    #[tokio::test]
    async fn test_unnamed_members_are_skipped_not_replaced() {
        let catalog = FakeCatalog::default().with_listing(
            "grass",
            &[Some("bulbasaur"), None, Some("ivysaur"), None, Some("venusaur"), Some("oddish")],
        );
        let batch = load_batch(&catalog, "grass", 5, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(names(&batch), vec!["bulbasaur", "ivysaur", "venusaur"]);
        assert_eq!(batch.report.skipped, 2);
        assert_eq!(batch.report.loaded, 3);
    }

    #[tokio::test]
    async fn test_failed_details_are_skipped() {
        let mut catalog = FakeCatalog::default().with_listing("fire", &fire_names());
        catalog.missing_details = vec!["charmeleon".into()];
        let batch = load_batch(&catalog, "fire", 3, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(names(&batch), vec!["charmander", "charizard"]);
        assert_eq!(batch.report.failed, 1);
    }

    #[tokio::test]
    async fn test_all_details_failing_is_empty_not_error() {
        let mut catalog = FakeCatalog::default().with_listing("bug", &[Some("caterpie")]);
        catalog.missing_details = vec!["caterpie".into()];
        let batch = load_batch(&catalog, "bug", 1, &CancellationToken::new())
            .await
            .unwrap();

        assert!(batch.items.is_empty());
        assert_eq!(batch.report.failed, 1);
    }

    #[tokio::test]
    async fn test_listing_failure_is_catalog_unavailable() {
        let catalog =
            FakeCatalog::default().with_listing_error("water", FetchError::Status(404));
        let err = load_batch(&catalog, "water", 5, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::CatalogUnavailable { ref category, .. } if category == "water"
        ));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_list_membership_is_catalog_unavailable() {
        let mut catalog = FakeCatalog::default();
        catalog
            .listings
            .insert("rock".into(), Ok(json!({ "pokemon": "geodude" })));
        let err = load_batch(&catalog, "rock", 1, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::CatalogUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_cancel_stops_before_next_detail() {
        let token = CancellationToken::new();
        let mut catalog = FakeCatalog::default().with_listing("fire", &fire_names());
        catalog.cancel_after = Some((2, token.clone()));

        let err = load_batch(&catalog, "fire", 5, &token).await.unwrap_err();

        assert_eq!(err, LoadError::Cancelled);
        assert_eq!(catalog.calls(), vec!["charmander", "charmeleon"]);
    }

    #[test]
    fn test_load_slot_cancels_previous_load() {
        let slot = LoadSlot::new();
        assert!(!slot.cancel());

        let first = slot.begin();
        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        assert!(slot.cancel());
        assert!(second.is_cancelled());
        assert!(!slot.cancel());
    }

    #[tokio::test]
    async fn test_cancelled_slot_token_stops_load() {
        let slot = LoadSlot::new();
        let token = slot.begin();
        slot.cancel();
        let catalog = FakeCatalog::default().with_listing("fire", &fire_names());

        let err = load_batch(&catalog, "fire", 3, &token).await.unwrap_err();

        assert_eq!(err, LoadError::Cancelled);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_collection_load_scenario() {
        let catalog = FakeCatalog::default().with_listing("fire", &fire_names());
        let mut collection = Collection::new();
        let report = collection
            .load_by_category(&catalog, "fire", 3, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.cursor(), 0);
        assert_eq!(
            collection.current().map(|p| p.name.as_str()),
            Some("charmander")
        );
        assert_eq!(report.loaded, 3);

        collection.advance();
        collection.advance();
        assert!(!collection.advance());
        assert_eq!(collection.cursor(), 2);
    }

    #[tokio::test]
    async fn test_collection_failed_load_leaves_it_empty() {
        let catalog = FakeCatalog::default()
            .with_listing("fire", &fire_names())
            .with_listing_error("water", FetchError::Status(404));
        let mut collection = Collection::new();
        collection
            .load_by_category(&catalog, "fire", 4, &CancellationToken::new())
            .await
            .unwrap();
        collection.advance();

        let result = collection
            .load_by_category(&catalog, "water", 5, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(LoadError::CatalogUnavailable { .. })));
        assert!(collection.is_empty());
        assert_eq!(collection.cursor(), 0);
    }

    #[test]
    fn test_report_summary() {
        let report = LoadReport {
            category: "fire".into(),
            requested: 20,
            available: 10,
            loaded: 8,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            report.summary(),
            "fire: 8 of 10 loaded, only 10 available, 1 unnamed, 1 failed"
        );
    }
}
