//! Dataset and roster fetching
//!
//! The load pipeline only needs two things from the outside world: the raw
//! dataset text and the country roster. [`DatasetSource`] is the seam; the
//! cache never does I/O itself.

use crate::config::DashboardConfig;
use crate::data::error::{DataError, DataResult, FetchTarget};
use crate::types::EntityRoster;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Supplier of the two inputs of the load pipeline
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Raw CSV text of the emissions dataset
    async fn fetch_dataset(&self) -> DataResult<String>;

    /// Authoritative country names
    async fn fetch_roster(&self) -> DataResult<EntityRoster>;
}

// ============================================================================
// Remote / Local Source
// ============================================================================

/// Fetches `http(s)://` locations with reqwest and reads anything else from disk.
pub struct RemoteSource {
    client: reqwest::Client,
    dataset_location: String,
    roster_location: String,
}

impl RemoteSource {
    pub fn new(dataset_location: impl Into<String>, roster_location: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), dataset_location, roster_location)
    }

    pub fn with_client(
        client: reqwest::Client,
        dataset_location: impl Into<String>,
        roster_location: impl Into<String>,
    ) -> Self {
        Self {
            client,
            dataset_location: dataset_location.into(),
            roster_location: roster_location.into(),
        }
    }

    /// Build a source whose HTTP client honors the configured timeout
    pub fn from_config(config: &DashboardConfig) -> DataResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DataError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(
            client,
            config.dataset_location.clone(),
            config.roster_location.clone(),
        ))
    }

    async fn fetch_text(&self, location: &str, target: FetchTarget) -> DataResult<String> {
        if is_remote(location) {
            debug!(%target, url = location, "Fetching over HTTP");
            let response = self
                .client
                .get(location)
                .send()
                .await
                .map_err(|e| DataError::fetch(target, e))?;
            let response = response
                .error_for_status()
                .map_err(|e| DataError::fetch(target, e))?;
            response.text().await.map_err(|e| DataError::fetch(target, e))
        } else {
            debug!(%target, path = location, "Reading from disk");
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| DataError::fetch(target, format!("{location}: {e}")))
        }
    }
}

#[async_trait]
impl DatasetSource for RemoteSource {
    async fn fetch_dataset(&self) -> DataResult<String> {
        self.fetch_text(&self.dataset_location, FetchTarget::Dataset)
            .await
    }

    async fn fetch_roster(&self) -> DataResult<EntityRoster> {
        let body = self
            .fetch_text(&self.roster_location, FetchTarget::Roster)
            .await?;
        parse_country_listing(&body)
    }
}

fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ============================================================================
// Country Listing
// ============================================================================

#[derive(Deserialize)]
struct CountryListing {
    #[serde(default)]
    name: Option<CountryName>,
}

#[derive(Deserialize)]
struct CountryName {
    #[serde(default)]
    common: Option<String>,
}

/// Parse a country listing (`[{"name": {"common": "France"}}, ...]`) into a roster.
///
/// Only the common name is read. Entries without one are skipped.
pub fn parse_country_listing(json: &str) -> DataResult<EntityRoster> {
    let listing: Vec<CountryListing> = serde_json::from_str(json)?;
    let names = listing
        .into_iter()
        .filter_map(|c| c.name.and_then(|n| n.common));
    Ok(EntityRoster::from_names(names))
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// A source backed by values already in memory.
///
/// Useful when the shell bundles the dataset, and in tests. A `None` roster
/// behaves like an unreachable roster endpoint.
#[derive(Clone, Debug)]
pub struct StaticSource {
    dataset: String,
    roster: Option<EntityRoster>,
}

impl StaticSource {
    pub fn new(dataset: impl Into<String>, roster: EntityRoster) -> Self {
        Self {
            dataset: dataset.into(),
            roster: Some(roster),
        }
    }

    pub fn without_roster(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            roster: None,
        }
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch_dataset(&self) -> DataResult<String> {
        Ok(self.dataset.clone())
    }

    async fn fetch_roster(&self) -> DataResult<EntityRoster> {
        self.roster
            .clone()
            .ok_or_else(|| DataError::fetch(FetchTarget::Roster, "roster unavailable"))
    }
}
