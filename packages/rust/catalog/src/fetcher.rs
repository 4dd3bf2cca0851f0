//! Access to the versioned reference-data service (Data Dragon).
//!
//! The cache only talks to a [`CatalogFetcher`]; [`DataDragonFetcher`] is the
//! HTTP implementation used in production, tests inject their own.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use itemsetcopier_shared::{CatalogConfig, ItemSetError, Result};

use crate::model::{ChampionRecord, ItemRecord};

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("ItemSetCopier/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// The three reads a catalog refresh is composed of.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Current version tag.
    async fn fetch_version(&self) -> Result<String>;

    /// Item catalog for `version`, keyed by item ID.
    async fn fetch_items(&self, version: &str) -> Result<BTreeMap<String, ItemRecord>>;

    /// Champion catalog for `version`.
    async fn fetch_champions(&self, version: &str) -> Result<Vec<ChampionRecord>>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Fetches the catalog from a Data Dragon compatible HTTP service.
pub struct DataDragonFetcher {
    client: Client,
    base_url: String,
    locale: String,
}

impl DataDragonFetcher {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.fetch_timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            locale: config.locale.clone(),
        })
    }

    fn data_url(&self, version: &str, file: &str) -> String {
        format!(
            "{}/cdn/{version}/data/{}/{file}",
            self.base_url, self.locale
        )
    }
}

#[async_trait]
impl CatalogFetcher for DataDragonFetcher {
    async fn fetch_version(&self) -> Result<String> {
        let url = format!("{}/api/versions.json", self.base_url);
        decode_versions(&get_text(&self.client, &url).await?)
    }

    async fn fetch_items(&self, version: &str) -> Result<BTreeMap<String, ItemRecord>> {
        let url = self.data_url(version, "item.json");
        decode_items(&get_text(&self.client, &url).await?)
    }

    async fn fetch_champions(&self, version: &str) -> Result<Vec<ChampionRecord>> {
        let url = self.data_url(version, "champion.json");
        decode_champions(&get_text(&self.client, &url).await?)
    }
}

/// Build a reqwest client with appropriate settings.
fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
        .map_err(|e| ItemSetError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return its body, treating any non-2xx status as an error.
async fn get_text(client: &Client, url: &str) -> Result<String> {
    debug!(%url, "fetching catalog resource");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ItemSetError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ItemSetError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| ItemSetError::Network(format!("{url}: failed to read body: {e}")))
}

// ---------------------------------------------------------------------------
// Wire decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DataFile<T> {
    data: HashMap<String, T>,
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    #[serde(default)]
    from: Vec<String>,
}

#[derive(Deserialize)]
struct RawChampion {
    id: String,
    key: String,
    name: String,
}

/// The first entry of `versions.json` is the current version.
pub fn decode_versions(body: &str) -> Result<String> {
    let versions: Vec<String> = serde_json::from_str(body)
        .map_err(|e| ItemSetError::parse(format!("versions.json: {e}")))?;

    versions
        .into_iter()
        .next()
        .ok_or_else(|| ItemSetError::parse("versions.json: empty version list"))
}

pub fn decode_items(body: &str) -> Result<BTreeMap<String, ItemRecord>> {
    let file: DataFile<RawItem> = serde_json::from_str(body)
        .map_err(|e| ItemSetError::parse(format!("item.json: {e}")))?;

    Ok(file
        .data
        .into_iter()
        .map(|(id, raw)| {
            let item = ItemRecord::new(raw.name).crafted_from(raw.from);
            (id, item)
        })
        .collect())
}

pub fn decode_champions(body: &str) -> Result<Vec<ChampionRecord>> {
    let file: DataFile<RawChampion> = serde_json::from_str(body)
        .map_err(|e| ItemSetError::parse(format!("champion.json: {e}")))?;

    file.data
        .into_values()
        .map(|raw| {
            let key = raw.key.parse::<u32>().map_err(|_| {
                ItemSetError::parse(format!(
                    "champion.json: key of {} is not numeric: {:?}",
                    raw.id, raw.key
                ))
            })?;
            Ok(ChampionRecord {
                key,
                internal_name: raw.id,
                display_name: raw.name,
            })
        })
        .collect()
}
