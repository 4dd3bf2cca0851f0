//! Freshness-bounded catalog cache.
//!
//! One [`CatalogCache`] is built per process and shared by reference. Readers
//! get an `Arc<Catalog>` and keep it for the whole request, so a refresh in
//! another task never changes the snapshot a translation is working on.
//!
//! Refreshes are serialized behind an async mutex. Callers that found the
//! cache stale while another refresh was in flight wait for it and share its
//! outcome instead of issuing their own round-trips.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use itemsetcopier_shared::{CatalogConfig, ItemSetError, Result};

use crate::clock::{Clock, SystemClock};
use crate::fetcher::{CatalogFetcher, DataDragonFetcher};
use crate::model::Catalog;

/// A complete snapshot and the time it was fetched. Replaced, never mutated.
#[derive(Debug)]
pub struct CacheEntry {
    pub catalog: Arc<Catalog>,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of the most recent refresh attempt, guarded by the refresh mutex.
#[derive(Debug, Default)]
struct RefreshGate {
    last_error: Option<String>,
}

pub struct CatalogCache {
    fetcher: Arc<dyn CatalogFetcher>,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    fetch_timeout: Duration,
    entry: RwLock<Option<Arc<CacheEntry>>>,
    invalidated: AtomicBool,
    /// Bumped after every refresh attempt, successful or not.
    attempts: AtomicU64,
    gate: Mutex<RefreshGate>,
}

impl CatalogCache {
    /// Create an empty cache backed by `fetcher`. Nothing is fetched until the
    /// first [`get_catalog`](Self::get_catalog).
    pub fn new(fetcher: Arc<dyn CatalogFetcher>, config: &CatalogConfig) -> Self {
        Self {
            fetcher,
            clock: Arc::new(SystemClock),
            refresh_interval: config.refresh_interval,
            fetch_timeout: config.fetch_timeout,
            entry: RwLock::new(None),
            invalidated: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
            gate: Mutex::new(RefreshGate::default()),
        }
    }

    /// Create a cache talking to the configured Data Dragon service.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let fetcher = DataDragonFetcher::new(config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the current snapshot, refreshing it first when it is missing or
    /// stale.
    ///
    /// A failed refresh falls back to the previous snapshot; the error only
    /// surfaces (as [`ItemSetError::CatalogUnavailable`]) when no fetch has
    /// ever succeeded. The next call retries.
    pub async fn get_catalog(&self) -> Result<Arc<Catalog>> {
        // Read the attempt counter before the entry: a refresh that completes
        // in between is then either visible in the entry or in the counter.
        let observed = self.attempts.load(Ordering::Acquire);

        if let Some(entry) = self.current().await {
            if self.is_fresh(&entry) {
                return Ok(Arc::clone(&entry.catalog));
            }
        }

        let mut gate = self.gate.lock().await;

        if self.attempts.load(Ordering::Acquire) != observed {
            debug!("joined an in-flight catalog refresh");
            return self.settle(gate.last_error.as_deref()).await;
        }

        // Claimed before fetching: an invalidation that lands mid-refresh
        // must survive it.
        let forced = self.invalidated.swap(false, Ordering::AcqRel);

        match self.refresh().await {
            Ok(entry) => {
                *self.entry.write().await = Some(Arc::new(entry));
                gate.last_error = None;
            }
            Err(message) => {
                warn!(error = %message, "catalog refresh failed");
                if forced {
                    self.invalidated.store(true, Ordering::Release);
                }
                gate.last_error = Some(message);
            }
        }
        self.attempts.fetch_add(1, Ordering::AcqRel);

        self.settle(gate.last_error.as_deref()).await
    }

    /// Version tag of the cached snapshot, if any. Never fetches.
    pub async fn version(&self) -> Option<String> {
        self.current()
            .await
            .map(|entry| entry.catalog.version().to_string())
    }

    /// Whether the next [`get_catalog`](Self::get_catalog) would refresh.
    pub async fn is_stale(&self) -> bool {
        match self.current().await {
            Some(entry) => !self.is_fresh(&entry),
            None => true,
        }
    }

    /// Force the next call to refresh. The current snapshot stays available as
    /// a fallback.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    async fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().await.clone()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        if self.invalidated.load(Ordering::Acquire) {
            return false;
        }
        let age = self.clock.now().signed_duration_since(entry.fetched_at);
        match chrono::Duration::from_std(self.refresh_interval) {
            Ok(interval) => age < interval,
            Err(_) => true,
        }
    }

    /// Resolve a caller's result from the state left by the last refresh.
    async fn settle(&self, last_error: Option<&str>) -> Result<Arc<Catalog>> {
        match (self.current().await, last_error) {
            (Some(entry), _) => Ok(Arc::clone(&entry.catalog)),
            (None, Some(message)) => Err(ItemSetError::CatalogUnavailable(message.to_string())),
            (None, None) => Err(ItemSetError::CatalogUnavailable(
                "no catalog snapshot available".into(),
            )),
        }
    }

    /// Fetch version, then items, then champions. Nothing is swapped in unless
    /// all three succeed.
    #[instrument(skip_all)]
    async fn refresh(&self) -> std::result::Result<CacheEntry, String> {
        let version = self.bounded("version", self.fetcher.fetch_version()).await?;
        let items = self.bounded("items", self.fetcher.fetch_items(&version)).await?;
        let champions = self
            .bounded("champions", self.fetcher.fetch_champions(&version))
            .await?;

        let catalog = Catalog::new(version, items, champions);
        info!(
            version = %catalog.version(),
            items = catalog.item_count(),
            champions = catalog.champion_count(),
            "catalog refreshed"
        );

        Ok(CacheEntry {
            catalog: Arc::new(catalog),
            fetched_at: self.clock.now(),
        })
    }

    async fn bounded<T>(
        &self,
        step: &str,
        fetch: impl Future<Output = Result<T>>,
    ) -> std::result::Result<T, String> {
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(format!("{step}: {e}")),
            Err(_) => Err(format!(
                "{step}: timed out after {}ms",
                self.fetch_timeout.as_millis()
            )),
        }
    }
}
