//! Reference-data layer for ItemSetCopier.
//!
//! - [`Catalog`]: immutable item/champion snapshot for one game version
//! - [`CatalogFetcher`] / [`DataDragonFetcher`]: upstream retrieval
//! - [`CatalogCache`]: freshness-bounded, refresh-coalescing snapshot cache
//! - [`resolve`]: champion, item and enchantment resolution against a snapshot

pub mod cache;
pub mod clock;
pub mod fetcher;
pub mod model;
pub mod resolve;

pub use cache::{CacheEntry, CatalogCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use fetcher::{
    CatalogFetcher, DataDragonFetcher, decode_champions, decode_items, decode_versions,
};
pub use model::{Catalog, ChampionRecord, ItemRecord, TRINKET_SUFFIX};
pub use resolve::{
    ChampionResolver, EnchantmentMatch, EnchantmentRules, ItemResolver, QUICK_CHARGE_SUFFIX,
    ResolveError,
};
