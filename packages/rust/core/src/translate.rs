//! The translation pipeline: build → item set.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, instrument};

use itemsetcopier_catalog::{CatalogCache, ChampionResolver};
use itemsetcopier_shared::{BuildBlock, ChampionRef, ItemSet, Result, validate_title};
use itemsetcopier_sources::{SourceAdapter, SourceParams};

use crate::normalizer::{NormalizeOptions, normalize};

/// A build ready for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub title: String,
    pub champion: ChampionRef,
    pub blocks: Vec<BuildBlock>,
}

/// Result of a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The importable item set.
    pub item_set: ItemSet,
    /// Source-side names (or IDs) that matched nothing in the catalog.
    pub outdated: BTreeSet<String>,
    /// Catalog version the translation was resolved against.
    pub catalog_version: String,
}

/// Turns builds into item sets against a shared catalog cache.
///
/// Cheap to clone; all clones share the cache.
#[derive(Clone)]
pub struct Translator {
    cache: Arc<CatalogCache>,
    options: NormalizeOptions,
}

impl Translator {
    pub fn new(cache: Arc<CatalogCache>) -> Self {
        Self {
            cache,
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    /// Translate one build.
    ///
    /// 1. Validate the title (before any catalog work)
    /// 2. Take one catalog snapshot for the whole request
    /// 3. Resolve the champion; failure aborts
    /// 4. Normalize blocks; unresolved items are collected, not fatal
    #[instrument(skip_all, fields(title = %request.title, champion = %request.champion))]
    pub async fn translate(&self, request: &TranslateRequest) -> Result<Translation> {
        validate_title(&request.title)?;

        let catalog = self.cache.get_catalog().await?;

        let champion = ChampionResolver::new(&catalog).resolve(&request.champion)?;
        let blocks = normalize(&catalog, &request.blocks, self.options);

        let outdated: BTreeSet<String> = blocks
            .iter()
            .flat_map(|block| block.unresolved.iter().cloned())
            .collect();

        let item_set = ItemSet::new(champion.key, request.title.clone(), &blocks);

        info!(
            champion = %champion.display_name,
            version = catalog.version(),
            blocks = item_set.blocks.len(),
            outdated = outdated.len(),
            "translated build"
        );

        Ok(Translation {
            item_set,
            outdated,
            catalog_version: catalog.version().to_string(),
        })
    }

    /// Validate `params`, extract the build from `document` with `adapter`,
    /// then [`translate`](Self::translate) it.
    #[instrument(skip_all, fields(adapter = adapter.name()))]
    pub async fn translate_source(
        &self,
        adapter: &dyn SourceAdapter,
        params: &SourceParams,
        document: &str,
    ) -> Result<Translation> {
        adapter.validate(params)?;
        let raw = adapter.extract_build(params, document)?;

        self.translate(&TranslateRequest {
            title: params.title.clone(),
            champion: raw.champion,
            blocks: raw.blocks,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use itemsetcopier_catalog::{
        CatalogFetcher, ChampionRecord, ItemRecord, decode_champions, decode_items,
    };
    use itemsetcopier_shared::{
        BuildEntry, CanonicalItem, CatalogConfig, ItemSetBlock, ItemSetError,
    };
    use itemsetcopier_sources::{ChampionggAdapter, MobafireAdapter, MobalyticsAdapter, OpggAdapter};

    fn load_fixture(path: &str) -> String {
        let path = format!("../../../fixtures/{path}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    /// Serves the Data Dragon fixtures and counts round-trips.
    #[derive(Default)]
    struct FixtureFetcher {
        versions: AtomicUsize,
        items: AtomicUsize,
        champions: AtomicUsize,
        delay: Option<Duration>,
        offline: AtomicBool,
    }

    impl FixtureFetcher {
        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl CatalogFetcher for FixtureFetcher {
        async fn fetch_version(&self) -> itemsetcopier_shared::Result<String> {
            self.versions.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(ItemSetError::Network("connection refused".into()));
            }
            Ok("10.5.1".into())
        }

        async fn fetch_items(
            &self,
            _version: &str,
        ) -> itemsetcopier_shared::Result<BTreeMap<String, ItemRecord>> {
            self.items.fetch_add(1, Ordering::SeqCst);
            decode_items(&load_fixture("ddragon/item.json"))
        }

        async fn fetch_champions(
            &self,
            _version: &str,
        ) -> itemsetcopier_shared::Result<Vec<ChampionRecord>> {
            self.champions.fetch_add(1, Ordering::SeqCst);
            decode_champions(&load_fixture("ddragon/champion.json"))
        }
    }

    fn translator_with(fetcher: Arc<FixtureFetcher>) -> Translator {
        let cache = CatalogCache::new(fetcher, &CatalogConfig::default());
        Translator::new(Arc::new(cache))
    }

    fn translator() -> Translator {
        translator_with(Arc::new(FixtureFetcher::default()))
    }

    fn ids(block: &ItemSetBlock) -> Vec<(&str, u32)> {
        block
            .items
            .iter()
            .map(|CanonicalItem { id, count }| (id.as_str(), *count))
            .collect()
    }

    fn request(title: &str, champion: ChampionRef, blocks: Vec<BuildBlock>) -> TranslateRequest {
        TranslateRequest {
            title: title.into(),
            champion,
            blocks,
        }
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn translates_named_build() {
        let mut core = BuildBlock::new("Core");
        core.push(BuildEntry::name("Berserker's Greaves"));
        core.push(BuildEntry::name("Berserker's Greaves").with_count(2));
        core.push(BuildEntry::name("Long Gone Item"));
        let starter = BuildBlock::new("Starter").starter();

        let translation = translator()
            .translate(&request(
                "Ahri Mid",
                ChampionRef::Name(" AHRI ".into()),
                vec![core, starter],
            ))
            .await
            .unwrap();

        let set = &translation.item_set;
        assert_eq!(set.associated_champions, [103]);
        assert!(set.associated_maps.is_empty());
        assert_eq!(set.title, "Ahri Mid");
        assert_eq!(set.blocks[0].kind, "Starter");
        assert_eq!(ids(&set.blocks[1]), [("3006", 3)]);
        assert_eq!(
            translation.outdated,
            BTreeSet::from(["Long Gone Item".to_string()])
        );
        assert_eq!(translation.catalog_version, "10.5.1");
    }

    #[tokio::test]
    async fn title_is_rejected_before_catalog_access() {
        let fetcher = Arc::new(FixtureFetcher::default());
        let translator = translator_with(Arc::clone(&fetcher));

        for title in [String::new(), "x".repeat(76)] {
            let err = translator
                .translate(&request(&title, ChampionRef::Key(103), vec![]))
                .await
                .unwrap_err();
            assert!(matches!(err, ItemSetError::InvalidInput { .. }));
        }
        assert_eq!(fetcher.versions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_champion_aborts() {
        let err = translator()
            .translate(&request("t", ChampionRef::Name("Teemo".into()), vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ItemSetError::ChampionNotFound(name) if name == "Teemo"));

        let err = translator()
            .translate(&request("t", ChampionRef::Key(17), vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ItemSetError::ChampionNotFound(_)));
    }

    #[tokio::test]
    async fn catalog_unavailable_is_retryable() {
        let fetcher = Arc::new(FixtureFetcher::default());
        fetcher.offline.store(true, Ordering::SeqCst);
        let translator = translator_with(Arc::clone(&fetcher));

        let err = translator
            .translate(&request("t", ChampionRef::Key(103), vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ItemSetError::CatalogUnavailable(_)));
        assert!(err.is_retryable());

        fetcher.offline.store(false, Ordering::SeqCst);
        assert!(
            translator
                .translate(&request("t", ChampionRef::Key(103), vec![]))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn concurrent_translations_share_one_refresh() {
        let fetcher = Arc::new(FixtureFetcher::slow(Duration::from_millis(50)));
        let translator = translator_with(Arc::clone(&fetcher));

        let mut tasks = Vec::new();
        for i in 0..12 {
            let translator = translator.clone();
            tasks.push(tokio::spawn(async move {
                let mut block = BuildBlock::new("Core");
                block.push(BuildEntry::name("Infinity Edge"));
                translator
                    .translate(&request(&format!("Set {i}"), ChampionRef::Key(67), vec![block]))
                    .await
            }));
        }

        for task in tasks {
            let translation = task.await.unwrap().unwrap();
            assert_eq!(ids(&translation.item_set.blocks[0]), [("3031", 1)]);
        }

        assert_eq!(fetcher.versions.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.items.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.champions.load(Ordering::SeqCst), 1);
    }

    // -----------------------------------------------------------------------
    // Sources end to end
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn mobafire_guide() {
        let html = load_fixture("html/mobafire_graves.html");
        let params = SourceParams::new("Graves Jungle")
            .with_url("https://www.mobafire.com/league-of-legends/build/graves-shotgun-jungle-512345");

        let translation = translator()
            .translate_source(&MobafireAdapter, &params, &html)
            .await
            .unwrap();

        let set = &translation.item_set;
        assert_eq!(set.associated_champions, [104]);
        assert_eq!(
            ids(&set.blocks[0]),
            [("1039", 1), ("2031", 1), ("2032", 1), ("3340", 1)]
        );
        // Enchanted jungle item picked by lineage.
        assert_eq!(
            ids(&set.blocks[1]),
            [("1416", 1), ("3006", 1), ("3031", 1)]
        );
        assert_eq!(
            ids(&set.blocks[2]),
            [("3072", 1), ("2003", 3), ("3006", 1)]
        );
        assert_eq!(
            translation.outdated,
            BTreeSet::from(["Death's Dance".to_string()])
        );
    }

    #[tokio::test]
    async fn mobafire_enchantment_without_lineage_is_outdated() {
        let html = load_fixture("html/mobafire_graves.html");
        let params = SourceParams::new("Graves Tank").with_build_index(1);

        let translation = translator()
            .translate_source(&MobafireAdapter, &params, &html)
            .await
            .unwrap();

        assert!(
            translation
                .outdated
                .contains("Skirmisher's Sabre - Warrior")
        );
        assert_eq!(
            ids(&translation.item_set.blocks[1]),
            [("3047", 1), ("3748", 1)]
        );
    }

    #[tokio::test]
    async fn champion_key_overrides_document() {
        let html = load_fixture("html/mobafire_graves.html");
        let params = SourceParams::new("Not Graves").with_champion(ChampionRef::Key(24));

        let translation = translator()
            .translate_source(&MobafireAdapter, &params, &html)
            .await
            .unwrap();
        assert_eq!(translation.item_set.associated_champions, [24]);

        let params = SourceParams::new("Unknown key").with_champion(ChampionRef::Key(99999));
        let err = translator()
            .translate_source(&MobafireAdapter, &params, &html)
            .await
            .unwrap_err();
        assert!(matches!(err, ItemSetError::ChampionNotFound(_)));
    }

    #[tokio::test]
    async fn mobalytics_build() {
        let json = load_fixture("json/mobalytics_vayne.json");
        let params = SourceParams::new("Vayne Crit")
            .with_url("https://app.mobalytics.gg/champions/vayne/build");

        let translation = translator()
            .translate_source(&MobalyticsAdapter, &params, &json)
            .await
            .unwrap();

        let set = &translation.item_set;
        assert_eq!(set.associated_champions, [67]);
        assert_eq!(set.blocks[0].kind, "Starter");
        assert_eq!(ids(&set.blocks[0]), [("1055", 1), ("2003", 2)]);
        assert_eq!(translation.outdated, BTreeSet::from(["3812".to_string()]));
    }

    #[tokio::test]
    async fn opgg_statistics() {
        let html = load_fixture("html/opgg_jax_top.html");
        let params =
            SourceParams::new("Jax Top").with_url("https://www.op.gg/champion/jax/statistics/top");

        let translation = translator()
            .translate_source(&OpggAdapter, &params, &html)
            .await
            .unwrap();

        let set = &translation.item_set;
        assert_eq!(set.associated_champions, [24]);
        assert_eq!(set.blocks.len(), 5);
        assert_eq!(set.blocks[4].kind, "Boots");
        assert!(translation.outdated.is_empty());
    }

    #[tokio::test]
    async fn championgg_page() {
        let html = load_fixture("html/championgg_ahri_middle.html");
        let params =
            SourceParams::new("Ahri Mid").with_url("https://champion.gg/champion/Ahri/Middle");

        let translation = translator()
            .translate_source(&ChampionggAdapter, &params, &html)
            .await
            .unwrap();

        let set = &translation.item_set;
        assert_eq!(set.associated_champions, [103]);
        assert_eq!(set.blocks[0].kind, "Most Frequent Starters");
        assert_eq!(ids(&set.blocks[0]), [("1056", 1), ("2003", 2)]);
        assert_eq!(translation.outdated, BTreeSet::from(["3907".to_string()]));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_parsing() {
        let params = SourceParams::new("t").with_url("https://u.gg/lol/champions/jax/build");
        let err = translator()
            .translate_source(&OpggAdapter, &params, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ItemSetError::InvalidInput { .. }));
    }
}
