//! MOBAfire guide adapter.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use super::{RawBuild, SourceAdapter, element_text};
use crate::params::{SourceParams, pick_champion};
use itemsetcopier_shared::{BuildBlock, BuildEntry, ItemSetError, Result};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?mobafire\.com/league-of-legends/build/[A-Za-z0-9-]+-[0-9]{6}")
        .unwrap()
});

/// Extracts builds from MOBAfire guide pages.
///
/// Guides carry several builds; `build_index` picks one. Items are listed by
/// display name, so they go through name resolution (including enchanted
/// jungle items, which MOBAfire spells out as free text).
pub struct MobafireAdapter;

impl SourceAdapter for MobafireAdapter {
    fn name(&self) -> &str {
        "mobafire"
    }

    fn site(&self) -> &str {
        "MOBAfire"
    }

    fn url_pattern(&self) -> &Regex {
        &URL_PATTERN
    }

    #[instrument(skip_all, fields(adapter = "mobafire"))]
    fn extract_build(&self, params: &SourceParams, document: &str) -> Result<RawBuild> {
        let doc = Html::parse_document(document);

        let title_sel = Selector::parse("div.title h3").unwrap();
        let found = doc.select(&title_sel).next().map(element_text);
        let champion = pick_champion(params, found)?;

        let build_sel = Selector::parse("div.view-guide__build").unwrap();
        let builds: Vec<ElementRef<'_>> = doc.select(&build_sel).collect();
        if builds.is_empty() {
            return Err(ItemSetError::parse("MOBAfire guide contains no build"));
        }

        let index = params.build_index_within(builds.len());
        debug!(builds = builds.len(), index, "selected guide build");

        let blocks = extract_blocks(builds[index]);
        Ok(RawBuild { champion, blocks })
    }
}

fn extract_blocks(build: ElementRef<'_>) -> Vec<BuildBlock> {
    let block_sel =
        Selector::parse("div.view-guide__build__items div.collapseBox div.view-guide__items")
            .unwrap();
    let bar_sel = Selector::parse("div.view-guide__items__bar span").unwrap();
    let item_sel = Selector::parse("div.view-guide__items__content span.ajax-tooltip").unwrap();

    let mut blocks = Vec::new();

    for block_div in build.select(&block_sel) {
        let label = block_div
            .select(&bar_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let mut block = BuildBlock::new(label);
        block.starter = block.label.to_lowercase().starts_with("starting");

        for item in block_div.select(&item_sel) {
            if !is_item_tooltip(item) {
                continue;
            }
            if let Some(entry) = parse_item(item) {
                block.push(entry);
            }
        }

        blocks.push(block);
    }

    blocks
}

/// Tooltips carry their kind in the class list: `ajax-tooltip {t:'Item',i:'3006'}`.
fn is_item_tooltip(el: ElementRef<'_>) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|class| class.contains("t:'Item'"))
}

fn parse_item(item: ElementRef<'_>) -> Option<BuildEntry> {
    let name_sel = Selector::parse("a > span").unwrap();
    let count_sel = Selector::parse("a > label").unwrap();

    let name = item.select(&name_sel).next().map(element_text)?;
    if name.is_empty() {
        return None;
    }

    // Missing or non-numeric count labels mean a single item.
    let count = item
        .select(&count_sel)
        .next()
        .and_then(|label| element_text(label).parse::<i64>().ok())
        .unwrap_or(1);

    Some(BuildEntry::name(name).with_count(count))
}
