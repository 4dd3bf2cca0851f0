//! OP.GG champion statistics adapter.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

use super::{RawBuild, SourceAdapter, element_text, id_from_image_src};
use crate::params::{SourceParams, pick_champion, url_capture};
use itemsetcopier_shared::{BuildBlock, BuildEntry, ItemSetError, Result};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?((www|na)\.)?op\.gg/champion/(?P<champion>[A-Za-z]+)/statistics/(?P<role>top|jungle|mid|bot|support)",
    )
    .unwrap()
});

const ROLES: &[&str] = &["top", "jungle", "mid", "bot", "support"];

/// Section from which every remaining row is folded into one block.
const BOOTS_SECTION: &str = "Boots";

/// Extracts the recommended builds table from OP.GG statistics pages.
///
/// Rows are grouped under section headings; each row becomes its own block
/// labelled `<section> #<n>`, except that the boots section and everything
/// after it collapse into a single "Boots" block. Items are IDs taken from
/// image file names.
pub struct OpggAdapter;

impl SourceAdapter for OpggAdapter {
    fn name(&self) -> &str {
        "opgg"
    }

    fn site(&self) -> &str {
        "OP.GG"
    }

    fn url_pattern(&self) -> &Regex {
        &URL_PATTERN
    }

    fn roles(&self) -> &[&str] {
        ROLES
    }

    #[instrument(skip_all, fields(adapter = "opgg"))]
    fn extract_build(&self, params: &SourceParams, document: &str) -> Result<RawBuild> {
        let found = url_capture(params, &URL_PATTERN, "champion");
        let champion = pick_champion(params, found)?;

        let doc = Html::parse_document(document);
        let table_sel = Selector::parse("table.champion-overview__table").unwrap();
        // The first table holds summoner spells; builds are in the second.
        let table = doc
            .select(&table_sel)
            .nth(1)
            .ok_or_else(|| ItemSetError::parse("OP.GG page has no build table"))?;

        Ok(RawBuild {
            champion,
            blocks: extract_blocks(table),
        })
    }
}

fn extract_blocks(table: ElementRef<'_>) -> Vec<BuildBlock> {
    let row_sel = Selector::parse("tbody > tr").unwrap();
    let heading_sel = Selector::parse("th").unwrap();

    let mut blocks = Vec::new();
    let mut section = String::new();
    let mut position = 1;
    let mut boots: Option<BuildBlock> = None;

    for row in table.select(&row_sel) {
        if let Some(boots) = boots.as_mut() {
            boots.entries.extend(row_items(row));
            continue;
        }

        if let Some(heading) = row.select(&heading_sel).next() {
            section = element_text(heading);
            position = 1;

            if section == BOOTS_SECTION {
                let mut block = BuildBlock::new(BOOTS_SECTION);
                block.entries.extend(row_items(row));
                boots = Some(block);
                continue;
            }
        }

        let mut block = BuildBlock::new(format!("{section} #{position}"));
        block.starter = section.to_lowercase().starts_with("starter");
        block.entries.extend(row_items(row));
        blocks.push(block);
        position += 1;
    }

    blocks.extend(boots);
    blocks
}

fn row_items(row: ElementRef<'_>) -> Vec<BuildEntry> {
    let cell_sel = Selector::parse("td").unwrap();
    let img_sel = Selector::parse("li.champion-stats__list__item img").unwrap();

    let Some(cell) = row.select(&cell_sel).next() else {
        return Vec::new();
    };

    cell.select(&img_sel)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(id_from_image_src)
        .map(BuildEntry::id)
        .collect()
}
