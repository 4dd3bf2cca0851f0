//! Champion.gg adapter.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

use super::{RawBuild, SourceAdapter, element_text, id_from_image_src};
use crate::params::{SourceParams, pick_champion, url_capture};
use itemsetcopier_shared::{BuildBlock, BuildEntry, ItemSetError, Result};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?champion\.gg/champion/(?P<champion>[A-Za-z]+)/(?P<role>Top|Jungle|Middle|ADC|Support)",
    )
    .unwrap()
});

const ROLES: &[&str] = &["Top", "Jungle", "Middle", "ADC", "Support"];

/// Extracts builds from Champion.gg champion pages.
///
/// The build column holds sections of headed build rows. Sections are taken
/// bottom-up so starters lead; each row is a block named by its heading.
pub struct ChampionggAdapter;

impl SourceAdapter for ChampionggAdapter {
    fn name(&self) -> &str {
        "championgg"
    }

    fn site(&self) -> &str {
        "Champion.gg"
    }

    fn url_pattern(&self) -> &Regex {
        &URL_PATTERN
    }

    fn roles(&self) -> &[&str] {
        ROLES
    }

    #[instrument(skip_all, fields(adapter = "championgg"))]
    fn extract_build(&self, params: &SourceParams, document: &str) -> Result<RawBuild> {
        let found = url_capture(params, &URL_PATTERN, "champion");
        let champion = pick_champion(params, found)?;

        let doc = Html::parse_document(document);
        let area_sel = Selector::parse("div.champion-area").unwrap();
        let column_sel = Selector::parse("div.col-md-6").unwrap();

        let column = doc
            .select(&area_sel)
            .nth(1)
            .and_then(|area| area.select(&column_sel).nth(1))
            .ok_or_else(|| ItemSetError::parse("Champion.gg page has no build column"))?;

        Ok(RawBuild {
            champion,
            blocks: extract_blocks(column),
        })
    }
}

fn extract_blocks(column: ElementRef<'_>) -> Vec<BuildBlock> {
    let section_sel = Selector::parse("div.col-xs-12").unwrap();
    let heading_sel = Selector::parse("h2.champion-stats").unwrap();
    let build_sel = Selector::parse("div.build-wrapper").unwrap();

    let sections: Vec<ElementRef<'_>> = column.select(&section_sel).collect();
    let mut blocks = Vec::new();

    for section in sections.into_iter().rev() {
        let headings = section.select(&heading_sel).map(element_text);
        let builds = section.select(&build_sel);

        for (heading, build) in headings.zip(builds) {
            let mut block = BuildBlock::new(heading);
            block.starter = block.label.contains("Starters");
            block.entries = build_items(build);
            blocks.push(block);
        }
    }

    blocks
}

fn build_items(build: ElementRef<'_>) -> Vec<BuildEntry> {
    let img_sel = Selector::parse("a img").unwrap();

    build
        .select(&img_sel)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(id_from_image_src)
        .map(BuildEntry::id)
        .collect()
}
