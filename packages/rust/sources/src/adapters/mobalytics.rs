//! Mobalytics build adapter.
//!
//! Mobalytics serves builds from a JSON meta document rather than HTML. The
//! document lists roles, each with named builds; a build has four fixed
//! "general" groups plus any number of situational ones. Items are IDs.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{RawBuild, SourceAdapter};
use crate::params::{SourceParams, pick_champion, url_capture};
use itemsetcopier_shared::{BuildBlock, BuildEntry, ItemRef, ItemSetError, Result};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?app\.mobalytics\.gg/champions/(?P<champion>[A-Za-z]+)/build")
        .unwrap()
});

#[derive(Debug, Deserialize)]
struct MetaDocument {
    data: MetaData,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(default)]
    roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
struct Role {
    #[serde(default)]
    builds: Vec<Build>,
}

#[derive(Debug, Deserialize)]
struct Build {
    name: String,
    items: BuildItems,
}

#[derive(Debug, Deserialize)]
struct BuildItems {
    general: GeneralGroups,
    #[serde(default)]
    situational: Vec<SituationalGroup>,
}

/// Absent groups produce no block; present but empty ones do.
#[derive(Debug, Default, Deserialize)]
struct GeneralGroups {
    start: Option<Vec<String>>,
    early: Option<Vec<String>>,
    core: Option<Vec<String>>,
    full: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SituationalGroup {
    name: String,
    #[serde(default)]
    build: Vec<String>,
}

/// Extracts builds from the Mobalytics champion meta document.
pub struct MobalyticsAdapter;

impl SourceAdapter for MobalyticsAdapter {
    fn name(&self) -> &str {
        "mobalytics"
    }

    fn site(&self) -> &str {
        "Mobalytics"
    }

    fn url_pattern(&self) -> &Regex {
        &URL_PATTERN
    }

    #[instrument(skip_all, fields(adapter = "mobalytics"))]
    fn extract_build(&self, params: &SourceParams, document: &str) -> Result<RawBuild> {
        let found = url_capture(params, &URL_PATTERN, "champion");
        let champion = pick_champion(params, found)?;

        let meta: MetaDocument = serde_json::from_str(document)
            .map_err(|e| ItemSetError::parse(format!("malformed Mobalytics document: {e}")))?;

        let build = select_build(&meta.data, params.build_name.as_deref())?;
        debug!(build = %build.name, "selected build");

        Ok(RawBuild {
            champion,
            blocks: build_blocks(build),
        })
    }
}

/// The build named `wanted` (case-insensitive, any role), or the first build of
/// the first role.
fn select_build<'d>(data: &'d MetaData, wanted: Option<&str>) -> Result<&'d Build> {
    let mut builds = data.roles.iter().flat_map(|role| role.builds.iter());

    match wanted {
        Some(name) => builds
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ItemSetError::invalid_input(format!("no build named <{name}>"))),
        None => data
            .roles
            .first()
            .and_then(|role| role.builds.first())
            .ok_or_else(|| ItemSetError::parse("Mobalytics document contains no build")),
    }
}

fn build_blocks(build: &Build) -> Vec<BuildBlock> {
    let general = &build.items.general;

    let mut blocks: Vec<BuildBlock> = [
        ("Starter", &general.start, true),
        ("Early items", &general.early, false),
        ("Core items", &general.core, false),
        ("Full build", &general.full, false),
    ]
    .into_iter()
    .filter_map(|(label, ids, starter)| {
        let mut block = counted_block(label, ids.as_deref()?);
        block.starter = starter;
        Some(block)
    })
    .collect();

    blocks.extend(
        build
            .items
            .situational
            .iter()
            .map(|group| counted_block(format!("Situational - {}", group.name), &group.build)),
    );

    blocks
}

/// One entry per distinct ID, counted by repetitions, in first-seen order.
fn counted_block(label: impl Into<String>, ids: &[String]) -> BuildBlock {
    let mut block = BuildBlock::new(label);

    for id in ids {
        let seen = block
            .entries
            .iter_mut()
            .find(|e| matches!(&e.item, ItemRef::Id(existing) if existing == id));
        match seen {
            Some(entry) => entry.count += 1,
            None => block.push(BuildEntry::id(id.clone())),
        }
    }

    block
}
