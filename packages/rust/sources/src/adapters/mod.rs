//! Source adapter trait and built-in adapters for build extraction.
//!
//! Each adapter understands one site's document layout and turns an already
//! retrieved page (HTML or JSON) into a [`RawBuild`]. Adapters never touch the
//! network.

mod championgg;
mod mobafire;
mod mobalytics;
mod opgg;

use regex::Regex;

use itemsetcopier_shared::{BuildBlock, ChampionRef, Result};

use crate::params::{SourceParams, validate_params};

pub use championgg::ChampionggAdapter;
pub use mobafire::MobafireAdapter;
pub use mobalytics::MobalyticsAdapter;
pub use opgg::OpggAdapter;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A build as a source publishes it, before any catalog resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuild {
    pub champion: ChampionRef,
    pub blocks: Vec<BuildBlock>,
}

/// Trait for site-specific build extraction.
pub trait SourceAdapter: Send + Sync {
    /// Short identifier used on the command line and in logs.
    fn name(&self) -> &str;

    /// Human-readable site name.
    fn site(&self) -> &str;

    /// Pattern a build page URL of this site must match.
    fn url_pattern(&self) -> &Regex;

    /// Roles this site organizes builds by; empty when it doesn't.
    fn roles(&self) -> &[&str] {
        &[]
    }

    /// Whether `url` points at a build page of this site.
    fn matches_url(&self, url: &str) -> bool {
        self.url_pattern().is_match(url.trim())
    }

    /// Check the request parameters before any extraction work.
    fn validate(&self, params: &SourceParams) -> Result<()> {
        validate_params(params, self.url_pattern(), self.roles())
    }

    /// Parse `document` into champion + blocks.
    fn extract_build(&self, params: &SourceParams, document: &str) -> Result<RawBuild>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds the built-in adapters.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(MobafireAdapter),
                Box::new(MobalyticsAdapter),
                Box::new(OpggAdapter),
                Box::new(ChampionggAdapter),
            ],
        }
    }

    /// Look an adapter up by its [`name`](SourceAdapter::name), ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&dyn SourceAdapter> {
        let wanted = name.trim();
        self.adapters
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .map(|a| a.as_ref())
    }

    /// The adapter whose URL pattern matches `url`, if any.
    pub fn detect(&self, url: &str) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .find(|a| a.matches_url(url))
            .map(|a| a.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SourceAdapter> {
        self.adapters.iter().map(|a| a.as_ref())
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed text content of an element.
pub(crate) fn element_text(el: scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Item ID encoded in an image file name: `.../item/3078.png?v=1` → `3078`.
pub(crate) fn id_from_image_src(src: &str) -> Option<String> {
    let file = src.split(['?', '#']).next()?.rsplit('/').next()?;
    let id = file.split('.').next()?;
    (!id.is_empty()).then(|| id.to_string())
}
