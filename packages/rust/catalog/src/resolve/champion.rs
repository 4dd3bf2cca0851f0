//! Champion name/key resolution.

use itemsetcopier_shared::ChampionRef;

use super::ResolveError;
use crate::model::{Catalog, ChampionRecord};

/// Trim and lowercase a champion name for comparison.
pub fn normalize_champion_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct ChampionResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> ChampionResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Match `name` against each champion's internal and display names,
    /// ignoring case and surrounding whitespace. No partial matches.
    pub fn resolve_by_name(&self, name: &str) -> Result<u32, ResolveError> {
        let wanted = normalize_champion_name(name);
        if wanted.is_empty() {
            return Err(ResolveError::ChampionNotFound(name.to_string()));
        }

        self.catalog
            .champions()
            .find(|c| {
                normalize_champion_name(&c.internal_name) == wanted
                    || normalize_champion_name(&c.display_name) == wanted
            })
            .map(|c| c.key)
            .ok_or_else(|| ResolveError::ChampionNotFound(name.to_string()))
    }

    pub fn resolve_by_key(&self, key: u32) -> Result<&'a ChampionRecord, ResolveError> {
        self.catalog
            .champion(key)
            .ok_or(ResolveError::ChampionKeyNotFound(key))
    }

    pub fn resolve(&self, champion: &ChampionRef) -> Result<&'a ChampionRecord, ResolveError> {
        match champion {
            ChampionRef::Key(key) => self.resolve_by_key(*key),
            ChampionRef::Name(name) => self.resolve_by_key(self.resolve_by_name(name)?),
        }
    }
}
