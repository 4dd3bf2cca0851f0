//! Enchanted jungle item disambiguation.
//!
//! The catalog gives every enchanted variant of an upgradeable base item the
//! same display name (`Enchantment: Warrior` exists once per base item line).
//! The records differ only in their crafting lineage, so the variant is picked
//! by checking which record is crafted from the base item the source showed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::ResolveError;
use crate::model::Catalog;

/// Prefix the catalog puts in front of every enchantment name.
pub const ENCHANTMENT_PREFIX: &str = "Enchantment: ";

static DEFAULT_RULES: LazyLock<EnchantmentRules> = LazyLock::new(|| {
    EnchantmentRules::new(
        &["Stalker's Blade", "Skirmisher's Sabre"],
        &["Warrior", "Cinderhulk", "Runic Echoes", "Bloodrazor"],
    )
});

/// Base item and enchantment keyword found together in one source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnchantmentMatch<'n> {
    pub base_name: &'n str,
    pub enchantment: &'n str,
}

impl EnchantmentMatch<'_> {
    /// Catalog display name of the enchanted item, e.g. `Enchantment: Warrior`.
    pub fn enchanted_name(&self) -> String {
        format!("{ENCHANTMENT_PREFIX}{}", self.enchantment)
    }
}

/// The fixed sets of upgradeable base names and enchantment keywords.
#[derive(Debug, Clone)]
pub struct EnchantmentRules {
    bases: Option<Regex>,
    enchantments: Option<Regex>,
}

impl EnchantmentRules {
    pub fn new(bases: &[&str], enchantments: &[&str]) -> Self {
        Self {
            bases: alternation(bases),
            enchantments: alternation(enchantments),
        }
    }

    /// The jungle item rules the catalog currently needs.
    pub fn standard() -> &'static Self {
        &DEFAULT_RULES
    }

    /// Both a base name and an enchantment keyword must occur in `text`.
    pub fn detect<'n>(&self, text: &'n str) -> Option<EnchantmentMatch<'n>> {
        let base = self.bases.as_ref()?.find(text)?;
        let enchantment = self.enchantments.as_ref()?.find(text)?;
        Some(EnchantmentMatch {
            base_name: base.as_str(),
            enchantment: enchantment.as_str(),
        })
    }
}

impl Default for EnchantmentRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

/// Regex matching any of `words` literally; `None` for an empty list.
fn alternation(words: &[&str]) -> Option<Regex> {
    if words.is_empty() {
        return None;
    }
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    let pattern = format!("({})", escaped.join("|"));
    Regex::new(&pattern).ok()
}

/// Pick the record named `enchanted_name` whose lineage contains `base_id`.
///
/// Exactly one such record must exist per catalog version. Zero or several
/// leave the name unresolved rather than guessing.
pub fn disambiguate<'c>(
    catalog: &'c Catalog,
    enchanted_name: &str,
    base_id: &str,
) -> Result<&'c str, ResolveError> {
    let candidates: Vec<&'c str> = catalog
        .item_ids_named(enchanted_name)
        .iter()
        .filter(|id| {
            catalog
                .item(id)
                .is_some_and(|item| item.crafted_from.contains(base_id))
        })
        .map(String::as_str)
        .collect();

    match candidates.as_slice() {
        [id] => Ok(*id),
        [] => Err(ResolveError::NoLineageMatch {
            enchanted: enchanted_name.to_string(),
            base_id: base_id.to_string(),
        }),
        several => {
            warn!(
                enchanted = enchanted_name,
                base_id,
                candidates = ?several,
                "enchantment lineage is ambiguous in this catalog version"
            );
            Err(ResolveError::AmbiguousLineage {
                enchanted: enchanted_name.to_string(),
                base_id: base_id.to_string(),
                count: several.len(),
            })
        }
    }
}
