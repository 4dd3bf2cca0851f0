//! Name → canonical identifier resolution against one catalog snapshot.
//!
//! Every resolver borrows a [`Catalog`](crate::Catalog) and is pure: the same
//! snapshot and input always give the same answer.

mod champion;
mod enchantment;
mod item;

use itemsetcopier_shared::ItemSetError;

pub use champion::{ChampionResolver, normalize_champion_name};
pub use enchantment::{ENCHANTMENT_PREFIX, EnchantmentMatch, EnchantmentRules, disambiguate};
pub use item::{ItemResolver, QUICK_CHARGE_SUFFIX};

/// Why a champion or item could not be mapped to a catalog identifier.
///
/// Item failures are expected and non-fatal: the caller records the name as
/// outdated and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no item named <{0}>")]
    ItemNotFound(String),

    #[error("{count} items are named <{name}>")]
    AmbiguousName { name: String, count: usize },

    #[error("no item with id <{0}>")]
    UnknownItemId(String),

    #[error("base item <{base}> of <{name}> not found")]
    BaseItemNotFound { name: String, base: String },

    #[error("no <{enchanted}> is crafted from <{base_id}>")]
    NoLineageMatch { enchanted: String, base_id: String },

    #[error("{count} <{enchanted}> records are crafted from <{base_id}>")]
    AmbiguousLineage {
        enchanted: String,
        base_id: String,
        count: usize,
    },

    #[error("no champion named <{0}>")]
    ChampionNotFound(String),

    #[error("no champion with key {0}")]
    ChampionKeyNotFound(u32),
}

impl From<ResolveError> for ItemSetError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::ChampionNotFound(name) => Self::ChampionNotFound(name),
            ResolveError::ChampionKeyNotFound(key) => Self::ChampionNotFound(key.to_string()),
            item => Self::ItemUnresolved(item.to_string()),
        }
    }
}
