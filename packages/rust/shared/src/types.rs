//! Core domain types: raw builds coming out of source adapters, the canonical
//! blocks produced by normalization, and the item-set file format consumed by
//! the game client.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ItemSetError, Result};

/// Maximum length (in characters) of an in-game item set title.
pub const TITLE_MAX_LENGTH: usize = 75;

/// Validate an item set title: 1 to [`TITLE_MAX_LENGTH`] characters inclusive.
pub fn validate_title(title: &str) -> Result<()> {
    let len = title.chars().count();
    if len == 0 || len > TITLE_MAX_LENGTH {
        return Err(ItemSetError::invalid_input(format!(
            "the length of an item set's title must be between 1 and {TITLE_MAX_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ChampionRef
// ---------------------------------------------------------------------------

/// How a request identifies its champion: by catalog key or by free-text name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChampionRef {
    /// Numeric catalog key (e.g. `103`).
    Key(u32),
    /// Internal identifier or display name, matched case-insensitively.
    Name(String),
}

impl ChampionRef {
    /// Parse a champion key given as text. Non-numeric input is rejected.
    pub fn parse_key(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map(Self::Key)
            .map_err(|_| {
                ItemSetError::invalid_input(format!("champion key must be numeric: <{s}>"))
            })
    }
}

impl std::str::FromStr for ChampionRef {
    type Err = ItemSetError;

    /// All-digit input is a key; anything else is a name.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ItemSetError::invalid_input("champion must not be empty"));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Self::parse_key(trimmed);
        }
        Ok(Self::Name(s.to_string()))
    }
}

impl std::fmt::Display for ChampionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw builds (source adapter output)
// ---------------------------------------------------------------------------

/// An item as a source site refers to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    /// Display name, resolved through the item resolver.
    Name(String),
    /// Catalog identifier published directly by the source.
    Id(String),
}

impl ItemRef {
    /// The text to report when this reference cannot be resolved.
    pub fn label(&self) -> &str {
        match self {
            Self::Name(s) | Self::Id(s) => s,
        }
    }
}

/// One `(item, count)` line of a source build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    pub item: ItemRef,
    /// Requested count. Sources that do not specify one use 1; values below 1
    /// are treated as 1 during normalization.
    pub count: i64,
}

impl BuildEntry {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            item: ItemRef::Name(name.into()),
            count: 1,
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self {
            item: ItemRef::Id(id.into()),
            count: 1,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }
}

/// A labelled group of items as published by a source (e.g. "Core Items").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildBlock {
    pub label: String,
    pub entries: Vec<BuildEntry>,
    /// Starter categories are moved to the front of the final item set.
    pub starter: bool,
}

impl BuildBlock {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
            starter: false,
        }
    }

    pub fn starter(mut self) -> Self {
        self.starter = true;
        self
    }

    pub fn push(&mut self, entry: BuildEntry) {
        self.entries.push(entry);
    }
}

// ---------------------------------------------------------------------------
// Canonical blocks (normalizer output)
// ---------------------------------------------------------------------------

/// A resolved item line: no two lines of one block share an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalItem {
    pub id: String,
    pub count: u32,
}

/// A normalized block of catalog identifiers plus the names that failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalBlock {
    pub label: String,
    pub items: Vec<CanonicalItem>,
    pub unresolved: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Item set file format
// ---------------------------------------------------------------------------

/// An item set as imported by the game client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSet {
    /// Always exactly one champion key.
    pub associated_champions: Vec<u32>,
    /// Always empty.
    pub associated_maps: Vec<u32>,
    pub title: String,
    pub blocks: Vec<ItemSetBlock>,
}

impl ItemSet {
    pub fn new(champion_key: u32, title: impl Into<String>, blocks: &[CanonicalBlock]) -> Self {
        Self {
            associated_champions: vec![champion_key],
            associated_maps: Vec::new(),
            title: title.into(),
            blocks: blocks.iter().map(ItemSetBlock::from).collect(),
        }
    }
}

/// One block of the item set file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSetBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub show_if_summoner_spell: String,
    pub hide_if_summoner_spell: String,
    pub items: Vec<CanonicalItem>,
}

impl From<&CanonicalBlock> for ItemSetBlock {
    fn from(block: &CanonicalBlock) -> Self {
        Self {
            kind: block.label.clone(),
            show_if_summoner_spell: String::new(),
            hide_if_summoner_spell: String::new(),
            items: block.items.clone(),
        }
    }
}
