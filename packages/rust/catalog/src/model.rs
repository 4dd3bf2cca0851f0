//! Immutable catalog snapshot: every item and champion of one version.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Suffix the catalog appends to trinket names and some sources omit.
pub const TRINKET_SUFFIX: &str = " (Trinket)";

/// An item record as published by the reference-data service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRecord {
    /// Canonical display name. Not unique for enchantments.
    pub name: String,
    /// Crafting lineage: IDs of the items this one is built from.
    pub crafted_from: BTreeSet<String>,
}

impl ItemRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            crafted_from: BTreeSet::new(),
        }
    }

    pub fn crafted_from<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crafted_from = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// A champion record as published by the reference-data service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionRecord {
    /// Numeric catalog key (used by the item set file).
    pub key: u32,
    /// Internal identifier, e.g. `MonkeyKing`.
    pub internal_name: String,
    /// Display name, e.g. `Wukong`.
    pub display_name: String,
}

/// Versioned snapshot of the item and champion catalogs.
///
/// Built once per refresh and shared behind an `Arc`; never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    items: BTreeMap<String, ItemRecord>,
    champions: BTreeMap<u32, ChampionRecord>,
    /// Display name → IDs in ascending ID order.
    items_by_name: HashMap<String, Vec<String>>,
    /// Trinket name without [`TRINKET_SUFFIX`] → IDs.
    items_by_trinket_alias: HashMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new(
        version: impl Into<String>,
        items: BTreeMap<String, ItemRecord>,
        champions: impl IntoIterator<Item = ChampionRecord>,
    ) -> Self {
        let mut items_by_name: HashMap<String, Vec<String>> = HashMap::new();
        let mut items_by_trinket_alias: HashMap<String, Vec<String>> = HashMap::new();

        for (id, item) in &items {
            items_by_name
                .entry(item.name.clone())
                .or_default()
                .push(id.clone());

            if let Some(alias) = item.name.strip_suffix(TRINKET_SUFFIX) {
                items_by_trinket_alias
                    .entry(alias.to_string())
                    .or_default()
                    .push(id.clone());
            }
        }

        Self {
            version: version.into(),
            items,
            champions: champions.into_iter().map(|c| (c.key, c)).collect(),
            items_by_name,
            items_by_trinket_alias,
        }
    }

    /// Version tag this snapshot was fetched for.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn item(&self, id: &str) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    /// The snapshot's own copy of `id`, if the item exists.
    pub fn item_id(&self, id: &str) -> Option<&str> {
        self.items.get_key_value(id).map(|(key, _)| key.as_str())
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All items in ascending ID order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &ItemRecord)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    /// IDs whose canonical display name is exactly `name`, in ascending order.
    pub fn item_ids_named(&self, name: &str) -> &[String] {
        self.items_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// IDs of trinkets whose name minus the trinket suffix is exactly `alias`.
    pub fn trinket_ids_aliased(&self, alias: &str) -> &[String] {
        self.items_by_trinket_alias
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn champion(&self, key: u32) -> Option<&ChampionRecord> {
        self.champions.get(&key)
    }

    /// All champions in ascending key order.
    pub fn champions(&self) -> impl Iterator<Item = &ChampionRecord> {
        self.champions.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn champion_count(&self) -> usize {
        self.champions.len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A small catalog covering trinkets, enchantments and Quick Charge items.
    pub(crate) fn sample_catalog() -> Catalog {
        let items = BTreeMap::from([
            ("1001".to_string(), ItemRecord::new("Stalker's Blade")),
            ("1002".to_string(), ItemRecord::new("Skirmisher's Sabre")),
            (
                "1400".to_string(),
                ItemRecord::new("Enchantment: Warrior").crafted_from(["1001", "3133"]),
            ),
            (
                "1401".to_string(),
                ItemRecord::new("Enchantment: Warrior").crafted_from(["1002", "3133"]),
            ),
            (
                "1402".to_string(),
                ItemRecord::new("Enchantment: Cinderhulk").crafted_from(["1001"]),
            ),
            ("3006".to_string(), ItemRecord::new("Berserker's Greaves")),
            ("3133".to_string(), ItemRecord::new("Caulfield's Warhammer")),
            ("3340".to_string(), ItemRecord::new("Warding Totem (Trinket)")),
            ("3363".to_string(), ItemRecord::new("Farsight Alteration")),
            ("2003".to_string(), ItemRecord::new("Health Potion")),
            ("2031".to_string(), ItemRecord::new("Refillable Potion")),
            (
                "2032".to_string(),
                ItemRecord::new("Refillable Potion (Quick Charge)"),
            ),
        ]);

        let champions = [
            ChampionRecord {
                key: 103,
                internal_name: "Ahri".into(),
                display_name: "Ahri".into(),
            },
            ChampionRecord {
                key: 104,
                internal_name: "Graves".into(),
                display_name: "Graves".into(),
            },
            ChampionRecord {
                key: 62,
                internal_name: "MonkeyKing".into(),
                display_name: "Wukong".into(),
            },
        ];

        Catalog::new("10.5.1", items, champions)
    }
}
