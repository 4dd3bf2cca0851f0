//! Build normalization: source blocks → canonical, de-duplicated blocks.

use itemsetcopier_catalog::{Catalog, ItemResolver};
use itemsetcopier_shared::{BuildBlock, CanonicalBlock, CanonicalItem, ItemRef};
use tracing::debug;

/// Knobs for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Add the `(Quick Charge)` variant next to every item that has one.
    pub include_quick_charge: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            include_quick_charge: true,
        }
    }
}

/// Resolve every entry of `blocks` against `catalog` and merge duplicates.
///
/// - Within a block, entries resolving to the same ID become one line whose
///   count is the sum; lines keep first-resolution order.
/// - Counts below 1 count as 1.
/// - Entries that fail to resolve land in the block's `unresolved` set.
/// - Starter blocks move to the front, keeping their relative order; all
///   other blocks keep input order.
pub fn normalize(
    catalog: &Catalog,
    blocks: &[BuildBlock],
    options: NormalizeOptions,
) -> Vec<CanonicalBlock> {
    let resolver = ItemResolver::new(catalog);

    let (starters, rest): (Vec<&BuildBlock>, Vec<&BuildBlock>) =
        blocks.iter().partition(|b| b.starter);

    starters
        .into_iter()
        .chain(rest)
        .map(|block| normalize_block(&resolver, block, options))
        .collect()
}

fn normalize_block(
    resolver: &ItemResolver<'_>,
    block: &BuildBlock,
    options: NormalizeOptions,
) -> CanonicalBlock {
    let mut out = CanonicalBlock {
        label: block.label.clone(),
        ..CanonicalBlock::default()
    };

    for entry in &block.entries {
        let count = clamp_count(entry.count);

        match resolver.resolve(&entry.item) {
            Ok(id) => {
                add(&mut out.items, id, count);

                if options.include_quick_charge {
                    if let ItemRef::Name(name) = &entry.item {
                        if let Some(variant) = resolver.quick_charge_variant(name) {
                            add(&mut out.items, variant, count);
                        }
                    }
                }
            }
            Err(err) => {
                debug!(
                    block = %block.label,
                    item = entry.item.label(),
                    error = %err,
                    "unresolved item"
                );
                out.unresolved.insert(entry.item.label().to_string());
            }
        }
    }

    out
}

fn add(items: &mut Vec<CanonicalItem>, id: &str, count: u32) {
    match items.iter_mut().find(|item| item.id == id) {
        Some(item) => item.count = item.count.saturating_add(count),
        None => items.push(CanonicalItem {
            id: id.to_string(),
            count,
        }),
    }
}

fn clamp_count(count: i64) -> u32 {
    u32::try_from(count.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use itemsetcopier_catalog::{ChampionRecord, ItemRecord};
    use itemsetcopier_shared::BuildEntry;

    fn catalog() -> Catalog {
        let items = BTreeMap::from([
            ("1001".to_string(), ItemRecord::new("Stalker's Blade")),
            ("1002".to_string(), ItemRecord::new("Skirmisher's Sabre")),
            (
                "1400".to_string(),
                ItemRecord::new("Enchantment: Warrior").crafted_from(["1001"]),
            ),
            (
                "1401".to_string(),
                ItemRecord::new("Enchantment: Warrior").crafted_from(["1002"]),
            ),
            ("2031".to_string(), ItemRecord::new("Refillable Potion")),
            (
                "2032".to_string(),
                ItemRecord::new("Refillable Potion (Quick Charge)"),
            ),
            ("3006".to_string(), ItemRecord::new("Berserker's Greaves")),
            ("3340".to_string(), ItemRecord::new("Warding Totem (Trinket)")),
        ]);
        Catalog::new("10.5.1", items, Vec::<ChampionRecord>::new())
    }

    fn block(label: &str, entries: Vec<BuildEntry>) -> BuildBlock {
        BuildBlock {
            label: label.into(),
            entries,
            starter: false,
        }
    }

    fn item(id: &str, count: u32) -> CanonicalItem {
        CanonicalItem {
            id: id.into(),
            count,
        }
    }

    #[test]
    fn merges_duplicates_within_block() {
        let blocks = [block(
            "Boots",
            vec![
                BuildEntry::name("Berserker's Greaves"),
                BuildEntry::id("3006").with_count(2),
            ],
        )];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        assert_eq!(out[0].items, [item("3006", 3)]);
        assert!(out[0].unresolved.is_empty());
    }

    #[test]
    fn duplicates_across_blocks_stay_separate() {
        let blocks = [
            block("A", vec![BuildEntry::name("Berserker's Greaves")]),
            block("B", vec![BuildEntry::name("Berserker's Greaves")]),
        ];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        assert_eq!(out[0].items, [item("3006", 1)]);
        assert_eq!(out[1].items, [item("3006", 1)]);
    }

    #[test]
    fn non_positive_counts_become_one() {
        let blocks = [block(
            "A",
            vec![
                BuildEntry::name("Berserker's Greaves").with_count(0),
                BuildEntry::name("Warding Totem").with_count(-4),
            ],
        )];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        assert_eq!(out[0].items, [item("3006", 1), item("3340", 1)]);
    }

    #[test]
    fn unresolved_names_do_not_abort() {
        let blocks = [block(
            "Core",
            vec![
                BuildEntry::name("Death's Dance"),
                BuildEntry::name("Berserker's Greaves"),
                BuildEntry::id("9999"),
            ],
        )];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        assert_eq!(out[0].items, [item("3006", 1)]);
        assert_eq!(
            out[0].unresolved,
            BTreeSet::from(["Death's Dance".to_string(), "9999".to_string()])
        );
    }

    #[test]
    fn enchantment_resolves_by_lineage() {
        let blocks = [block(
            "Jungle",
            vec![
                BuildEntry::name("Skirmisher's Sabre - Warrior"),
                BuildEntry::name("Stalker's Blade - Warrior"),
            ],
        )];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        assert_eq!(out[0].items, [item("1401", 1), item("1400", 1)]);
    }

    #[test]
    fn quick_charge_variant_follows_named_items() {
        let blocks = [block(
            "Start",
            vec![
                BuildEntry::name("Refillable Potion").with_count(2),
                BuildEntry::id("2031"),
            ],
        )];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        // ID references are taken as-is; only names pick up the variant.
        assert_eq!(out[0].items, [item("2031", 3), item("2032", 2)]);

        let off = NormalizeOptions {
            include_quick_charge: false,
        };
        let out = normalize(&catalog(), &blocks, off);
        assert_eq!(out[0].items, [item("2031", 3)]);
    }

    #[test]
    fn starter_blocks_move_to_front() {
        let blocks = [
            block("Core", vec![BuildEntry::name("Berserker's Greaves")]),
            block("Starter A", vec![]).starter(),
            block("Situational", vec![]),
            block("Starter B", vec![]).starter(),
        ];

        let out = normalize(&catalog(), &blocks, NormalizeOptions::default());
        let labels: Vec<&str> = out.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Starter A", "Starter B", "Core", "Situational"]);
    }
}
