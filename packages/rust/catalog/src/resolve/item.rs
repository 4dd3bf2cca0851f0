//! Item display name → catalog ID.

use itemsetcopier_shared::ItemRef;

use super::ResolveError;
use super::enchantment::{EnchantmentMatch, EnchantmentRules, disambiguate};
use crate::model::Catalog;

/// Suffix of the alternate-mode variant some items have in the catalog.
pub const QUICK_CHARGE_SUFFIX: &str = " (Quick Charge)";

pub struct ItemResolver<'a> {
    catalog: &'a Catalog,
    rules: &'a EnchantmentRules,
}

impl<'a> ItemResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_rules(catalog, EnchantmentRules::standard())
    }

    pub fn with_rules(catalog: &'a Catalog, rules: &'a EnchantmentRules) -> Self {
        Self { catalog, rules }
    }

    /// Resolve a source-side display name.
    ///
    /// Enchanted jungle items go through lineage disambiguation; everything
    /// else is a trinket-alias or exact (case-sensitive) name match.
    pub fn resolve_item_name(&self, name: &str) -> Result<&'a str, ResolveError> {
        if let Some(found) = self.rules.detect(name) {
            return self.resolve_enchanted(name, found);
        }
        self.resolve_plain(name)
    }

    /// Accept an ID only if the snapshot knows it.
    pub fn resolve_id(&self, id: &str) -> Result<&'a str, ResolveError> {
        self.catalog
            .item_id(id)
            .ok_or_else(|| ResolveError::UnknownItemId(id.to_string()))
    }

    pub fn resolve(&self, item: &ItemRef) -> Result<&'a str, ResolveError> {
        match item {
            ItemRef::Name(name) => self.resolve_item_name(name),
            ItemRef::Id(id) => self.resolve_id(id),
        }
    }

    /// ID of `<name> (Quick Charge)`, when the catalog has one.
    pub fn quick_charge_variant(&self, name: &str) -> Option<&'a str> {
        match self
            .catalog
            .item_ids_named(&format!("{name}{QUICK_CHARGE_SUFFIX}"))
        {
            [id] => Some(id.as_str()),
            _ => None,
        }
    }

    fn resolve_enchanted(
        &self,
        name: &str,
        found: EnchantmentMatch<'_>,
    ) -> Result<&'a str, ResolveError> {
        let base_id = self.resolve_plain(found.base_name).map_err(|_| {
            ResolveError::BaseItemNotFound {
                name: name.to_string(),
                base: found.base_name.to_string(),
            }
        })?;
        disambiguate(self.catalog, &found.enchanted_name(), base_id)
    }

    fn resolve_plain(&self, name: &str) -> Result<&'a str, ResolveError> {
        let ids = match self.catalog.trinket_ids_aliased(name) {
            [] => self.catalog.item_ids_named(name),
            trinkets => trinkets,
        };

        match ids {
            [id] => Ok(id.as_str()),
            [] => Err(ResolveError::ItemNotFound(name.to_string())),
            several => Err(ResolveError::AmbiguousName {
                name: name.to_string(),
                count: several.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::sample_catalog;

    #[test]
    fn exact_name_match() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(resolver.resolve_item_name("Berserker's Greaves"), Ok("3006"));
        // Case-sensitive and untrimmed.
        assert!(resolver.resolve_item_name("berserker's greaves").is_err());
        assert!(resolver.resolve_item_name(" Berserker's Greaves").is_err());
    }

    #[test]
    fn trinket_suffix_is_optional() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(resolver.resolve_item_name("Warding Totem"), Ok("3340"));
        assert_eq!(resolver.resolve_item_name("Warding Totem (Trinket)"), Ok("3340"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        let first = resolver.resolve_item_name("Stalker's Blade - Warrior");
        let second = resolver.resolve_item_name("Stalker's Blade - Warrior");
        assert_eq!(first, second);
    }

    #[test]
    fn enchanted_name_follows_base_lineage() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(resolver.resolve_item_name("Stalker's Blade - Warrior"), Ok("1400"));
        assert_eq!(
            resolver.resolve_item_name("Skirmisher's Sabre - Warrior"),
            Ok("1401")
        );
        assert_eq!(
            resolver.resolve_item_name("Stalker's Blade - Cinderhulk"),
            Ok("1402")
        );
    }

    #[test]
    fn enchantment_without_lineage_is_unresolved() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert!(matches!(
            resolver.resolve_item_name("Skirmisher's Sabre - Cinderhulk"),
            Err(ResolveError::NoLineageMatch { .. })
        ));
    }

    #[test]
    fn missing_base_item_is_unresolved() {
        let catalog = sample_catalog();
        let rules = EnchantmentRules::new(&["Tracker's Knife"], &["Warrior"]);
        let resolver = ItemResolver::with_rules(&catalog, &rules);

        assert_eq!(
            resolver.resolve_item_name("Tracker's Knife - Warrior"),
            Err(ResolveError::BaseItemNotFound {
                name: "Tracker's Knife - Warrior".into(),
                base: "Tracker's Knife".into(),
            })
        );
    }

    #[test]
    fn bare_shared_enchantment_name_is_ambiguous() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(
            resolver.resolve_item_name("Enchantment: Warrior"),
            Err(ResolveError::AmbiguousName {
                name: "Enchantment: Warrior".into(),
                count: 2,
            })
        );
    }

    #[test]
    fn ids_must_exist_in_snapshot() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(resolver.resolve(&ItemRef::Id("3006".into())), Ok("3006"));
        assert_eq!(
            resolver.resolve(&ItemRef::Id("9999".into())),
            Err(ResolveError::UnknownItemId("9999".into()))
        );
    }

    #[test]
    fn quick_charge_variant_lookup() {
        let catalog = sample_catalog();
        let resolver = ItemResolver::new(&catalog);

        assert_eq!(resolver.quick_charge_variant("Refillable Potion"), Some("2032"));
        assert_eq!(resolver.quick_charge_variant("Health Potion"), None);
    }
}
