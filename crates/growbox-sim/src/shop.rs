//! Shop catalog and purchase flow.
//!
//! The shop owns prices and the "owned" flags of durable items. Paying goes
//! through [`EconomyLedger::purchase`]; what a purchase does to the rest of
//! the session (new seeds, a new growbox) is applied by the caller.

use growbox_common::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

use crate::economy::{EconomyError, EconomyLedger};
use crate::equipment::{Equipment, EquipmentEffect, EquipmentSlot};
use crate::species::{Species, SpeciesCatalog};

/// Shop error types.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Item id not in the catalog
    #[error("Unknown shop item: {id}")]
    UnknownItem {
        /// Requested item
        id: ItemId,
    },
    /// Durable item bought twice
    #[error("Item already owned: {id}")]
    AlreadyOwned {
        /// Requested item
        id: ItemId,
    },
    /// Item must be bought before use
    #[error("Item not owned: {id}")]
    NotOwned {
        /// Requested item
        id: ItemId,
    },
    /// Item cannot be installed in a growbox
    #[error("Item is not equipment: {id}")]
    NotEquipment {
        /// Requested item
        id: ItemId,
    },
    /// Item listed twice in a catalog
    #[error("Duplicate shop item: {id}")]
    DuplicateItem {
        /// Duplicated item
        id: ItemId,
    },
    /// Payment failed
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

/// Result type for shop operations.
pub type ShopResult<T> = Result<T, ShopError>;

/// What a shop item is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopItemKind {
    /// A new growbox.
    Growbox {
        /// Number of slots
        capacity: usize,
    },
    /// Installable equipment or soil.
    Equipment {
        /// Where it mounts
        slot: EquipmentSlot,
        /// What it does
        effect: EquipmentEffect,
    },
    /// One seed.
    Seed {
        /// Seed species
        species: Species,
    },
}

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Price in coins.
    pub price: u64,
    /// What the item is.
    #[serde(flatten)]
    pub kind: ShopItemKind,
}

impl ShopItem {
    /// Creates a growbox item.
    #[must_use]
    pub fn growbox(id: &str, name: &str, price: u64, capacity: usize) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.to_string(),
            price,
            kind: ShopItemKind::Growbox { capacity },
        }
    }

    /// Creates an equipment item.
    #[must_use]
    pub fn equipment(
        id: &str,
        name: &str,
        price: u64,
        slot: EquipmentSlot,
        effect: EquipmentEffect,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.to_string(),
            price,
            kind: ShopItemKind::Equipment { slot, effect },
        }
    }

    /// Creates a seed item for a species.
    #[must_use]
    pub fn seed(species: Species, name: &str, price: u64) -> Self {
        Self {
            id: seed_item_id(species),
            name: format!("{name} Seeds"),
            price,
            kind: ShopItemKind::Seed { species },
        }
    }

    /// Durable items are bought once and stay owned. Seeds are consumables.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        !matches!(self.kind, ShopItemKind::Seed { .. })
    }

    /// The installable form of this item, if it is equipment.
    #[must_use]
    pub fn as_equipment(&self) -> Option<Equipment> {
        match self.kind {
            ShopItemKind::Equipment { slot, effect } => Some(Equipment {
                item: self.id.clone(),
                name: self.name.clone(),
                slot,
                effect,
            }),
            _ => None,
        }
    }
}

/// Item id of a species' seed pack.
#[must_use]
pub fn seed_item_id(species: Species) -> ItemId {
    ItemId::new(format!("{}_seeds", species.key()))
}

/// The items on sale, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ShopItem>", into = "Vec<ShopItem>")]
pub struct ShopCatalog {
    items: BTreeMap<ItemId, ShopItem>,
}

impl ShopCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_items(items: Vec<ShopItem>) -> ShopResult<Self> {
        let mut map = BTreeMap::new();
        for item in items {
            if map.contains_key(&item.id) {
                return Err(ShopError::DuplicateItem { id: item.id });
            }
            map.insert(item.id.clone(), item);
        }
        Ok(Self { items: map })
    }

    /// Growboxes, equipment and soil of the original game.
    #[must_use]
    pub fn builtin() -> Self {
        use EquipmentEffect::{AutoWater, Growth, Health, Standard, WaterRetention, Yield};
        use EquipmentSlot::{Ac, Fan, Filter, Lamp, Pump, Soil};

        let items = vec![
            ShopItem::growbox("basic_gb", "Basic Growbox", 500, 4),
            ShopItem::growbox("medium_gb", "Medium Growbox", 1200, 8),
            ShopItem::growbox("large_gb", "Large Growbox", 2500, 12),
            ShopItem::growbox("premium_gb", "Premium Growbox", 5000, 16),
            ShopItem::equipment("basic_led", "LED Light", 200, Lamp, Growth(15)),
            ShopItem::equipment("pro_led", "LED Pro", 450, Lamp, Growth(25)),
            ShopItem::equipment("carbon_filter", "Carbon Filter", 180, Filter, Yield(15)),
            ShopItem::equipment("exhaust_fan", "Exhaust Fan", 150, Fan, Health(10)),
            ShopItem::equipment("water_pump", "Auto Water", 300, Pump, AutoWater),
            ShopItem::equipment("ac_unit", "AC Unit", 800, Ac, Growth(30)),
            ShopItem::equipment("basic_soil", "Basic Soil", 30, Soil, Standard),
            ShopItem::equipment("premium_soil", "Premium Mix", 60, Soil, WaterRetention(20)),
            ShopItem::equipment("hydro_soil", "Hydroponic Mix", 120, Soil, Growth(35)),
        ];
        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    /// Adds a seed pack for every species in `species`, priced from the profile.
    ///
    /// Existing entries with the same id are kept.
    #[must_use]
    pub fn with_seeds(mut self, species: &SpeciesCatalog) -> Self {
        for profile in species.iter() {
            let item = ShopItem::seed(profile.species, &profile.name, profile.seed_price);
            self.items.entry(item.id.clone()).or_insert(item);
        }
        self
    }

    /// Looks up an item.
    pub fn item(&self, id: &ItemId) -> ShopResult<&ShopItem> {
        self.items
            .get(id)
            .ok_or_else(|| ShopError::UnknownItem { id: id.clone() })
    }

    /// Iterates items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ShopItem> + '_ {
        self.items.values()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ShopCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<ShopItem>> for ShopCatalog {
    type Error = ShopError;

    fn try_from(items: Vec<ShopItem>) -> ShopResult<Self> {
        Self::from_items(items)
    }
}

impl From<ShopCatalog> for Vec<ShopItem> {
    fn from(catalog: ShopCatalog) -> Self {
        catalog.items.into_values().collect()
    }
}

/// Shop state: catalog plus owned durable items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shop {
    catalog: ShopCatalog,
    owned: BTreeSet<ItemId>,
}

impl Shop {
    /// Creates a shop with some items already owned.
    ///
    /// Ids missing from the catalog are rejected.
    pub fn new(catalog: ShopCatalog, owned: impl IntoIterator<Item = ItemId>) -> ShopResult<Self> {
        let owned: BTreeSet<ItemId> = owned.into_iter().collect();
        for id in &owned {
            catalog.item(id)?;
        }
        Ok(Self { catalog, owned })
    }

    /// The catalog.
    #[must_use]
    pub fn catalog(&self) -> &ShopCatalog {
        &self.catalog
    }

    /// Price of an item.
    pub fn quote(&self, id: &ItemId) -> ShopResult<u64> {
        Ok(self.catalog.item(id)?.price)
    }

    /// Checks if a durable item is owned.
    #[must_use]
    pub fn owns(&self, id: &ItemId) -> bool {
        self.owned.contains(id)
    }

    /// Owned item ids.
    pub fn owned(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.owned.iter()
    }

    /// Number of owned equipment items, soil not counted.
    #[must_use]
    pub fn owned_equipment_count(&self) -> usize {
        self.owned
            .iter()
            .filter_map(|id| self.catalog.item(id).ok())
            .filter(|item| {
                matches!(item.kind, ShopItemKind::Equipment { slot, .. } if slot != EquipmentSlot::Soil)
            })
            .count()
    }

    /// Checks if the ledger can pay for an item right now.
    #[must_use]
    pub fn can_buy(&self, id: &ItemId, ledger: &EconomyLedger) -> bool {
        self.catalog
            .item(id)
            .is_ok_and(|item| !(item.is_durable() && self.owns(id)) && ledger.can_afford(item.price))
    }

    /// Buys an item, paying from `ledger`.
    ///
    /// Nothing changes if the item is unknown, already owned, or unaffordable.
    /// Returns the purchased item so the caller can apply its effect.
    pub fn checkout(&mut self, id: &ItemId, ledger: &mut EconomyLedger) -> ShopResult<ShopItem> {
        let item = self.catalog.item(id)?.clone();
        if item.is_durable() && self.owns(id) {
            return Err(ShopError::AlreadyOwned { id: id.clone() });
        }
        let balance = ledger.purchase(item.price)?;
        if item.is_durable() {
            self.owned.insert(id.clone());
        }
        debug!(item = %id, price = item.price, balance, "Item purchased");
        Ok(item)
    }

    /// Installable equipment for an owned item.
    pub fn equipment(&self, id: &ItemId) -> ShopResult<Equipment> {
        let item = self.catalog.item(id)?;
        let equipment = item
            .as_equipment()
            .ok_or_else(|| ShopError::NotEquipment { id: id.clone() })?;
        if !self.owns(id) {
            return Err(ShopError::NotOwned { id: id.clone() });
        }
        Ok(equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> Shop {
        let catalog = ShopCatalog::builtin().with_seeds(&SpeciesCatalog::builtin());
        Shop::new(
            catalog,
            ["basic_gb", "pro_led", "basic_soil"].map(ItemId::new),
        )
        .expect("shop")
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ShopCatalog::builtin();
        assert_eq!(catalog.len(), 13);
        let pro = catalog.item(&ItemId::new("pro_led")).expect("pro_led");
        assert_eq!(pro.name, "LED Pro");
        assert_eq!(pro.price, 450);
        assert_eq!(
            pro.as_equipment().map(|e| e.effect),
            Some(EquipmentEffect::Growth(25))
        );
    }

    #[test]
    fn test_seed_items_priced_from_species() {
        let catalog = ShopCatalog::builtin().with_seeds(&SpeciesCatalog::builtin());
        let seeds = catalog
            .item(&seed_item_id(Species::Pepper))
            .expect("pepper seeds");
        assert_eq!(seeds.price, 35);
        assert_eq!(seeds.name, "Pepper Seeds");
        assert!(!seeds.is_durable());
    }

    #[test]
    fn test_checkout_debits_and_marks_owned() {
        let mut shop = shop();
        let mut ledger = EconomyLedger::new(1000, 0);
        let item = shop
            .checkout(&ItemId::new("ac_unit"), &mut ledger)
            .expect("bought");
        assert_eq!(item.price, 800);
        assert_eq!(ledger.coins(), 200);
        assert!(shop.owns(&ItemId::new("ac_unit")));

        let again = shop.checkout(&ItemId::new("ac_unit"), &mut ledger);
        assert!(matches!(again, Err(ShopError::AlreadyOwned { .. })));
        assert_eq!(ledger.coins(), 200);
    }

    #[test]
    fn test_seeds_can_be_bought_repeatedly() {
        let mut shop = shop();
        let mut ledger = EconomyLedger::new(100, 0);
        let id = seed_item_id(Species::Tomato);
        shop.checkout(&id, &mut ledger).expect("first");
        shop.checkout(&id, &mut ledger).expect("second");
        assert_eq!(ledger.coins(), 60);
        assert!(!shop.owns(&id));
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut shop = shop();
        let mut ledger = EconomyLedger::new(100, 0);
        let result = shop.checkout(&ItemId::new("premium_gb"), &mut ledger);
        assert!(matches!(
            result,
            Err(ShopError::Economy(EconomyError::InsufficientFunds { .. }))
        ));
        assert_eq!(ledger.coins(), 100);
        assert!(!shop.owns(&ItemId::new("premium_gb")));
        assert_eq!(ledger.history().len(), 0);
    }

    #[test]
    fn test_unknown_item() {
        let mut shop = shop();
        let mut ledger = EconomyLedger::new(100, 0);
        assert!(matches!(
            shop.checkout(&ItemId::new("golden_hoe"), &mut ledger),
            Err(ShopError::UnknownItem { .. })
        ));
        assert!(matches!(
            Shop::new(ShopCatalog::builtin(), [ItemId::new("golden_hoe")]),
            Err(ShopError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_equipment_requires_ownership() {
        let shop = shop();
        assert!(shop.equipment(&ItemId::new("pro_led")).is_ok());
        assert!(matches!(
            shop.equipment(&ItemId::new("ac_unit")),
            Err(ShopError::NotOwned { .. })
        ));
        assert!(matches!(
            shop.equipment(&ItemId::new("basic_gb")),
            Err(ShopError::NotEquipment { .. })
        ));
    }

    #[test]
    fn test_owned_equipment_count_skips_soil() {
        let shop = shop();
        assert_eq!(shop.owned_equipment_count(), 1);
    }

    #[test]
    fn test_can_buy() {
        let shop = shop();
        let ledger = EconomyLedger::new(450, 0);
        assert!(shop.can_buy(&ItemId::new("basic_led"), &ledger));
        assert!(!shop.can_buy(&ItemId::new("pro_led"), &ledger));
        assert!(!shop.can_buy(&ItemId::new("ac_unit"), &ledger));
    }

    #[test]
    fn test_item_serialized_shape() {
        let item = ShopItem::growbox("medium_gb", "Medium Growbox", 1200, 8);
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["kind"], "growbox");
        assert_eq!(json["capacity"], 8);

        let duplicate = vec![item.clone(), item];
        assert!(matches!(
            ShopCatalog::from_items(duplicate),
            Err(ShopError::DuplicateItem { .. })
        ));
    }
}
