//! Growbox equipment and its effects.
//!
//! Each growbox has one mounting point per [`EquipmentSlot`]. Only growth
//! effects change the simulation: the installed loadout is the growbox's
//! default [`GrowthRate`]. Yield, health and water-retention effects are
//! carried for display.

use growbox_common::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::plants::{GrowthRate, Plant, BASE_RATE_PERCENT};

/// Mounting point in a growbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    /// Grow lamp.
    Lamp,
    /// Air filter.
    Filter,
    /// Exhaust fan.
    Fan,
    /// Air conditioning.
    Ac,
    /// Soil or growing medium.
    Soil,
    /// Water pump.
    Pump,
}

/// Effect of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentEffect {
    /// Growth speed bonus in percent.
    Growth(u32),
    /// Yield bonus in percent.
    Yield(u32),
    /// Plant health bonus in percent.
    Health(u32),
    /// Water retention bonus in percent.
    WaterRetention(u32),
    /// Automatic watering.
    AutoWater,
    /// No bonus.
    Standard,
}

impl EquipmentEffect {
    /// Growth bonus in percent (0 for non-growth effects).
    #[must_use]
    pub fn growth_percent(self) -> u32 {
        match self {
            Self::Growth(percent) => percent,
            _ => 0,
        }
    }
}

impl std::fmt::Display for EquipmentEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Growth(p) => write!(f, "+{p}% growth"),
            Self::Yield(p) => write!(f, "+{p}% yield"),
            Self::Health(p) => write!(f, "+{p}% health"),
            Self::WaterRetention(p) => write!(f, "+{p}% water retention"),
            Self::AutoWater => f.write_str("Auto watering"),
            Self::Standard => f.write_str("Standard growth"),
        }
    }
}

/// A piece of equipment that can be installed in a growbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Shop item this equipment comes from.
    pub item: ItemId,
    /// Display name.
    pub name: String,
    /// Where it mounts.
    pub slot: EquipmentSlot,
    /// What it does.
    pub effect: EquipmentEffect,
}

/// Equipment installed in one growbox, at most one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    installed: BTreeMap<EquipmentSlot, Equipment>,
}

impl Loadout {
    /// Creates an empty loadout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs equipment, returning whatever occupied the slot before.
    pub fn install(&mut self, equipment: Equipment) -> Option<Equipment> {
        self.installed.insert(equipment.slot, equipment)
    }

    /// Removes the equipment in a slot.
    pub fn remove(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        self.installed.remove(&slot)
    }

    /// Equipment in a slot.
    #[must_use]
    pub fn get(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.installed.get(&slot)
    }

    /// Checks if a shop item is installed here.
    #[must_use]
    pub fn contains(&self, item: &ItemId) -> bool {
        self.installed.values().any(|e| &e.item == item)
    }

    /// Iterates installed equipment in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Equipment> + '_ {
        self.installed.values()
    }

    /// Sum of growth bonuses, in percent.
    #[must_use]
    pub fn growth_bonus_percent(&self) -> u32 {
        self.installed
            .values()
            .map(|e| e.effect.growth_percent())
            .fold(0, u32::saturating_add)
    }
}

impl GrowthRate for Loadout {
    fn percent(&self, _plant: &Plant) -> u32 {
        BASE_RATE_PERCENT.saturating_add(self.growth_bonus_percent())
    }
}
