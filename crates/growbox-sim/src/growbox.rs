//! Growbox inventory: a fixed number of plant slots.
//!
//! A growbox exclusively owns its plants. Commands validate against the
//! current slot state before touching anything, so a failed command leaves
//! slots, seeds and plants exactly as they were.

use growbox_common::{GrowboxId, PlantId, SimTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::equipment::Loadout;
use crate::plants::{GrowthRate, GrowthStage, Harvest, Plant, PlantError};
use crate::seeds::{SeedError, SeedInventory};
use crate::species::{Species, SpeciesCatalog};

/// Growbox error types.
#[derive(Debug, Error)]
pub enum GrowboxError {
    /// Growbox created without slots
    #[error("Growbox capacity must be at least 1")]
    InvalidCapacity,
    /// Slot index past the end of the growbox
    #[error("Slot {slot} out of range (capacity {capacity})")]
    SlotOutOfRange {
        /// Requested slot
        slot: usize,
        /// Growbox capacity
        capacity: usize,
    },
    /// Slot already holds a plant
    #[error("Slot {slot} is already occupied by {occupant}")]
    SlotOccupied {
        /// Requested slot
        slot: usize,
        /// Plant in the slot
        occupant: PlantId,
    },
    /// No slot holds the plant
    #[error("Plant not found: {id}")]
    PlantNotFound {
        /// Plant that was looked up
        id: PlantId,
    },
    /// Seed inventory error
    #[error(transparent)]
    Seed(#[from] SeedError),
    /// Plant lifecycle error
    #[error(transparent)]
    Plant(#[from] PlantError),
}

/// Result type for growbox operations.
pub type GrowboxResult<T> = Result<T, GrowboxError>;

/// Read-only copy of a growbox for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowboxSnapshot {
    /// Growbox id.
    pub id: GrowboxId,
    /// Display name.
    pub name: String,
    /// Growbox level.
    pub level: u32,
    /// Number of slots.
    pub capacity: usize,
    /// Simulated time of this growbox.
    pub clock: SimTime,
    /// Slot contents, `None` for empty slots.
    pub slots: Vec<Option<Plant>>,
    /// Installed equipment.
    pub loadout: Loadout,
}

impl GrowboxSnapshot {
    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Number of ready plants.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.slots.iter().flatten().filter(|p| p.is_ready()).count()
    }
}

/// A fixed-capacity container of plant slots.
#[derive(Debug, Clone)]
pub struct GrowboxInventory {
    id: GrowboxId,
    name: String,
    level: u32,
    slots: Vec<Option<Plant>>,
    clock: SimTime,
    plant_sequence: u64,
    loadout: Loadout,
}

impl GrowboxInventory {
    /// Creates an empty growbox with `capacity` slots.
    pub fn new(id: GrowboxId, name: &str, capacity: usize) -> GrowboxResult<Self> {
        if capacity == 0 {
            return Err(GrowboxError::InvalidCapacity);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            level: 1,
            slots: vec![None; capacity],
            clock: SimTime::ZERO,
            plant_sequence: 0,
            loadout: Loadout::new(),
        })
    }

    /// Sets the growbox level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Starts the growbox clock at `clock` (for growboxes bought mid-session).
    #[must_use]
    pub fn starting_at(mut self, clock: SimTime) -> Self {
        self.clock = clock;
        self
    }

    /// Growbox id.
    #[must_use]
    pub fn id(&self) -> GrowboxId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Growbox level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Current simulated time of this growbox.
    #[must_use]
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Installed equipment.
    #[must_use]
    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    /// Mutable access to installed equipment.
    pub fn loadout_mut(&mut self) -> &mut Loadout {
        &mut self.loadout
    }

    /// Plant in a slot.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<&Plant> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Indices of empty slots.
    pub fn empty_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
    }

    /// Iterates planted plants with their slot index.
    pub fn plants(&self) -> impl Iterator<Item = (usize, &Plant)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|plant| (index, plant)))
    }

    /// Finds a plant by id.
    #[must_use]
    pub fn plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants().map(|(_, p)| p).find(|p| p.id() == id)
    }

    /// Checks if this growbox holds the plant.
    #[must_use]
    pub fn contains(&self, id: &PlantId) -> bool {
        self.plant(id).is_some()
    }

    /// Ids of plants ready for harvest.
    #[must_use]
    pub fn ready_plants(&self) -> Vec<PlantId> {
        self.plants()
            .filter(|(_, p)| p.is_ready())
            .map(|(_, p)| p.id().clone())
            .collect()
    }

    /// Plants a seed into an empty slot, consuming one seed.
    ///
    /// Checks run in order: slot range, slot occupancy, species, seed count.
    /// Nothing changes unless every check passes.
    pub fn plant_seed(
        &mut self,
        slot: usize,
        species: Species,
        seeds: &mut SeedInventory,
        catalog: &SpeciesCatalog,
    ) -> GrowboxResult<PlantId> {
        let capacity = self.capacity();
        let target = self
            .slots
            .get(slot)
            .ok_or(GrowboxError::SlotOutOfRange { slot, capacity })?;
        if let Some(occupant) = target {
            return Err(GrowboxError::SlotOccupied {
                slot,
                occupant: occupant.id().clone(),
            });
        }
        if !seeds.has(species) {
            // Species validity first: an unknown species is not an empty seed bag.
            catalog.lookup(species)?;
            return Err(SeedError::OutOfSeed { species }.into());
        }

        let id = PlantId::sequenced(self.id, self.plant_sequence + 1);
        let plant = Plant::from_catalog(id.clone(), catalog, species, self.clock)?;
        seeds.take(species)?;
        self.plant_sequence += 1;
        self.slots[slot] = Some(plant);
        debug!(growbox = %self.id, slot, plant = %id, %species, "Seed planted");
        Ok(id)
    }

    /// Advances every plant by `elapsed` seconds using the installed loadout.
    pub fn tick(&mut self, elapsed: u64) {
        let loadout = self.loadout.clone();
        self.tick_with(elapsed, &loadout);
    }

    /// Advances every plant by `elapsed` seconds using an injected growth rate.
    pub fn tick_with(&mut self, elapsed: u64, rate: &dyn GrowthRate) {
        self.clock = self.clock.advanced_by(elapsed);
        for plant in self.slots.iter_mut().flatten() {
            if let Some(stage) = plant.advance_time(elapsed, rate) {
                if stage == GrowthStage::Ready {
                    info!(growbox = %self.id, plant = %plant.id(), species = %plant.species(), "Plant ready for harvest");
                } else {
                    trace!(growbox = %self.id, plant = %plant.id(), %stage, "Plant stage changed");
                }
            }
        }
    }

    /// Waters a plant.
    pub fn water(&mut self, id: &PlantId, amount: u32) -> GrowboxResult<()> {
        let now = self.clock;
        let growbox = self.id;
        let plant = self.plant_mut(id)?;
        plant.water(amount, now);
        debug!(%growbox, plant = %id, level = plant.water_level(), "Plant watered");
        Ok(())
    }

    /// Checks that a plant exists and is ready, returning the harvest it would yield.
    pub fn peek_harvest(&self, id: &PlantId) -> GrowboxResult<Harvest> {
        let plant = self
            .plant(id)
            .ok_or_else(|| GrowboxError::PlantNotFound { id: id.clone() })?;
        Ok(plant.harvest()?)
    }

    /// Harvests a ready plant and frees its slot.
    pub fn harvest(&mut self, id: &PlantId) -> GrowboxResult<Harvest> {
        let harvest = self.peek_harvest(id)?;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|p| p.id() == id) {
                *slot = None;
            }
        }
        debug!(growbox = %self.id, plant = %id, payout = harvest.payout, "Plant harvested");
        Ok(harvest)
    }

    /// Read-only copy for rendering.
    #[must_use]
    pub fn snapshot(&self) -> GrowboxSnapshot {
        GrowboxSnapshot {
            id: self.id,
            name: self.name.clone(),
            level: self.level,
            capacity: self.capacity(),
            clock: self.clock,
            slots: self.slots.clone(),
            loadout: self.loadout.clone(),
        }
    }

    fn plant_mut(&mut self, id: &PlantId) -> GrowboxResult<&mut Plant> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|p| p.id() == id)
            .ok_or_else(|| GrowboxError::PlantNotFound { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::{Equipment, EquipmentEffect, EquipmentSlot};
    use growbox_common::ItemId;

    fn growbox(capacity: usize) -> GrowboxInventory {
        GrowboxInventory::new(GrowboxId::STARTER, "Basic Growbox", capacity).expect("growbox")
    }

    fn seeds() -> SeedInventory {
        SeedInventory::with_counts([(Species::Tomato, 2), (Species::Basil, 1)])
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            GrowboxInventory::new(GrowboxId::STARTER, "Empty", 0),
            Err(GrowboxError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_plant_seed_consumes_seed() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(4);
        let mut seeds = seeds();

        let id = gb
            .plant_seed(2, Species::Tomato, &mut seeds, &catalog)
            .expect("planted");
        assert_eq!(seeds.count(Species::Tomato), 1);
        assert_eq!(gb.occupied(), 1);
        let plant = gb.slot(2).expect("slot 2");
        assert_eq!(plant.id(), &id);
        assert_eq!(plant.stage(), GrowthStage::Planted);
        assert_eq!(plant.time_remaining(), 3600);
    }

    #[test]
    fn test_plant_ids_are_unique() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(2);
        let mut seeds = seeds();
        let a = gb.plant_seed(0, Species::Tomato, &mut seeds, &catalog).expect("a");
        let b = gb.plant_seed(1, Species::Tomato, &mut seeds, &catalog).expect("b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_occupied_slot_scenario() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(1);
        let mut seeds = seeds();
        gb.plant_seed(0, Species::Tomato, &mut seeds, &catalog)
            .expect("planted");

        let before = seeds.clone();
        let result = gb.plant_seed(0, Species::Basil, &mut seeds, &catalog);
        assert!(matches!(result, Err(GrowboxError::SlotOccupied { slot: 0, .. })));
        assert_eq!(seeds, before);

        // Occupancy wins even when the seed bag is empty.
        let mut empty = SeedInventory::new();
        let result = gb.plant_seed(0, Species::Basil, &mut empty, &catalog);
        assert!(matches!(result, Err(GrowboxError::SlotOccupied { .. })));
        assert_eq!(gb.occupied(), 1);
    }

    #[test]
    fn test_slot_out_of_range() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(2);
        let mut seeds = seeds();
        let result = gb.plant_seed(2, Species::Tomato, &mut seeds, &catalog);
        assert!(matches!(
            result,
            Err(GrowboxError::SlotOutOfRange {
                slot: 2,
                capacity: 2
            })
        ));
        assert_eq!(seeds.count(Species::Tomato), 2);
    }

    #[test]
    fn test_out_of_seed() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(2);
        let mut seeds = seeds();
        let result = gb.plant_seed(0, Species::Pepper, &mut seeds, &catalog);
        assert!(matches!(
            result,
            Err(GrowboxError::Seed(SeedError::OutOfSeed {
                species: Species::Pepper
            }))
        ));
        assert_eq!(gb.occupied(), 0);
        assert_eq!(seeds, self::seeds());
    }

    #[test]
    fn test_species_missing_from_catalog() {
        let catalog = SpeciesCatalog::from_profiles(vec![crate::species::SpeciesProfile::new(
            Species::Basil,
            "Basil",
            1800,
            25,
            15,
        )])
        .expect("catalog");
        let mut gb = growbox(2);
        let mut seeds = seeds();
        let result = gb.plant_seed(0, Species::Tomato, &mut seeds, &catalog);
        assert!(matches!(
            result,
            Err(GrowboxError::Plant(PlantError::InvalidSpecies(_)))
        ));
        assert_eq!(seeds.count(Species::Tomato), 2);
    }

    #[test]
    fn test_tick_and_harvest() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(2);
        let mut seeds = seeds();
        let basil = gb
            .plant_seed(0, Species::Basil, &mut seeds, &catalog)
            .expect("basil");
        let tomato = gb
            .plant_seed(1, Species::Tomato, &mut seeds, &catalog)
            .expect("tomato");

        gb.tick(1800);
        assert_eq!(gb.clock(), SimTime::from_seconds(1800));
        assert_eq!(gb.ready_plants(), vec![basil.clone()]);

        let result = gb.harvest(&tomato);
        assert!(matches!(
            result,
            Err(GrowboxError::Plant(PlantError::NotReady { .. }))
        ));
        assert_eq!(gb.occupied(), 2);

        let harvest = gb.harvest(&basil).expect("basil ready");
        assert_eq!(harvest.payout, 25);
        assert!(gb.slot(0).is_none());
        assert!(!gb.contains(&basil));
        assert_eq!(gb.empty_slots().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_unknown_plant() {
        let mut gb = growbox(1);
        let ghost = PlantId::new("ghost");
        assert!(matches!(
            gb.water(&ghost, 30),
            Err(GrowboxError::PlantNotFound { .. })
        ));
        assert!(matches!(
            gb.harvest(&ghost),
            Err(GrowboxError::PlantNotFound { .. })
        ));
    }

    #[test]
    fn test_water_records_growbox_clock() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(1);
        let mut seeds = seeds();
        let id = gb
            .plant_seed(0, Species::Tomato, &mut seeds, &catalog)
            .expect("planted");
        gb.tick(120);
        gb.water(&id, 30).expect("watered");
        let plant = gb.plant(&id).expect("plant");
        assert_eq!(plant.last_watered_at(), SimTime::from_seconds(120));
        assert_eq!(plant.water_level(), 100);
    }

    #[test]
    fn test_tick_uses_installed_equipment() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(1);
        gb.loadout_mut().install(Equipment {
            item: ItemId::new("ac_unit"),
            name: "AC Unit".into(),
            slot: EquipmentSlot::Ac,
            effect: EquipmentEffect::Growth(50),
        });
        let mut seeds = seeds();
        let id = gb
            .plant_seed(0, Species::Tomato, &mut seeds, &catalog)
            .expect("planted");
        gb.tick(2400);
        assert!(gb.plant(&id).is_some_and(Plant::is_ready));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let catalog = SpeciesCatalog::builtin();
        let mut gb = growbox(2);
        let mut seeds = seeds();
        gb.plant_seed(0, Species::Basil, &mut seeds, &catalog)
            .expect("planted");
        let snapshot = gb.snapshot();
        gb.tick(1800);
        assert_eq!(snapshot.ready_count(), 0);
        assert_eq!(gb.snapshot().ready_count(), 1);
        assert_eq!(snapshot.occupied(), 1);
    }
}
