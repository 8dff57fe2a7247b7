//! Plant lifecycle.
//!
//! This module owns the state machine of a single plant:
//! - Stage transitions (planted -> growing -> ready)
//! - Progress derived from remaining grow time
//! - Water level with optional per-species decay
//! - Harvest value fixed at planting
//!
//! Time only moves through [`Plant::advance_time`]. Growth speed can be
//! modified by an injected [`GrowthRate`] (equipment, water effects); the
//! plant itself never consults a clock.

use growbox_common::{PlantId, SimTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::species::{Species, SpeciesCatalog};

/// Highest water level a plant can hold.
pub const MAX_WATER_LEVEL: u8 = 100;

/// Growth rate of a plant at base speed, in percent.
pub const BASE_RATE_PERCENT: u32 = 100;

/// Plant lifecycle error types.
#[derive(Debug, Error)]
pub enum PlantError {
    /// Species name is unknown or missing from the catalog
    #[error("Invalid species: {0}")]
    InvalidSpecies(String),
    /// Grow time must be strictly positive
    #[error("Invalid grow time for {species}: must be greater than zero")]
    InvalidGrowTime {
        /// Species with the bad grow time
        species: Species,
    },
    /// Harvest attempted before the plant is ready
    #[error("Plant {id} is not ready (stage: {stage})")]
    NotReady {
        /// Plant that was asked for a harvest
        id: PlantId,
        /// Its current stage
        stage: GrowthStage,
    },
    /// Species listed twice in a catalog
    #[error("Duplicate species in catalog: {0}")]
    DuplicateSpecies(Species),
    /// Species profile with a blank display name
    #[error("Species {0} has no display name")]
    UnnamedSpecies(Species),
}

/// Result type for plant operations.
pub type PlantResult<T> = Result<T, PlantError>;

/// Growth stage of a plant. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    /// Seed in the soil, no visible progress yet.
    #[default]
    Planted,
    /// Visible progress, not yet harvestable.
    Growing,
    /// Fully grown, can be harvested.
    Ready,
}

impl GrowthStage {
    /// Get the display name of this stage.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Planted => "Planted",
            Self::Growing => "Growing",
            Self::Ready => "Ready",
        }
    }

    /// Check if this plant can be harvested.
    #[must_use]
    pub fn is_harvestable(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Growth-rate hook applied to elapsed seconds in [`Plant::advance_time`].
///
/// The rate is a percentage of base speed (100 = 1.0x, 125 = 1.25x), so
/// growth is tracked in exact hundredths of a second. Zero is treated as
/// [`BASE_RATE_PERCENT`].
pub trait GrowthRate {
    /// Growth speed for the plant right now, in percent of base speed.
    fn percent(&self, plant: &Plant) -> u32;

    /// The same rate as a multiplier.
    fn multiplier(&self, plant: &Plant) -> f64 {
        f64::from(self.percent(plant)) / 100.0
    }
}

impl<F> GrowthRate for F
where
    F: Fn(&Plant) -> u32,
{
    fn percent(&self, plant: &Plant) -> u32 {
        self(plant)
    }
}

/// Growth at the species' base speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRate;

impl GrowthRate for UniformRate {
    fn percent(&self, _plant: &Plant) -> u32 {
        BASE_RATE_PERCENT
    }
}

/// Result of a successful harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    /// Plant that was harvested.
    pub plant_id: PlantId,
    /// Its species.
    pub species: Species,
    /// Coins paid out.
    pub payout: u64,
    /// When it was planted.
    pub planted_at: SimTime,
}

/// State of one planted plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    id: PlantId,
    species: Species,
    stage: GrowthStage,
    /// Percent complete, 0..=100.
    progress: u8,
    /// Seconds of growth left at rate 1.0.
    time_remaining: u64,
    base_grow_time: u64,
    water_level: u8,
    /// Water level right after the last watering.
    water_mark: u8,
    /// Seconds grown since the last watering.
    dry_seconds: u64,
    water_use_per_hour: u32,
    harvest_value: u64,
    planted_at: SimTime,
    last_watered_at: SimTime,
    /// Effective growth not yet applied, in hundredths of a second (0..100).
    growth_carry: u64,
}

impl Plant {
    /// Creates a freshly planted plant.
    ///
    /// Fails with [`PlantError::InvalidGrowTime`] if `base_grow_time` is zero.
    pub fn new(
        id: PlantId,
        species: Species,
        base_grow_time: u64,
        base_value: u64,
        now: SimTime,
    ) -> PlantResult<Self> {
        if base_grow_time == 0 {
            return Err(PlantError::InvalidGrowTime { species });
        }
        Ok(Self {
            id,
            species,
            stage: GrowthStage::Planted,
            progress: 0,
            time_remaining: base_grow_time,
            base_grow_time,
            water_level: MAX_WATER_LEVEL,
            water_mark: MAX_WATER_LEVEL,
            dry_seconds: 0,
            water_use_per_hour: 0,
            harvest_value: base_value,
            planted_at: now,
            last_watered_at: now,
            growth_carry: 0,
        })
    }

    /// Plants a species using its catalog profile.
    ///
    /// Fails with [`PlantError::InvalidSpecies`] if the catalog does not carry it.
    pub fn from_catalog(
        id: PlantId,
        catalog: &SpeciesCatalog,
        species: Species,
        now: SimTime,
    ) -> PlantResult<Self> {
        let profile = catalog.lookup(species)?;
        let mut plant = Self::new(
            id,
            species,
            profile.base_grow_time,
            profile.base_value,
            now,
        )?;
        plant.water_use_per_hour = profile.water_use_per_hour;
        Ok(plant)
    }

    /// Plant id.
    #[must_use]
    pub fn id(&self) -> &PlantId {
        &self.id
    }

    /// Species.
    #[must_use]
    pub fn species(&self) -> Species {
        self.species
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> GrowthStage {
        self.stage
    }

    /// Progress percentage (0..=100).
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Seconds of growth left at rate 1.0.
    #[must_use]
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Grow time the plant started with.
    #[must_use]
    pub fn base_grow_time(&self) -> u64 {
        self.base_grow_time
    }

    /// Water level percentage (0..=100).
    #[must_use]
    pub fn water_level(&self) -> u8 {
        self.water_level
    }

    /// Coins paid out on harvest.
    #[must_use]
    pub fn harvest_value(&self) -> u64 {
        self.harvest_value
    }

    /// When the plant was planted.
    #[must_use]
    pub fn planted_at(&self) -> SimTime {
        self.planted_at
    }

    /// When the plant was last watered (planting counts as watering).
    #[must_use]
    pub fn last_watered_at(&self) -> SimTime {
        self.last_watered_at
    }

    /// Check if this plant can be harvested.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.stage.is_harvestable()
    }

    /// Check if the water level is above `threshold` (watering is pointless).
    #[must_use]
    pub fn is_well_watered(&self, threshold: u8) -> bool {
        self.water_level > threshold
    }

    /// Icon stage for progress bars and sprites, 0..=3.
    #[must_use]
    pub fn visual_stage(&self) -> u8 {
        visual_stage(self.progress)
    }

    /// Simulated seconds since planting.
    #[must_use]
    pub fn age(&self, now: SimTime) -> u64 {
        now.since(self.planted_at)
    }

    /// Simulated seconds until ready if `rate` stays what it is now.
    #[must_use]
    pub fn seconds_to_ready(&self, rate: &dyn GrowthRate) -> u64 {
        if self.is_ready() {
            return 0;
        }
        let percent = sanitize_percent(rate.percent(self), &self.id);
        self.seconds_needed(percent)
    }

    /// Advances the plant by `elapsed` seconds at base speed.
    pub fn advance(&mut self, elapsed: u64) -> Option<GrowthStage> {
        self.advance_time(elapsed, &UniformRate)
    }

    /// Advances the plant by `elapsed` seconds, scaled by `rate`.
    ///
    /// No-op once the plant is ready. Remaining time is floored at zero,
    /// progress is recomputed from it and the stage moves forward when
    /// progress first becomes positive and when remaining time reaches zero.
    /// Returns the new stage if it changed.
    pub fn advance_time(&mut self, elapsed: u64, rate: &dyn GrowthRate) -> Option<GrowthStage> {
        if self.stage == GrowthStage::Ready || elapsed == 0 {
            return None;
        }

        let percent = sanitize_percent(rate.percent(self), &self.id);
        let effective = u128::from(elapsed) * u128::from(percent) + u128::from(self.growth_carry);
        let grown = u64::try_from(effective / 100).unwrap_or(u64::MAX);

        let previous = self.stage;
        if grown >= self.time_remaining {
            // Only the seconds needed to finish count against the water.
            let needed = self.seconds_needed(percent);
            self.dry_seconds = self.dry_seconds.saturating_add(needed.min(elapsed));
            self.time_remaining = 0;
            self.growth_carry = 0;
            self.progress = 100;
            self.stage = GrowthStage::Ready;
        } else {
            self.dry_seconds = self.dry_seconds.saturating_add(elapsed);
            self.time_remaining -= grown;
            self.growth_carry = (effective % 100) as u64;
            self.progress = progress_for(self.base_grow_time, self.time_remaining);
            if self.stage == GrowthStage::Planted && self.progress > 0 {
                self.stage = GrowthStage::Growing;
            }
        }
        self.refresh_water_level();

        (self.stage != previous).then_some(self.stage)
    }

    /// Adds `amount` water, clamped to 100, and records the watering time.
    pub fn water(&mut self, amount: u32, now: SimTime) {
        let topped = u32::from(self.water_level).saturating_add(amount);
        self.water_level = topped.min(u32::from(MAX_WATER_LEVEL)) as u8;
        self.water_mark = self.water_level;
        self.dry_seconds = 0;
        self.last_watered_at = now;
    }

    /// Computes the harvest payout.
    ///
    /// Fails with [`PlantError::NotReady`] unless the plant is ready. Removing
    /// the plant from its slot is the caller's job.
    pub fn harvest(&self) -> PlantResult<Harvest> {
        if !self.is_ready() {
            return Err(PlantError::NotReady {
                id: self.id.clone(),
                stage: self.stage,
            });
        }
        Ok(Harvest {
            plant_id: self.id.clone(),
            species: self.species,
            payout: self.harvest_value,
            planted_at: self.planted_at,
        })
    }

    /// Whole seconds at `percent` until the remaining time is used up.
    fn seconds_needed(&self, percent: u32) -> u64 {
        let owed = (u128::from(self.time_remaining) * 100).saturating_sub(u128::from(self.growth_carry));
        let percent = u128::from(percent);
        u64::try_from(owed.div_ceil(percent)).unwrap_or(u64::MAX)
    }

    fn refresh_water_level(&mut self) {
        if self.water_use_per_hour == 0 {
            self.water_level = self.water_mark;
            return;
        }
        let used = u128::from(self.water_use_per_hour) * u128::from(self.dry_seconds) / 3600;
        let used = u8::try_from(used).unwrap_or(u8::MAX);
        self.water_level = self.water_mark.saturating_sub(used);
    }
}

/// Progress percentage for a plant with `remaining` of `base` seconds left.
///
/// `round(100 * (base - remaining) / base)`, half rounded up, clamped to 100.
#[must_use]
pub fn progress_for(base: u64, remaining: u64) -> u8 {
    if base == 0 {
        return 100;
    }
    let grown = u128::from(base.saturating_sub(remaining));
    let base = u128::from(base);
    let rounded = (200 * grown + base) / (2 * base);
    rounded.min(100) as u8
}

/// Icon stage (0..=3) for a progress percentage.
#[must_use]
pub fn visual_stage(progress: u8) -> u8 {
    (progress / 25).min(3)
}

fn sanitize_percent(percent: u32, id: &PlantId) -> u32 {
    if percent == 0 {
        warn!(plant = %id, "Ignoring zero growth rate");
        BASE_RATE_PERCENT
    } else {
        percent
    }
}
