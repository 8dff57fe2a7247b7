//! Seed inventory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::species::Species;

/// Seed inventory error types.
#[derive(Debug, Error)]
pub enum SeedError {
    /// No seeds of this species left
    #[error("Out of {species} seeds")]
    OutOfSeed {
        /// Species that ran out
        species: Species,
    },
}

/// Result type for seed inventory operations.
pub type SeedResult<T> = Result<T, SeedError>;

/// Seed counts per species.
///
/// Counts only change through [`SeedInventory::add`] and
/// [`SeedInventory::take`]; they never go below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedInventory {
    seeds: BTreeMap<Species, u32>,
}

impl SeedInventory {
    /// Creates an empty seed inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory from `(species, count)` pairs.
    #[must_use]
    pub fn with_counts(counts: impl IntoIterator<Item = (Species, u32)>) -> Self {
        let mut inventory = Self::new();
        for (species, count) in counts {
            inventory.add(species, count);
        }
        inventory
    }

    /// Returns the count of a species.
    #[must_use]
    pub fn count(&self, species: Species) -> u32 {
        self.seeds.get(&species).copied().unwrap_or(0)
    }

    /// Checks if at least one seed of the species is available.
    #[must_use]
    pub fn has(&self, species: Species) -> bool {
        self.count(species) > 0
    }

    /// Adds seeds (shop replenishment).
    pub fn add(&mut self, species: Species, amount: u32) {
        let current = self.count(species);
        self.seeds.insert(species, current.saturating_add(amount));
    }

    /// Removes one seed, failing if none are left.
    pub fn take(&mut self, species: Species) -> SeedResult<()> {
        let current = self.count(species);
        if current == 0 {
            return Err(SeedError::OutOfSeed { species });
        }
        self.seeds.insert(species, current - 1);
        Ok(())
    }

    /// Total number of seeds across species.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.seeds.values().map(|&count| u64::from(count)).sum()
    }

    /// Returns an iterator over species and counts, in species order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, u32)> + '_ {
        self.seeds.iter().map(|(&species, &count)| (species, count))
    }
}
