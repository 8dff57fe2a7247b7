//! Species catalog.
//!
//! Growth time, harvest value and seed price per species live in a static
//! table keyed by the closed [`Species`] enum. The table is validated when it
//! is built or deserialized, so lookups never fall back to defaults.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plants::{PlantError, PlantResult};

/// Plant species that can be grown in a growbox.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Tomato.
    Tomato,
    /// Basil.
    Basil,
    /// Lettuce.
    Lettuce,
    /// Pepper.
    Pepper,
    /// Mixed herbs.
    Herb,
}

impl Species {
    /// Every species, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Tomato,
        Self::Basil,
        Self::Lettuce,
        Self::Pepper,
        Self::Herb,
    ];

    /// Lowercase key used in configuration and shop item ids.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Tomato => "tomato",
            Self::Basil => "basil",
            Self::Lettuce => "lettuce",
            Self::Pepper => "pepper",
            Self::Herb => "herb",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Species {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|species| species.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PlantError::InvalidSpecies(s.to_string()))
    }
}

/// Growth and economy parameters of one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Species this profile describes.
    pub species: Species,
    /// Display name.
    pub name: String,
    /// Seconds from planting to ready at a growth rate of 1.0.
    pub base_grow_time: u64,
    /// Coins paid out when a ready plant is harvested.
    pub base_value: u64,
    /// Shop price of one seed.
    pub seed_price: u64,
    /// Water percentage points lost per hour of growth (0 = no decay).
    #[serde(default)]
    pub water_use_per_hour: u32,
}

impl SpeciesProfile {
    /// Creates a profile that does not consume water.
    #[must_use]
    pub fn new(
        species: Species,
        name: &str,
        base_grow_time: u64,
        base_value: u64,
        seed_price: u64,
    ) -> Self {
        Self {
            species,
            name: name.to_string(),
            base_grow_time,
            base_value,
            seed_price,
            water_use_per_hour: 0,
        }
    }

    /// Sets the hourly water use.
    #[must_use]
    pub fn with_water_use(mut self, per_hour: u32) -> Self {
        self.water_use_per_hour = per_hour;
        self
    }

    fn validate(&self) -> PlantResult<()> {
        if self.base_grow_time == 0 {
            return Err(PlantError::InvalidGrowTime {
                species: self.species,
            });
        }
        if self.name.trim().is_empty() {
            return Err(PlantError::UnnamedSpecies(self.species));
        }
        Ok(())
    }
}

/// Validated lookup table of species profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SpeciesProfile>", into = "Vec<SpeciesProfile>")]
pub struct SpeciesCatalog {
    profiles: BTreeMap<Species, SpeciesProfile>,
}

impl SpeciesCatalog {
    /// Builds a catalog, rejecting zero grow times, blank names and duplicates.
    pub fn from_profiles(profiles: Vec<SpeciesProfile>) -> PlantResult<Self> {
        let mut table = BTreeMap::new();
        for profile in profiles {
            profile.validate()?;
            let species = profile.species;
            if table.insert(species, profile).is_some() {
                return Err(PlantError::DuplicateSpecies(species));
            }
        }
        Ok(Self { profiles: table })
    }

    /// The stock species table.
    #[must_use]
    pub fn builtin() -> Self {
        let profiles = [
            SpeciesProfile::new(Species::Tomato, "Tomato", 3600, 45, 20),
            SpeciesProfile::new(Species::Basil, "Basil", 1800, 25, 15),
            SpeciesProfile::new(Species::Lettuce, "Lettuce", 2400, 30, 12),
            SpeciesProfile::new(Species::Pepper, "Pepper", 5400, 80, 35),
            SpeciesProfile::new(Species::Herb, "Herb Mix", 2700, 50, 25),
        ];
        Self {
            profiles: profiles.into_iter().map(|p| (p.species, p)).collect(),
        }
    }

    /// Looks up a species, failing if the catalog does not carry it.
    pub fn lookup(&self, species: Species) -> PlantResult<&SpeciesProfile> {
        self.profiles
            .get(&species)
            .ok_or_else(|| PlantError::InvalidSpecies(species.to_string()))
    }

    /// Parses a species name and looks it up.
    pub fn lookup_name(&self, name: &str) -> PlantResult<&SpeciesProfile> {
        self.lookup(name.parse()?)
    }

    /// Iterates profiles in species order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesProfile> + '_ {
        self.profiles.values()
    }

    /// Number of species in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Checks if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<SpeciesProfile>> for SpeciesCatalog {
    type Error = PlantError;

    fn try_from(profiles: Vec<SpeciesProfile>) -> Result<Self, Self::Error> {
        Self::from_profiles(profiles)
    }
}

impl From<SpeciesCatalog> for Vec<SpeciesProfile> {
    fn from(catalog: SpeciesCatalog) -> Self {
        catalog.profiles.into_values().collect()
    }
}
