//! Session configuration.
//!
//! Everything a new session starts with: the player profile, balances, seeds,
//! the starter growbox, watering rules and the data tables (species, shop,
//! achievements, rivals). Missing keys fall back to the original game's
//! starting state. Configuration can be loaded from and saved to TOML.

use growbox_common::{ItemId, SchemaError, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::achievements::{Achievement, AchievementTracker};
use crate::leaderboard::LeaderboardEntry;
use crate::plants::MAX_WATER_LEVEL;
use crate::seeds::SeedInventory;
use crate::shop::{ShopCatalog, ShopItemKind};
use crate::species::{Species, SpeciesCatalog};

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Written by an incompatible version.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Values that parse but make no sense together.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The player's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Player name.
    pub name: String,
    /// Player level.
    pub level: u32,
    /// Harvests made before this session.
    pub harvests: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "GrowMaster".to_string(),
            level: 5,
            harvests: 89,
        }
    }
}

/// The growbox a session starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarterGrowbox {
    /// Display name.
    pub name: String,
    /// Growbox level.
    pub level: u32,
    /// Number of slots.
    pub capacity: usize,
    /// Owned equipment installed from the start.
    pub installed: Vec<ItemId>,
}

impl Default for StarterGrowbox {
    fn default() -> Self {
        Self {
            name: "Basic Growbox".to_string(),
            level: 1,
            capacity: 4,
            installed: ["pro_led", "carbon_filter", "exhaust_fan", "premium_soil"]
                .map(ItemId::new)
                .to_vec(),
        }
    }
}

/// Watering amounts and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WateringRules {
    /// Water added by one watering.
    pub amount: u32,
    /// Level above which a plant counts as well watered.
    pub well_watered_threshold: u8,
}

impl Default for WateringRules {
    fn default() -> Self {
        Self {
            amount: 30,
            well_watered_threshold: 80,
        }
    }
}

/// Starting state of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Format version of this file.
    pub version: SchemaVersion,
    /// Starting coins.
    pub coins: u64,
    /// Starting tokens.
    pub tokens: u64,
    /// Shop items owned from the start.
    pub owned_items: Vec<ItemId>,
    /// Player profile.
    pub profile: ProfileConfig,
    /// Starting seed counts.
    pub seeds: SeedInventory,
    /// Starter growbox.
    pub starter_growbox: StarterGrowbox,
    /// Watering rules.
    pub watering: WateringRules,
    /// Species table.
    pub species: SpeciesCatalog,
    /// Growboxes, equipment and soil on sale. Seed packs are added per species.
    pub shop: ShopCatalog,
    /// Achievement definitions.
    pub achievements: Vec<Achievement>,
    /// Leaderboard rivals.
    pub rivals: Vec<LeaderboardEntry>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::SESSION_CONFIG,
            coins: 2500,
            tokens: 150,
            owned_items: [
                "basic_gb",
                "pro_led",
                "carbon_filter",
                "exhaust_fan",
                "basic_soil",
                "premium_soil",
            ]
            .map(ItemId::new)
            .to_vec(),
            profile: ProfileConfig::default(),
            seeds: SeedInventory::with_counts([
                (Species::Tomato, 5),
                (Species::Basil, 8),
                (Species::Lettuce, 12),
                (Species::Pepper, 2),
                (Species::Herb, 6),
            ]),
            starter_growbox: StarterGrowbox::default(),
            watering: WateringRules::default(),
            species: SpeciesCatalog::builtin(),
            shop: ShopCatalog::builtin(),
            achievements: AchievementTracker::builtin_definitions(),
            rivals: LeaderboardEntry::default_rivals(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(toml: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values that deserialize fine but contradict each other.
    pub fn validate(&self) -> ConfigResult<()> {
        SchemaVersion::SESSION_CONFIG.ensure_readable(&self.version)?;

        if self.starter_growbox.capacity == 0 {
            return Err(ConfigError::Invalid(
                "starter growbox capacity must be at least 1".into(),
            ));
        }
        if self.watering.well_watered_threshold > MAX_WATER_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "well watered threshold {} is above {MAX_WATER_LEVEL}",
                self.watering.well_watered_threshold
            )));
        }
        for id in &self.owned_items {
            let item = self
                .shop
                .item(id)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            if !item.is_durable() {
                return Err(ConfigError::Invalid(format!("{id} cannot be owned")));
            }
        }
        for id in &self.starter_growbox.installed {
            if !self.owned_items.contains(id) {
                return Err(ConfigError::Invalid(format!(
                    "starter growbox installs {id}, which is not owned"
                )));
            }
            let is_equipment = self
                .shop
                .item(id)
                .is_ok_and(|item| matches!(item.kind, ShopItemKind::Equipment { .. }));
            if !is_equipment {
                return Err(ConfigError::Invalid(format!("{id} is not equipment")));
            }
        }
        for species in self.seeds.iter().map(|(species, _)| species) {
            self.species
                .lookup(species)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }
}
