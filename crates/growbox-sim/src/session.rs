//! Player session aggregate.
//!
//! A [`Session`] owns everything one player has: growboxes, seeds, the
//! ledger, shop ownership, achievements and the leaderboard rivals. Every
//! command takes `&mut Session`, runs its checks before mutating anything and
//! either applies fully or returns an error with nothing changed.
//!
//! Hosts that share a session between threads wrap it in a
//! [`SharedSession`], a single session-wide lock.

use growbox_common::{GrowboxId, ItemId, PlantId, SchemaVersion, SimTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::achievements::{Achievement, AchievementStatus, AchievementTracker, PlayerStats};
use crate::config::{ConfigError, ProfileConfig, SessionConfig, WateringRules};
use crate::economy::{Balances, EconomyError, EconomyLedger, LedgerEntry};
use crate::equipment::{Equipment, EquipmentSlot};
use crate::growbox::{GrowboxError, GrowboxInventory, GrowboxSnapshot};
use crate::leaderboard::{standings, LeaderboardEntry, Standing};
use crate::plants::Plant;
use crate::seeds::SeedInventory;
use crate::shop::{Shop, ShopError, ShopItem, ShopItemKind};
use crate::species::{Species, SpeciesCatalog};

/// Session error types.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No growbox with this id
    #[error("Unknown growbox: {id}")]
    UnknownGrowbox {
        /// Requested growbox
        id: GrowboxId,
    },
    /// Equipment already installed in another growbox
    #[error("{item} is already installed in {growbox}")]
    EquipmentInUse {
        /// Requested item
        item: ItemId,
        /// Growbox it is installed in
        growbox: GrowboxId,
    },
    /// Growbox command failed
    #[error(transparent)]
    Growbox(#[from] GrowboxError),
    /// Ledger command failed
    #[error(transparent)]
    Economy(#[from] EconomyError),
    /// Shop command failed
    #[error(transparent)]
    Shop(#[from] ShopError),
    /// Session could not be built from its configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for session commands.
pub type SessionResult<T> = Result<T, SessionError>;

/// A session behind one exclusive lock, for multi-threaded hosts.
pub type SharedSession = Arc<Mutex<Session>>;

// ============================================================================
// Receipts and snapshots
// ============================================================================

/// Outcome of a successful harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReceipt {
    /// Harvested plant.
    pub plant_id: PlantId,
    /// Its species.
    pub species: Species,
    /// Coins paid out for the plant.
    pub payout: u64,
    /// Simulated seconds between planting and harvest.
    pub grow_seconds: u64,
    /// Achievements completed by this harvest.
    pub unlocked: Vec<Achievement>,
    /// Coin balance after payout and rewards.
    pub coins: u64,
}

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Purchased item.
    pub item: ShopItem,
    /// Growbox created by the purchase, if it was a growbox.
    pub growbox: Option<GrowboxId>,
    /// Achievements completed by this purchase.
    pub unlocked: Vec<Achievement>,
    /// Coin balance after the price and any rewards.
    pub coins: u64,
}

/// Read-only copy of a whole session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Snapshot format version.
    pub version: SchemaVersion,
    /// Simulated session time.
    pub clock: SimTime,
    /// Player profile with live harvest count.
    pub profile: ProfileConfig,
    /// Currency balances.
    pub balances: Balances,
    /// Seed counts.
    pub seeds: SeedInventory,
    /// Growboxes in id order.
    pub growboxes: Vec<GrowboxSnapshot>,
    /// Owned shop items.
    pub owned_items: Vec<ItemId>,
    /// Achievement progress.
    pub achievements: Vec<AchievementStatus>,
}

impl SessionSnapshot {
    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// Session
// ============================================================================

/// All state of one player.
#[derive(Debug)]
pub struct Session {
    profile: ProfileConfig,
    watering: WateringRules,
    catalog: SpeciesCatalog,
    growboxes: BTreeMap<GrowboxId, GrowboxInventory>,
    seeds: SeedInventory,
    ledger: EconomyLedger,
    shop: Shop,
    achievements: AchievementTracker,
    stats: PlayerStats,
    rivals: Vec<LeaderboardEntry>,
    clock: SimTime,
}

impl Session {
    /// Builds a session from a validated configuration.
    pub fn from_config(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;

        let catalog = config.species;
        let shop = Shop::new(config.shop.with_seeds(&catalog), config.owned_items)?;

        let starter = &config.starter_growbox;
        let mut growbox = GrowboxInventory::new(GrowboxId::STARTER, &starter.name, starter.capacity)?
            .with_level(starter.level);
        for item in &starter.installed {
            growbox.loadout_mut().install(shop.equipment(item)?);
        }

        let stats = PlayerStats {
            harvests: config.profile.harvests,
            equipment_owned: count_u32(shop.owned_equipment_count()),
            fastest_harvest: None,
        };
        let mut achievements = AchievementTracker::new(config.achievements);
        achievements.baseline(&stats);

        Ok(Self {
            profile: config.profile,
            watering: config.watering,
            catalog,
            growboxes: BTreeMap::from([(growbox.id(), growbox)]),
            seeds: config.seeds,
            ledger: EconomyLedger::new(config.coins, config.tokens),
            shop,
            achievements,
            stats,
            rivals: config.rivals,
            clock: SimTime::ZERO,
        })
    }

    /// Builds a session with the original game's starting state.
    pub fn with_defaults() -> SessionResult<Self> {
        Self::from_config(SessionConfig::default())
    }

    /// Moves the session behind a shared lock.
    #[must_use]
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    // === Commands ===

    /// Advances every plant in every growbox by `elapsed` simulated seconds.
    pub fn tick(&mut self, elapsed: u64) {
        self.clock = self.clock.advanced_by(elapsed);
        for growbox in self.growboxes.values_mut() {
            growbox.tick(elapsed);
        }
        trace!(elapsed, clock = %self.clock, "Session ticked");
    }

    /// Plants a seed from the session's seed inventory.
    pub fn plant_seed(
        &mut self,
        growbox: GrowboxId,
        slot: usize,
        species: Species,
    ) -> SessionResult<PlantId> {
        let target = self
            .growboxes
            .get_mut(&growbox)
            .ok_or(SessionError::UnknownGrowbox { id: growbox })?;
        Ok(target.plant_seed(slot, species, &mut self.seeds, &self.catalog)?)
    }

    /// Waters a plant with the configured amount. Returns the new water level.
    pub fn water(&mut self, plant: &PlantId) -> SessionResult<u8> {
        self.water_with(plant, self.watering.amount)
    }

    /// Waters a plant with a custom amount. Returns the new water level.
    pub fn water_with(&mut self, plant: &PlantId, amount: u32) -> SessionResult<u8> {
        let growbox = self.growbox_holding_mut(plant)?;
        growbox.water(plant, amount)?;
        Ok(growbox.plant(plant).map_or(0, Plant::water_level))
    }

    /// Harvests a ready plant, credits its payout and pays any rewards.
    ///
    /// The plant is checked first, then the payout is credited, then the
    /// slot is freed. A failure at any step leaves the session unchanged.
    pub fn harvest(&mut self, plant: &PlantId) -> SessionResult<HarvestReceipt> {
        let clock = self.clock;
        let growbox = self
            .growboxes
            .values_mut()
            .find(|g| g.contains(plant))
            .ok_or_else(|| GrowboxError::PlantNotFound { id: plant.clone() })?;

        let harvest = growbox.peek_harvest(plant)?;
        self.ledger.apply_harvest_payout(harvest.payout)?;
        growbox.harvest(plant)?;

        let grow_seconds = clock.since(harvest.planted_at);
        self.stats.record_harvest(grow_seconds);
        let unlocked = self.unlock_achievements();
        debug!(plant = %plant, payout = harvest.payout, grow_seconds, "Harvest settled");

        Ok(HarvestReceipt {
            plant_id: harvest.plant_id,
            species: harvest.species,
            payout: harvest.payout,
            grow_seconds,
            unlocked,
            coins: self.ledger.coins(),
        })
    }

    /// Adds coins. Returns the new balance.
    pub fn credit(&mut self, amount: i64) -> SessionResult<u64> {
        Ok(self.ledger.credit(amount)?)
    }

    /// Removes coins. Returns the new balance.
    pub fn debit(&mut self, amount: i64) -> SessionResult<u64> {
        Ok(self.ledger.debit(amount)?)
    }

    /// Buys a shop item and applies its effect.
    ///
    /// Seeds add one seed, growboxes add a new empty growbox, equipment and
    /// soil become owned and installable.
    pub fn purchase(&mut self, item: &ItemId) -> SessionResult<PurchaseReceipt> {
        // Build the growbox before paying so a bad catalog entry costs nothing.
        let new_growbox = match self.shop.catalog().item(item)?.kind {
            ShopItemKind::Growbox { capacity } => {
                let name = self.shop.catalog().item(item)?.name.clone();
                Some(
                    GrowboxInventory::new(self.next_growbox_id(), &name, capacity)?
                        .starting_at(self.clock),
                )
            }
            _ => None,
        };

        let purchased = self.shop.checkout(item, &mut self.ledger)?;
        let mut growbox = None;
        match purchased.kind {
            ShopItemKind::Seed { species } => self.seeds.add(species, 1),
            ShopItemKind::Growbox { .. } => {
                if let Some(created) = new_growbox {
                    growbox = Some(created.id());
                    self.growboxes.insert(created.id(), created);
                }
            }
            ShopItemKind::Equipment { .. } => {
                self.stats.equipment_owned = count_u32(self.shop.owned_equipment_count());
            }
        }

        let unlocked = self.unlock_achievements();
        Ok(PurchaseReceipt {
            item: purchased,
            growbox,
            unlocked,
            coins: self.ledger.coins(),
        })
    }

    /// Installs owned equipment in a growbox, returning what it replaced.
    ///
    /// An item can only be installed in one growbox at a time.
    pub fn install(&mut self, growbox: GrowboxId, item: &ItemId) -> SessionResult<Option<Equipment>> {
        let equipment = self.shop.equipment(item)?;
        if !self.growboxes.contains_key(&growbox) {
            return Err(SessionError::UnknownGrowbox { id: growbox });
        }
        if let Some(other) = self
            .growboxes
            .values()
            .find(|g| g.id() != growbox && g.loadout().contains(item))
        {
            return Err(SessionError::EquipmentInUse {
                item: item.clone(),
                growbox: other.id(),
            });
        }

        let target = self.growbox_mut(growbox)?;
        let previous = target.loadout_mut().install(equipment);
        debug!(%growbox, %item, "Equipment installed");
        Ok(previous)
    }

    /// Removes the equipment in a growbox slot.
    pub fn uninstall(
        &mut self,
        growbox: GrowboxId,
        slot: EquipmentSlot,
    ) -> SessionResult<Option<Equipment>> {
        let removed = self.growbox_mut(growbox)?.loadout_mut().remove(slot);
        debug!(%growbox, ?slot, "Equipment removed");
        Ok(removed)
    }

    // === Queries ===

    /// Simulated session time.
    #[must_use]
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Currency balances.
    #[must_use]
    pub fn balances(&self) -> Balances {
        self.ledger.balances()
    }

    /// Retained ledger history, oldest first.
    pub fn ledger_history(&self) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.ledger.history()
    }

    /// Removes and returns the retained ledger history, oldest first.
    pub fn drain_ledger_history(&mut self) -> Vec<LedgerEntry> {
        self.ledger.drain_history()
    }

    /// Seed counts.
    #[must_use]
    pub fn seeds(&self) -> SeedInventory {
        self.seeds.clone()
    }

    /// Player totals used for achievements.
    #[must_use]
    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Watering rules of this session.
    #[must_use]
    pub fn watering(&self) -> WateringRules {
        self.watering
    }

    /// Species table.
    #[must_use]
    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Growbox ids in order.
    #[must_use]
    pub fn growbox_ids(&self) -> Vec<GrowboxId> {
        self.growboxes.keys().copied().collect()
    }

    /// Snapshot of one growbox.
    pub fn growbox(&self, id: GrowboxId) -> SessionResult<GrowboxSnapshot> {
        self.growboxes
            .get(&id)
            .map(GrowboxInventory::snapshot)
            .ok_or(SessionError::UnknownGrowbox { id })
    }

    /// Copy of one plant.
    #[must_use]
    pub fn plant(&self, id: &PlantId) -> Option<Plant> {
        self.growboxes.values().find_map(|g| g.plant(id)).cloned()
    }

    /// Checks if a plant could use water (not already well watered).
    #[must_use]
    pub fn needs_water(&self, id: &PlantId) -> bool {
        self.growboxes
            .values()
            .find_map(|g| g.plant(id))
            .is_some_and(|p| !p.is_well_watered(self.watering.well_watered_threshold))
    }

    /// Ids of ready plants across all growboxes.
    #[must_use]
    pub fn ready_plants(&self) -> Vec<PlantId> {
        self.growboxes
            .values()
            .flat_map(GrowboxInventory::ready_plants)
            .collect()
    }

    /// Empty slots across all growboxes.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<(GrowboxId, usize)> {
        self.growboxes
            .values()
            .flat_map(|g| g.empty_slots().map(move |slot| (g.id(), slot)))
            .collect()
    }

    /// Checks if an item can be bought right now.
    #[must_use]
    pub fn can_buy(&self, item: &ItemId) -> bool {
        self.shop.can_buy(item, &self.ledger)
    }

    /// The shop.
    #[must_use]
    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Achievement progress.
    #[must_use]
    pub fn achievements(&self) -> Vec<AchievementStatus> {
        self.achievements.statuses(&self.stats)
    }

    /// Leaderboard including the player's live totals.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let player = LeaderboardEntry::new(
            &self.profile.name,
            self.profile.level,
            self.stats.harvests,
            self.ledger.coins(),
        );
        standings(player, &self.rivals)
    }

    /// Read-only copy of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SchemaVersion::SNAPSHOT,
            clock: self.clock,
            profile: ProfileConfig {
                harvests: self.stats.harvests,
                ..self.profile.clone()
            },
            balances: self.ledger.balances(),
            seeds: self.seeds.clone(),
            growboxes: self.growboxes.values().map(GrowboxInventory::snapshot).collect(),
            owned_items: self.shop.owned().cloned().collect(),
            achievements: self.achievements(),
        }
    }

    // === Internals ===

    fn growbox_mut(&mut self, id: GrowboxId) -> SessionResult<&mut GrowboxInventory> {
        self.growboxes
            .get_mut(&id)
            .ok_or(SessionError::UnknownGrowbox { id })
    }

    fn growbox_holding_mut(&mut self, plant: &PlantId) -> SessionResult<&mut GrowboxInventory> {
        self.growboxes
            .values_mut()
            .find(|g| g.contains(plant))
            .ok_or_else(|| GrowboxError::PlantNotFound { id: plant.clone() }.into())
    }

    fn next_growbox_id(&self) -> GrowboxId {
        let last = self.growboxes.keys().next_back().map_or(0, |id| id.raw());
        GrowboxId::new(last + 1)
    }

    fn unlock_achievements(&mut self) -> Vec<Achievement> {
        let unlocked = self.achievements.evaluate(&self.stats);
        for achievement in &unlocked {
            if let Err(error) = self.ledger.reward(achievement.reward) {
                warn!(achievement = %achievement.id, %error, "Achievement reward not paid");
            }
        }
        unlocked
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
