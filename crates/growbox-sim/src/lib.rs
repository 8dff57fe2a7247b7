//! # Growbox Sim
//!
//! Deterministic simulation core of the Growbox farming game.
//!
//! This crate provides:
//! - Species catalog (grow times, values, seed prices)
//! - Plant lifecycle state machine (planted, growing, ready)
//! - Growbox inventory with fixed slot capacity
//! - Seed inventory
//! - Economy ledger (coins, tokens, audit trail)
//! - Equipment loadouts as growth-rate modifiers
//! - Shop, achievements and leaderboard
//! - Session aggregate with TOML configuration
//!
//! Time only moves when the host calls [`Session::tick`]; the core never
//! reads a wall clock.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod achievements;
pub mod config;
pub mod economy;
pub mod equipment;
pub mod growbox;
pub mod leaderboard;
pub mod plants;
pub mod seeds;
pub mod session;
pub mod shop;
pub mod species;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::achievements::*;
    pub use crate::config::*;
    pub use crate::economy::*;
    pub use crate::equipment::*;
    pub use crate::growbox::*;
    pub use crate::leaderboard::*;
    pub use crate::plants::*;
    pub use crate::seeds::*;
    pub use crate::session::*;
    pub use crate::shop::*;
    pub use crate::species::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use growbox_common::{GrowboxId, SimTime};

    #[test]
    fn test_tomato_lifecycle() {
        let catalog = SpeciesCatalog::builtin();
        let mut growbox =
            GrowboxInventory::new(GrowboxId::STARTER, "Basic Growbox", 1).expect("growbox");
        let mut seeds = SeedInventory::with_counts([(Species::Tomato, 1)]);

        let id = growbox
            .plant_seed(0, Species::Tomato, &mut seeds, &catalog)
            .expect("planted");
        growbox.tick(1800);
        let plant = growbox.plant(&id).expect("plant");
        assert_eq!(plant.progress(), 50);
        assert_eq!(plant.stage(), GrowthStage::Growing);

        growbox.tick(1800);
        assert_eq!(growbox.clock(), SimTime::from_seconds(3600));
        let harvest = growbox.harvest(&id).expect("ready");
        assert_eq!(harvest.payout, 45);
        assert_eq!(growbox.occupied(), 0);
    }

    #[test]
    fn test_ledger_transactions() {
        let mut ledger = EconomyLedger::new(1000, 0);

        assert!(ledger.purchase(500).is_ok());
        assert_eq!(ledger.coins(), 500);

        ledger.apply_harvest_payout(200).expect("payout");
        assert_eq!(ledger.coins(), 700);
    }

    #[test]
    fn test_species_parse() {
        let species: Species = "Herb".parse().expect("herb");
        assert_eq!(species, Species::Herb);
        assert!("cactus".parse::<Species>().is_err());
    }
}
