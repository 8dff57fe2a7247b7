//! End-to-end command scenarios through a session.

use growbox_common::{GrowboxId, ItemId, PlantId};
use growbox_sim::{
    EconomyError, EconomyLedger, GrowboxError, GrowthStage, PlantError, SeedError, Session,
    SessionConfig, SessionError, Species,
};

/// Session with a single-slot growbox and no profile history.
fn small_session() -> Session {
    let mut config = SessionConfig::default();
    config.profile.harvests = 0;
    config.starter_growbox.capacity = 1;
    config.starter_growbox.installed.clear();
    Session::from_config(config).expect("session")
}

#[test]
fn tomato_grows_to_harvest() {
    let mut session = small_session();
    let id = session
        .plant_seed(GrowboxId::STARTER, 0, Species::Tomato)
        .expect("planted");

    let plant = session.plant(&id).expect("plant");
    assert_eq!(plant.stage(), GrowthStage::Planted);
    assert_eq!(plant.progress(), 0);
    assert_eq!(plant.time_remaining(), 3600);
    assert_eq!(plant.water_level(), 100);

    session.tick(1800);
    let plant = session.plant(&id).expect("plant");
    assert_eq!(plant.progress(), 50);
    assert_eq!(plant.stage(), GrowthStage::Growing);

    session.tick(1800);
    let plant = session.plant(&id).expect("plant");
    assert_eq!(plant.progress(), 100);
    assert_eq!(plant.time_remaining(), 0);
    assert_eq!(plant.stage(), GrowthStage::Ready);

    let receipt = session.harvest(&id).expect("harvest");
    assert_eq!(receipt.payout, 45);
    assert!(session.plant(&id).is_none());
    assert_eq!(
        session.growbox(GrowboxId::STARTER).expect("growbox").occupied(),
        0
    );
}

#[test]
fn ledger_rejects_overdraft() {
    let mut ledger = EconomyLedger::new(100, 0);
    assert!(matches!(
        ledger.debit(150),
        Err(EconomyError::InsufficientFunds { .. })
    ));
    assert_eq!(ledger.coins(), 100);

    ledger.credit(50).expect("credit");
    ledger.debit(150).expect("debit");
    assert_eq!(ledger.coins(), 0);
}

#[test]
fn session_debit_matches_ledger_rules() {
    let mut session = small_session();
    let coins = session.balances().coins;
    let too_much = i64::try_from(coins + 1).expect("fits");
    assert!(matches!(
        session.debit(too_much),
        Err(SessionError::Economy(EconomyError::InsufficientFunds { .. }))
    ));
    assert!(matches!(
        session.credit(-5),
        Err(SessionError::Economy(EconomyError::InvalidAmount { amount: -5 }))
    ));
    assert_eq!(session.balances().coins, coins);
}

#[test]
fn occupied_slot_rejects_any_seed() {
    let mut session = small_session();
    session
        .plant_seed(GrowboxId::STARTER, 0, Species::Tomato)
        .expect("planted");
    let seeds = session.seeds();

    let result = session.plant_seed(GrowboxId::STARTER, 0, Species::Basil);
    assert!(matches!(
        result,
        Err(SessionError::Growbox(GrowboxError::SlotOccupied { slot: 0, .. }))
    ));
    assert_eq!(session.seeds(), seeds);
    assert_eq!(
        session.growbox(GrowboxId::STARTER).expect("growbox").occupied(),
        1
    );
}

#[test]
fn out_of_seed_leaves_slot_empty() {
    let mut config = SessionConfig::default();
    config.seeds = growbox_sim::SeedInventory::new();
    let mut session = Session::from_config(config).expect("session");

    let result = session.plant_seed(GrowboxId::STARTER, 0, Species::Pepper);
    assert!(matches!(
        result,
        Err(SessionError::Growbox(GrowboxError::Seed(SeedError::OutOfSeed {
            species: Species::Pepper
        })))
    ));
    assert_eq!(
        session.growbox(GrowboxId::STARTER).expect("growbox").occupied(),
        0
    );
}

#[test]
fn early_harvest_changes_nothing() {
    let mut session = small_session();
    let id = session
        .plant_seed(GrowboxId::STARTER, 0, Species::Pepper)
        .expect("planted");
    session.tick(5399);
    let before = session.snapshot();

    let result = session.harvest(&id);
    assert!(matches!(
        result,
        Err(SessionError::Growbox(GrowboxError::Plant(PlantError::NotReady {
            stage: GrowthStage::Growing,
            ..
        })))
    ));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn unknown_plant_is_not_found() {
    let mut session = small_session();
    let ghost = PlantId::new("gb_1-plant_99");
    assert!(matches!(
        session.harvest(&ghost),
        Err(SessionError::Growbox(GrowboxError::PlantNotFound { .. }))
    ));
    assert!(matches!(
        session.water_with(&ghost, 10),
        Err(SessionError::Growbox(GrowboxError::PlantNotFound { .. }))
    ));
}

#[test]
fn bought_seeds_and_growbox_are_usable() {
    let mut session = small_session();
    let receipt = session
        .purchase(&ItemId::new("medium_gb"))
        .expect("growbox");
    let second = receipt.growbox.expect("new growbox id");

    for slot in 0..8 {
        session
            .plant_seed(second, slot, Species::Lettuce)
            .expect("lettuce");
    }
    assert_eq!(session.seeds().count(Species::Lettuce), 4);
    session.tick(2400);
    assert_eq!(session.ready_plants().len(), 8);

    let mut harvested = 0;
    for id in session.ready_plants() {
        harvested += session.harvest(&id).expect("harvest").payout;
    }
    assert_eq!(harvested, 8 * 30);
    assert_eq!(session.stats().harvests, 8);
}
