//! Property tests for time advancement.

use growbox_common::{ItemId, PlantId, SimTime};
use growbox_sim::{
    Equipment, EquipmentEffect, EquipmentSlot, GrowthStage, Loadout, Plant, Species,
    SpeciesCatalog, SpeciesProfile, UniformRate,
};
use proptest::prelude::*;

fn arb_species() -> impl Strategy<Value = Species> {
    prop_oneof![
        Just(Species::Tomato),
        Just(Species::Basil),
        Just(Species::Lettuce),
        Just(Species::Pepper),
        Just(Species::Herb),
    ]
}

/// Growth rates in percent: shop equipment sums plus arbitrary ones.
fn arb_equipment_percent() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(115),
        Just(125),
        Just(130),
        Just(135),
        Just(140),
        Just(145),
        Just(165),
        1u32..400,
    ]
}

fn planted(species: Species) -> Plant {
    let catalog = SpeciesCatalog::builtin();
    Plant::from_catalog(PlantId::new("prop"), &catalog, species, SimTime::ZERO)
        .expect("builtin species")
}

fn thirsty(grow_time: u64, water_use: u32) -> Plant {
    let catalog = SpeciesCatalog::from_profiles(vec![SpeciesProfile::new(
        Species::Lettuce,
        "Lettuce",
        grow_time,
        30,
        12,
    )
    .with_water_use(water_use)])
    .expect("catalog");
    Plant::from_catalog(PlantId::new("thirsty"), &catalog, Species::Lettuce, SimTime::ZERO)
        .expect("lettuce")
}

fn state(plant: &Plant) -> (u8, u64, GrowthStage, u8) {
    (
        plant.progress(),
        plant.time_remaining(),
        plant.stage(),
        plant.water_level(),
    )
}

proptest! {
    #[test]
    fn prop_advance_is_associative(
        species in arb_species(),
        steps in prop::collection::vec(0u64..2_000, 0..12),
    ) {
        let total: u64 = steps.iter().sum();
        let mut stepped = planted(species);
        for step in &steps {
            stepped.advance(*step);
        }
        let mut once = planted(species);
        once.advance(total);
        prop_assert_eq!(state(&stepped), state(&once));
    }

    #[test]
    fn prop_advance_with_equipment_is_associative(
        percent in arb_equipment_percent(),
        steps in prop::collection::vec(0u64..2_000, 0..12),
    ) {
        let rate = |_: &Plant| percent;
        let total: u64 = steps.iter().sum();
        let mut stepped = planted(Species::Pepper);
        for step in &steps {
            stepped.advance_time(*step, &rate);
        }
        let mut once = planted(Species::Pepper);
        once.advance_time(total, &rate);
        prop_assert_eq!(state(&stepped), state(&once));
    }

    #[test]
    fn prop_one_second_ticks_match_coalesced_advance(
        species in arb_species(),
        percent in arb_equipment_percent(),
        total in 0u64..400,
    ) {
        let rate = |_: &Plant| percent;
        let mut stepped = planted(species);
        for _ in 0..total {
            stepped.advance_time(1, &rate);
        }
        let mut once = planted(species);
        once.advance_time(total, &rate);
        prop_assert_eq!(state(&stepped), state(&once));
        prop_assert_eq!(stepped.seconds_to_ready(&rate), once.seconds_to_ready(&rate));
    }

    #[test]
    fn prop_loadout_ticks_match_coalesced_advance(
        bonus in 0u32..200,
        steps in prop::collection::vec(1u64..90, 1..40),
    ) {
        let mut loadout = Loadout::new();
        loadout.install(Equipment {
            item: ItemId::new("led_light"),
            name: "LED Light".into(),
            slot: EquipmentSlot::Lamp,
            effect: EquipmentEffect::Growth(bonus),
        });
        let total: u64 = steps.iter().sum();
        let mut stepped = planted(Species::Herb);
        for step in &steps {
            stepped.advance_time(*step, &loadout);
        }
        let mut once = planted(Species::Herb);
        once.advance_time(total, &loadout);
        prop_assert_eq!(state(&stepped), state(&once));
    }

    #[test]
    fn prop_water_decay_is_associative(
        grow_time in 1u64..10_000,
        water_use in 0u32..200,
        steps in prop::collection::vec(0u64..3_000, 0..12),
    ) {
        let total: u64 = steps.iter().sum();
        let mut stepped = thirsty(grow_time, water_use);
        for step in &steps {
            stepped.advance(*step);
        }
        let mut once = thirsty(grow_time, water_use);
        once.advance(total);
        prop_assert_eq!(state(&stepped), state(&once));
    }

    #[test]
    fn prop_advance_is_monotonic(
        species in arb_species(),
        steps in prop::collection::vec(0u64..1_500, 1..20),
    ) {
        let mut plant = planted(species);
        for step in steps {
            let (progress, remaining, stage, _) = state(&plant);
            plant.advance_time(step, &UniformRate);
            prop_assert!(plant.progress() >= progress);
            prop_assert!(plant.time_remaining() <= remaining);
            if stage == GrowthStage::Ready {
                prop_assert_eq!(plant.stage(), GrowthStage::Ready);
            }
            if stage == GrowthStage::Growing {
                prop_assert_ne!(plant.stage(), GrowthStage::Planted);
            }
        }
    }

    #[test]
    fn prop_ready_iff_done(
        species in arb_species(),
        steps in prop::collection::vec(0u64..3_000, 0..8),
    ) {
        let mut plant = planted(species);
        for step in steps {
            plant.advance(step);
            let done = plant.time_remaining() == 0 && plant.progress() == 100;
            prop_assert_eq!(plant.stage() == GrowthStage::Ready, done);
            if plant.stage() == GrowthStage::Planted {
                prop_assert_eq!(plant.progress(), 0);
            }
        }
    }

    #[test]
    fn prop_zero_elapsed_is_noop(species in arb_species(), warmup in 0u64..6_000) {
        let mut plant = planted(species);
        plant.advance(warmup);
        let before = state(&plant);
        plant.advance(0);
        prop_assert_eq!(state(&plant), before);
    }
}
