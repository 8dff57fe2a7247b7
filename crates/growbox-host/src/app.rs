//! Headless run loop.
//!
//! Builds a session, keeps every slot planted, drives ticks until the
//! configured simulated time has passed and returns the final snapshot.

use anyhow::Result;
use growbox_sim::{SeedInventory, Session, SessionSnapshot, Species};
use tracing::{debug, info, warn};

use crate::config::{HostConfig, HostSettings};
use crate::timing::TickClock;

/// Totals of one host run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks applied to the session, the last one possibly cut short
    pub ticks: u64,
    /// Simulated seconds applied
    pub simulated_seconds: u64,
    /// Seeds planted
    pub planted: u64,
    /// Plants harvested
    pub harvested: u64,
    /// Coins earned from harvests
    pub earned: u64,
}

/// Drives one session with the host settings.
#[derive(Debug)]
pub struct Host {
    settings: HostSettings,
    session: Session,
    clock: TickClock,
    summary: RunSummary,
    next_report: u64,
}

impl Host {
    /// Builds the session described by `config`.
    pub fn new(config: HostConfig) -> Result<Self> {
        let HostConfig { host, session } = config;
        let session = Session::from_config(session)?;
        let clock = TickClock::new(host.tick_seconds, host.realtime);
        Ok(Self {
            next_report: host.report_every,
            settings: host,
            session,
            clock,
            summary: RunSummary::default(),
        })
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Totals so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Runs until `run_seconds` of simulated time have passed.
    pub fn run(&mut self) -> Result<SessionSnapshot> {
        self.plant_empty_slots();
        self.clock.reset();

        while self.session.clock().seconds() < self.settings.run_seconds {
            let due = self.clock.poll();
            if due == 0 {
                self.clock.sleep_until_next();
                continue;
            }
            self.step(due)?;
        }

        info!(
            ticks = self.summary.ticks,
            simulated_seconds = self.summary.simulated_seconds,
            planted = self.summary.planted,
            harvested = self.summary.harvested,
            earned = self.summary.earned,
            "Run complete"
        );
        Ok(self.session.snapshot())
    }

    /// Applies `due` ticks as one advance, then harvests and replants.
    ///
    /// Time past `run_seconds` is dropped, and so are the ticks it belonged to.
    pub fn step(&mut self, due: u32) -> Result<()> {
        let remaining = self
            .settings
            .run_seconds
            .saturating_sub(self.session.clock().seconds());
        let tick_seconds = self.clock.tick_seconds();
        let elapsed = u64::from(due).saturating_mul(tick_seconds).min(remaining);
        if elapsed == 0 {
            return Ok(());
        }
        self.session.tick(elapsed);
        self.summary.ticks += elapsed.div_ceil(tick_seconds);
        self.summary.simulated_seconds += elapsed;

        if self.settings.auto_harvest {
            self.harvest_ready()?;
        }
        if self.settings.auto_replant {
            self.plant_empty_slots();
        }
        self.report();
        Ok(())
    }

    fn harvest_ready(&mut self) -> Result<()> {
        for plant in self.session.ready_plants() {
            let receipt = self.session.harvest(&plant)?;
            self.summary.harvested += 1;
            self.summary.earned += receipt.payout;
            for achievement in &receipt.unlocked {
                debug!(achievement = %achievement.name, plant = %plant, "Unlocked by harvest");
            }
        }
        Ok(())
    }

    fn plant_empty_slots(&mut self) {
        for (growbox, slot) in self.session.empty_slots() {
            let Some(species) = pick_species(&self.session.seeds()) else {
                debug!("Out of seeds, leaving slots empty");
                return;
            };
            match self.session.plant_seed(growbox, slot, species) {
                Ok(_) => self.summary.planted += 1,
                Err(e) => warn!("Failed to plant {species} in {growbox} slot {slot}: {e}"),
            }
        }
    }

    fn report(&mut self) {
        if self.settings.report_every == 0 {
            return;
        }
        let now = self.session.clock().seconds();
        if now < self.next_report {
            return;
        }
        while self.next_report <= now {
            self.next_report += self.settings.report_every;
        }

        let balances = self.session.balances();
        let growing: usize = self
            .session
            .growbox_ids()
            .into_iter()
            .filter_map(|id| self.session.growbox(id).ok())
            .map(|g| g.occupied())
            .sum();
        info!(
            clock = %self.session.clock(),
            coins = balances.coins,
            growing,
            ready = self.session.ready_plants().len(),
            harvested = self.summary.harvested,
            "Progress"
        );
    }
}

/// Species with the most seeds left, earliest species on ties.
#[must_use]
pub fn pick_species(seeds: &SeedInventory) -> Option<Species> {
    seeds
        .iter()
        .filter(|(_, count)| *count > 0)
        .fold(None, |best: Option<(Species, u32)>, (species, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((species, count)),
        })
        .map(|(species, _)| species)
}

/// Builds a host from `config` and runs it to completion.
pub fn run(config: HostConfig) -> Result<SessionSnapshot> {
    info!(
        run_seconds = config.host.run_seconds,
        tick_seconds = config.host.tick_seconds,
        realtime = config.host.realtime,
        "Starting growbox host"
    );
    Host::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use growbox_common::GrowboxId;

    fn config(run_seconds: u64) -> HostConfig {
        let mut config = HostConfig::default();
        config.host.run_seconds = run_seconds;
        config.host.tick_seconds = 60;
        config
    }

    #[test]
    fn test_pick_species_prefers_largest_stock() {
        let seeds = SeedInventory::with_counts([
            (Species::Tomato, 5),
            (Species::Basil, 8),
            (Species::Lettuce, 8),
        ]);
        assert_eq!(pick_species(&seeds), Some(Species::Basil));
        assert_eq!(pick_species(&SeedInventory::new()), None);
    }

    #[test]
    fn test_run_stops_at_run_seconds() {
        let snapshot = run(config(3601)).expect("run");
        assert_eq!(snapshot.clock.seconds(), 3601);
    }

    #[test]
    fn test_step_counts_only_applied_ticks() {
        let mut host = Host::new(config(150)).expect("host");
        host.step(10).expect("step");
        // 10 ticks of 60s were due, only 150s remained: two full ticks and a short one.
        assert_eq!(host.summary().ticks, 3);
        assert_eq!(host.summary().simulated_seconds, 150);
        assert_eq!(host.session().clock().seconds(), 150);

        host.step(5).expect("step");
        assert_eq!(host.summary().ticks, 3);
        assert_eq!(host.summary().simulated_seconds, 150);
    }

    #[test]
    fn test_run_summary_matches_clock() {
        let mut host = Host::new(config(3601)).expect("host");
        host.run().expect("run");
        assert_eq!(host.summary().ticks, 61);
        assert_eq!(host.summary().simulated_seconds, 3601);
    }

    #[test]
    fn test_run_harvests_and_replants() {
        let mut host = Host::new(config(7200)).expect("host");
        let snapshot = host.run().expect("run");
        let summary = host.summary();

        assert!(summary.harvested > 0);
        assert!(summary.planted > summary.harvested);
        assert!(snapshot.balances.coins > 2500);
        assert_eq!(snapshot.growboxes[0].occupied(), 4);
    }

    #[test]
    fn test_no_harvest_when_disabled() {
        let mut config = config(7200);
        config.host.auto_harvest = false;
        let mut host = Host::new(config).expect("host");
        host.run().expect("run");
        assert_eq!(host.summary().harvested, 0);
        assert_eq!(host.summary().planted, 4);
        let starter = host
            .session()
            .growbox(GrowboxId::STARTER)
            .expect("starter");
        assert_eq!(starter.ready_count(), 4);
    }
}
