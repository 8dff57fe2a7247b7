//! Achievements unlocked by harvesting and collecting equipment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// What has to happen for an achievement to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "goal", rename_all = "snake_case")]
pub enum AchievementGoal {
    /// Harvest a number of plants in total.
    Harvests {
        /// Required harvest count
        count: u32,
    },
    /// Own a number of equipment items (soil excluded).
    EquipmentOwned {
        /// Required item count
        count: u32,
    },
    /// Harvest a plant within a number of simulated seconds of planting it.
    FastHarvest {
        /// Time limit, exclusive
        within_seconds: u64,
    },
}

impl AchievementGoal {
    /// Progress as `(current, required)`.
    #[must_use]
    pub fn progress(self, stats: &PlayerStats) -> (u64, u64) {
        match self {
            Self::Harvests { count } => (
                u64::from(stats.harvests.min(count)),
                u64::from(count),
            ),
            Self::EquipmentOwned { count } => (
                u64::from(stats.equipment_owned.min(count)),
                u64::from(count),
            ),
            Self::FastHarvest { within_seconds } => {
                let met = stats.fastest_harvest.is_some_and(|s| s < within_seconds);
                (u64::from(met), 1)
            }
        }
    }

    /// Checks if `stats` satisfy the goal.
    #[must_use]
    pub fn is_met(self, stats: &PlayerStats) -> bool {
        let (current, required) = self.progress(stats);
        current >= required
    }
}

/// An achievement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the player has to do.
    pub description: String,
    /// Completion condition.
    #[serde(flatten)]
    pub goal: AchievementGoal,
    /// Coins credited on completion.
    pub reward: u64,
}

impl Achievement {
    /// Creates an achievement.
    #[must_use]
    pub fn new(id: &str, name: &str, description: &str, goal: AchievementGoal, reward: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            goal,
            reward,
        }
    }
}

/// Player totals the achievements are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Plants harvested, lifetime.
    pub harvests: u32,
    /// Equipment items owned, soil excluded.
    pub equipment_owned: u32,
    /// Shortest plant-to-harvest time seen, in simulated seconds.
    pub fastest_harvest: Option<u64>,
}

impl PlayerStats {
    /// Records one harvest that took `grow_seconds` from planting.
    pub fn record_harvest(&mut self, grow_seconds: u64) {
        self.harvests = self.harvests.saturating_add(1);
        self.fastest_harvest = Some(
            self.fastest_harvest
                .map_or(grow_seconds, |fastest| fastest.min(grow_seconds)),
        );
    }
}

/// Completion state of one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStatus {
    /// The definition.
    pub achievement: Achievement,
    /// Whether it has been completed.
    pub completed: bool,
    /// Current progress.
    pub current: u64,
    /// Required progress.
    pub required: u64,
}

/// Tracks which achievements are complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementTracker {
    definitions: Vec<Achievement>,
    completed: BTreeSet<String>,
}

impl AchievementTracker {
    /// Creates a tracker with nothing completed.
    #[must_use]
    pub fn new(definitions: Vec<Achievement>) -> Self {
        Self {
            definitions,
            completed: BTreeSet::new(),
        }
    }

    /// The five achievements of the original game.
    #[must_use]
    pub fn builtin_definitions() -> Vec<Achievement> {
        vec![
            Achievement::new(
                "first_harvest",
                "First Harvest",
                "Harvest your first plant",
                AchievementGoal::Harvests { count: 1 },
                50,
            ),
            Achievement::new(
                "green_thumb",
                "Green Thumb",
                "Harvest 10 plants",
                AchievementGoal::Harvests { count: 10 },
                100,
            ),
            Achievement::new(
                "master_grower",
                "Master Grower",
                "Harvest 50 plants",
                AchievementGoal::Harvests { count: 50 },
                200,
            ),
            Achievement::new(
                "equipment_collector",
                "Equipment Collector",
                "Own 5 different equipment items",
                AchievementGoal::EquipmentOwned { count: 5 },
                150,
            ),
            Achievement::new(
                "speed_grower",
                "Speed Grower",
                "Harvest a plant in under 1 hour",
                AchievementGoal::FastHarvest {
                    within_seconds: 3600,
                },
                300,
            ),
        ]
    }

    /// Marks every achievement `stats` already satisfy as completed, without
    /// reporting it. Used for profiles that start with history.
    pub fn baseline(&mut self, stats: &PlayerStats) {
        for achievement in &self.definitions {
            if achievement.goal.is_met(stats) {
                self.completed.insert(achievement.id.clone());
            }
        }
    }

    /// Completes every achievement `stats` newly satisfy and returns them.
    ///
    /// Completed achievements are never returned again.
    pub fn evaluate(&mut self, stats: &PlayerStats) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        for achievement in &self.definitions {
            if self.completed.contains(&achievement.id) || !achievement.goal.is_met(stats) {
                continue;
            }
            self.completed.insert(achievement.id.clone());
            info!(achievement = %achievement.id, reward = achievement.reward, "Achievement unlocked");
            unlocked.push(achievement.clone());
        }
        unlocked
    }

    /// Checks if an achievement is complete.
    #[must_use]
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// Number of completed achievements.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// All definitions.
    #[must_use]
    pub fn definitions(&self) -> &[Achievement] {
        &self.definitions
    }

    /// Completion state of every achievement, in definition order.
    #[must_use]
    pub fn statuses(&self, stats: &PlayerStats) -> Vec<AchievementStatus> {
        self.definitions
            .iter()
            .map(|achievement| {
                let completed = self.is_completed(&achievement.id);
                let (current, required) = achievement.goal.progress(stats);
                AchievementStatus {
                    achievement: achievement.clone(),
                    completed,
                    current: if completed { required } else { current },
                    required,
                }
            })
            .collect()
    }
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new(Self::builtin_definitions())
    }
}
