//! Leaderboard ranking of the player against rival growers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One grower on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Grower name.
    pub name: String,
    /// Grower level.
    pub level: u32,
    /// Lifetime harvests.
    pub harvests: u32,
    /// Coin balance.
    pub coins: u64,
}

impl LeaderboardEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: &str, level: u32, harvests: u32, coins: u64) -> Self {
        Self {
            name: name.to_string(),
            level,
            harvests,
            coins,
        }
    }

    /// Rivals of the original game.
    #[must_use]
    pub fn default_rivals() -> Vec<Self> {
        vec![
            Self::new("PlantMaster Pro", 15, 450, 25_000),
            Self::new("GreenThumb99", 12, 380, 19_500),
            Self::new("HydroExpert", 11, 320, 16_800),
            Self::new("LeafLover", 8, 180, 8_900),
            Self::new("SeedKeeper", 6, 140, 6_200),
        ]
    }
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank.
    pub rank: usize,
    /// The grower.
    pub entry: LeaderboardEntry,
    /// Whether this row is the player.
    pub is_player: bool,
}

fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.coins
        .cmp(&a.coins)
        .then_with(|| b.harvests.cmp(&a.harvests))
        .then_with(|| a.name.cmp(&b.name))
}

/// Ranks `player` among `rivals`: coins descending, then harvests
/// descending, then name.
#[must_use]
pub fn standings(player: LeaderboardEntry, rivals: &[LeaderboardEntry]) -> Vec<Standing> {
    let mut rows: Vec<(LeaderboardEntry, bool)> = rivals
        .iter()
        .cloned()
        .map(|entry| (entry, false))
        .chain(std::iter::once((player, true)))
        .collect();
    rows.sort_by(|(a, _), (b, _)| rank_order(a, b));
    rows.into_iter()
        .enumerate()
        .map(|(index, (entry, is_player))| Standing {
            rank: index + 1,
            entry,
            is_player,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ranked_by_coins() {
        let player = LeaderboardEntry::new("GrowMaster", 5, 89, 2500);
        let rows = standings(player, &LeaderboardEntry::default_rivals());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].entry.name, "PlantMaster Pro");
        let me = rows.iter().find(|r| r.is_player).expect("player row");
        assert_eq!(me.rank, 6);
    }

    #[test]
    fn test_ties_broken_by_harvests_then_name() {
        let rivals = vec![
            LeaderboardEntry::new("Bea", 1, 10, 100),
            LeaderboardEntry::new("Abe", 1, 10, 100),
            LeaderboardEntry::new("Cid", 1, 20, 100),
        ];
        let player = LeaderboardEntry::new("Dot", 1, 5, 500);
        let names: Vec<String> = standings(player, &rivals)
            .into_iter()
            .map(|s| s.entry.name)
            .collect();
        assert_eq!(names, vec!["Dot", "Cid", "Abe", "Bea"]);
    }
}
