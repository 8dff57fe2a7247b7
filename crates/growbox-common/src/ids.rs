//! ID types for plants, growboxes and shop items.

use serde::{Deserialize, Serialize};

/// Unique identifier for a plant instance.
///
/// Plant ids are strings so presentation layers can key their views on them
/// directly. Ids minted by a growbox embed the growbox id and a per-growbox
/// sequence number, which keeps them unique across one session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(String);

impl PlantId {
    /// Creates a plant id from an arbitrary string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints the id of the `sequence`-th plant planted in `growbox`.
    #[must_use]
    pub fn sequenced(growbox: GrowboxId, sequence: u64) -> Self {
        Self(format!("{growbox}-plant_{sequence}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique identifier for a growbox owned by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowboxId(u32);

impl GrowboxId {
    /// Creates a growbox ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The growbox every new session starts with.
    pub const STARTER: Self = Self(1);
}

impl std::fmt::Display for GrowboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gb_{}", self.0)
    }
}

/// Identifier of a shop catalog entry (`"pro_led"`, `"tomato_seeds"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
