//! # Growbox Common
//!
//! Common types shared by the Growbox simulation and its hosts.
//!
//! This crate provides:
//! - Identifier newtypes (plants, growboxes, shop items)
//! - The simulated clock value used instead of wall-clock time
//! - Schema versions for configuration and snapshots
//! - Schema error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_id_sequence_format() {
        let growbox = GrowboxId::new(1);
        let id = PlantId::sequenced(growbox, 3);
        assert_eq!(id.as_str(), "gb_1-plant_3");
    }

    #[test]
    fn test_sim_time_advances() {
        let t0 = SimTime::ZERO;
        let t1 = t0.advanced_by(90);
        assert_eq!(t1.seconds(), 90);
        assert_eq!(t1.since(t0), 90);
        assert_eq!(t0.since(t1), 0);
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        assert!(v2.is_compatible_with(&v1));
        assert!(!v1.is_compatible_with(&v3));
        assert!(v1.ensure_readable(&v3).is_err());
    }
}
