//! # Growbox Host
//!
//! Headless host for the Growbox simulation core.
//!
//! The host owns everything the core leaves out on purpose:
//! - The periodic timer that drives `tick`
//! - Loading configuration from disk
//! - Logging setup and JSON output of the final snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod timing;

pub use app::{pick_species, run, Host, RunSummary};
pub use config::{HostConfig, HostSettings};
pub use timing::TickClock;
