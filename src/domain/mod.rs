//! Domain types for the store dumper.
//!
//! This module contains the core data structures:
//! - DeviceProfile: The device identity a run impersonates
//! - AppId / ResolvedItem: Catalog entries and their resolution records
//! - ItemOutcome / RunReport: Terminal state of each item and the run tally

pub mod device;
pub mod item;
pub mod outcome;

// Re-export commonly used types
pub use device::DeviceProfile;
pub use item::{AppId, ResolvedItem};
pub use outcome::{FailureStage, ItemOutcome, RunReport};
