//! storedump - Galaxy Store category dumper
//!
//! Lists the apps of one Galaxy Store content category, resolves a download
//! link for each, and saves every package together with a manifest of names
//! and versions.
//!
//! # Flow
//!
//! A run is strictly sequential:
//! - Fetch the category catalog (failure here aborts the run)
//! - For each listed app, in order: resolve, download, save, record
//! - Per-app failures are logged and skipped
//!
//! # Modules
//!
//! - `adapters`: HTTP client with retry, Galaxy Store endpoints
//! - `catalog`: XML extraction for catalog and stub responses
//! - `config`: Configuration loading and output layout
//! - `core`: Dump pipeline and manifest
//! - `domain`: Data structures (DeviceProfile, ResolvedItem, ItemOutcome)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Dump the category for a device
//! storedump dump -d SM-S918B -s 34 -o 14 -c EUX -v 6.0
//!
//! # Only list what the category contains
//! storedump list -d SM-S918B -s 34 -o 14 -c EUX -v 6.0
//! ```

pub mod adapters;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{GalaxyStoreClient, HttpClient, RetryPolicy, StoreError, SystemId};
pub use catalog::Catalog;
pub use config::{OutputLayout, ResolvedConfig};
pub use core::{Dumper, Manifest};
pub use domain::{AppId, DeviceProfile, FailureStage, ItemOutcome, ResolvedItem, RunReport};
