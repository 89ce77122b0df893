//! Core dump logic.
//!
//! This module contains:
//! - Dumper: The sequential catalog -> resolve -> download pipeline
//! - Manifest: The per-run list of saved names and versions

pub mod dumper;
pub mod manifest;

// Re-export commonly used types
pub use dumper::Dumper;
pub use manifest::{Manifest, MANIFEST_HEADER};
