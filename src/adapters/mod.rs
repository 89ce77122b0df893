//! Adapters for external systems.
//!
//! - `http`: the shared GET client and its retry policy
//! - `galaxy_store`: the vendor catalog, stub and download endpoints

pub mod galaxy_store;
pub mod http;

pub use galaxy_store::{GalaxyStoreClient, StoreError, SystemId};
pub use http::{HttpClient, RetryPolicy};
