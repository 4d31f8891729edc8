//! Key-value settings store seam.
//!
//! The extension persists its settings in a host-provided store. The core only
//! depends on [`Store`]; [`memory::MemoryStore`] and [`file::FileStore`] are the
//! adapters shipped with the crate.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::CoreResult;

pub use file::FileStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the stored values for `keys`. Keys without a value are absent
    /// from the returned map.
    async fn get(&self, keys: &[&str]) -> CoreResult<Map<String, Value>>;
    /// Merges `values` into the store. Last write wins per key.
    async fn set(&self, values: Map<String, Value>) -> CoreResult<()>;
}

pub type SharedStore = Arc<dyn Store>;
