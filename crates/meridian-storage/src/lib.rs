//! meridian-storage - Document store implementations for meridian.
//!
//! # Supported Stores
//!
//! - **GcsStore** - Google Cloud Storage, over the public JSON-less object
//!   endpoint, with optional OAuth bearer token.
//! - **MemoryStore** - In-memory fixture store for tests and offline runs.
//!
//! # Example
//!
//! ```ignore
//! use meridian_core::{Locator, StorageConfig};
//! use meridian_storage::GcsStore;
//!
//! let store = GcsStore::new(StorageConfig::default())?;
//! let locator = Locator::parse("gs://noon-reports/2025/noon.eml")?;
//! let raw = store.fetch_text(&locator).await?;
//! ```

mod gcs;
mod memory;

pub use gcs::GcsStore;
pub use memory::MemoryStore;
