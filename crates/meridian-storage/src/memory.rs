//! In-memory document store for tests and offline runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use meridian_core::error::{MeridianError, MeridianResult};
use meridian_core::traits::{DocumentStore, Locator};

/// In-memory document store.
///
/// Objects live in a map keyed by `bucket/object`; every fetch is counted so
/// tests can assert the pipeline's short-circuit behavior.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fetches: Mutex<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object under `bucket/object`.
    pub fn insert(&self, bucket: &str, object: &str, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(Self::key(bucket, object), content.into());
    }

    /// Add an object, builder style.
    pub fn with_object(self, bucket: &str, object: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(bucket, object, content);
        self
    }

    /// Number of fetches served so far, hits and misses both.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    fn key(bucket: &str, object: &str) -> String {
        format!("{}/{}", bucket, object)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_text(&self, locator: &Locator) -> MeridianResult<String> {
        let bytes = self.fetch_bytes(locator).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_bytes(&self, locator: &Locator) -> MeridianResult<Vec<u8>> {
        *self.fetches.lock().unwrap() += 1;
        self.objects
            .lock()
            .unwrap()
            .get(&Self::key(&locator.bucket, &locator.object))
            .cloned()
            .ok_or_else(|| MeridianError::document_not_found(&locator.object))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
