//! Document store trait and storage locators.

use async_trait::async_trait;

use crate::error::{MeridianError, MeridianResult};

/// A parsed storage reference: `<scheme>://<bucket>/<object-path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Storage scheme, e.g. `gs`.
    pub scheme: String,
    /// Bucket or container name.
    pub bucket: String,
    /// Object path within the bucket. May contain `/` and spaces.
    pub object: String,
}

impl Locator {
    /// Parse a storage reference into its parts.
    ///
    /// The object path is split off at the first `/` after the bucket, so
    /// nested paths stay intact.
    pub fn parse(reference: &str) -> MeridianResult<Self> {
        let (scheme, rest) = reference.split_once("://").ok_or_else(|| {
            MeridianError::locator(format!("missing '://' in storage reference '{}'", reference))
        })?;
        let (bucket, object) = rest.split_once('/').ok_or_else(|| {
            MeridianError::locator(format!(
                "missing object path in storage reference '{}'",
                reference
            ))
        })?;
        if scheme.is_empty() {
            return Err(MeridianError::locator(format!(
                "empty scheme in storage reference '{}'",
                reference
            )));
        }
        if bucket.is_empty() {
            return Err(MeridianError::locator(format!(
                "empty bucket in storage reference '{}'",
                reference
            )));
        }
        if object.is_empty() {
            return Err(MeridianError::locator(format!(
                "empty object path in storage reference '{}'",
                reference
            )));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.object)
    }
}

/// Document store trait - all storage backends implement this.
///
/// Retrieval only; there is no retry logic at this seam, a transient fetch
/// failure propagates to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch an object as UTF-8 text.
    async fn fetch_text(&self, locator: &Locator) -> MeridianResult<String>;

    /// Fetch an object as raw bytes.
    async fn fetch_bytes(&self, locator: &Locator) -> MeridianResult<Vec<u8>>;

    /// Human-readable name for this store.
    fn name(&self) -> &str;
}
