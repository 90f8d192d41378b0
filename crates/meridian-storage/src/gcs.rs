//! Google Cloud Storage document store.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use meridian_core::error::{ErrorCode, MeridianError, MeridianResult};
use meridian_core::traits::{DocumentStore, Locator};
use meridian_core::StorageConfig;

const GCS_BASE_URL: &str = "https://storage.googleapis.com";
const GCS_SCHEME: &str = "gs";

/// Google Cloud Storage document store.
///
/// Fetches objects with a plain GET of `{base_url}/{bucket}/{object}`. The
/// base URL is overridable for emulators; an optional OAuth bearer token
/// covers private buckets. There is no retry logic.
pub struct GcsStore {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl GcsStore {
    /// Create a new GCS store.
    pub fn new(config: StorageConfig) -> MeridianResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(GCS_BASE_URL);
        let base_url = Url::parse(base_url).map_err(|e| {
            MeridianError::Configuration(format!("Invalid storage base URL '{}': {}", base_url, e))
        })?;

        let client = Client::builder().build().map_err(|e| {
            MeridianError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token,
        })
    }

    /// Build the object URL, percent-encoding each path segment.
    ///
    /// Object names may contain spaces and nested `/` separators; pushing
    /// them as segments keeps both intact on the wire.
    fn object_url(&self, locator: &Locator) -> MeridianResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                MeridianError::Configuration("Storage base URL cannot carry a path".to_string())
            })?;
            segments.push(&locator.bucket);
            for segment in locator.object.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn fetch(&self, locator: &Locator) -> MeridianResult<Vec<u8>> {
        if locator.scheme != GCS_SCHEME {
            return Err(MeridianError::unsupported_scheme(&locator.scheme));
        }
        let url = self.object_url(locator)?;
        debug!(%locator, "fetching object");

        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| MeridianError::Storage {
            message: format!("request for '{}' failed: {}", locator, e),
            code: ErrorCode::StoRequestFailed,
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(MeridianError::document_not_found(&locator.object));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MeridianError::storage(format!(
                "fetch of '{}' failed ({}): {}",
                locator, status, body
            )));
        }

        let bytes = response.bytes().await.map_err(|e| MeridianError::Storage {
            message: format!("reading body of '{}' failed: {}", locator, e),
            code: ErrorCode::StoRequestFailed,
            source: Some(Box::new(e)),
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DocumentStore for GcsStore {
    async fn fetch_text(&self, locator: &Locator) -> MeridianResult<String> {
        let bytes = self.fetch(locator).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_bytes(&self, locator: &Locator) -> MeridianResult<Vec<u8>> {
        self.fetch(locator).await
    }

    fn name(&self) -> &str {
        "gcs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: Option<&str>) -> GcsStore {
        GcsStore::new(StorageConfig {
            base_url: base_url.map(str::to_string),
            access_token: None,
        })
        .unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let store = store(None);
        assert_eq!(store.base_url.as_str(), "https://storage.googleapis.com/");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(GcsStore::new(StorageConfig {
            base_url: Some("not a url".to_string()),
            access_token: None,
        })
        .is_err());
    }

    #[test]
    fn test_object_url_keeps_nested_path() {
        let store = store(None);
        let locator = Locator::parse("gs://noon-reports/year=2025/month=01/noon.eml").unwrap();
        let url = store.object_url(&locator).unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/noon-reports/year=2025/month=01/noon.eml"
        );
    }

    #[test]
    fn test_object_url_encodes_spaces() {
        let store = store(Some("http://localhost:4443"));
        let locator =
            Locator::parse("gs://noon-reports/LIBRA SUN - Daily Noon Report.pdf").unwrap();
        let url = store.object_url(&locator).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4443/noon-reports/LIBRA%20SUN%20-%20Daily%20Noon%20Report.pdf"
        );
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let store = store(None);
        let locator = Locator::parse("s3://noon-reports/noon.eml").unwrap();
        let err = store.fetch_bytes(&locator).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::LocUnsupportedScheme);
    }
}
