//! Path-style HTTP object store.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AnswerError, Result};
use crate::runtime::http::{shared_client, status_to_error};

use super::ObjectStore;

/// Fetches objects with `GET {endpoint}/{bucket}/{key}`.
///
/// Bucket and key segments are percent-encoded, so keys may contain
/// spaces, `#` or `?`. Slashes in the key stay path separators.
pub struct HttpObjectStore {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, shared_client().clone())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| AnswerError::Configuration(format!("storage endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AnswerError::Configuration("storage endpoint cannot be a base".into()))?
            .pop_if_empty()
            .push(bucket)
            .extend(key.split('/'));
        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(bucket, key)?;
        debug!(bucket, key, "fetching object");

        let resp = self.client.get(url).send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_encodes_key_segments() {
        let store = HttpObjectStore::new("http://localhost:9000/");
        let url = store.object_url("docs", "faq/q#1 what?.json").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/docs/faq/q%231%20what%3F.json"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn object_url_keeps_endpoint_prefix() {
        let store = HttpObjectStore::new("http://gateway.local/storage");
        let url = store.object_url("docs", "kb/a.json").unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/storage/docs/kb/a.json");
    }

    #[test]
    fn invalid_endpoint_is_configuration_error() {
        let store = HttpObjectStore::new("not a url");
        assert!(matches!(
            store.object_url("docs", "a.json"),
            Err(AnswerError::Configuration(_))
        ));
    }
}
