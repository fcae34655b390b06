//! Resolves a storage URI to a citation record.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AnswerError, Result};
use crate::storage::{ObjectStore, StorageUri};
use crate::types::{CitationBody, CitationRecord};

/// Outcome of resolving one storage URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(CitationRecord),
    /// The object is not a readable citation and is left out of the list.
    Skipped,
}

/// Fetches citation objects and reads `(Topic, Url)` from them.
#[derive(Clone)]
pub struct CitationResolver {
    store: Arc<dyn ObjectStore>,
}

impl CitationResolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch and decode the object behind `uri`.
    ///
    /// Objects that are not UTF-8, not JSON, or lack `Url`/`Topic` resolve to
    /// [`Resolution::Skipped`]. Invalid URIs and fetch failures are errors.
    pub async fn resolve(&self, uri: &str) -> Result<Resolution> {
        let location = StorageUri::parse(uri)?;
        let body = self
            .store
            .get_object(&location.bucket, &location.key)
            .await?;

        match decode_record(uri, body) {
            Ok(record) => {
                debug!(uri, title = %record.title, "resolved citation");
                Ok(Resolution::Resolved(record))
            }
            Err(e) if e.is_per_record() => {
                warn!(uri, error = %e, "skipping citation object");
                Ok(Resolution::Skipped)
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for CitationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationResolver")
            .field("store", &"..")
            .finish()
    }
}

/// Decode a citation object's bytes.
pub fn decode_record(key: &str, bytes: Vec<u8>) -> Result<CitationRecord> {
    let text = String::from_utf8(bytes)
        .map_err(|e| AnswerError::Decode(format!("{key} is not UTF-8: {e}")))?;
    let body: CitationBody =
        serde_json::from_str(&text).map_err(|e| AnswerError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(body.into())
}
