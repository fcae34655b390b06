//! Citation records and the request/response bodies of the service.

use serde::{Deserialize, Serialize};

/// A resolved source document. Identity is the `(title, link)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CitationRecord {
    pub title: String,
    pub link: String,
}

impl CitationRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// JSON body of a stored citation object.
#[derive(Debug, Clone, Deserialize)]
pub struct CitationBody {
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "Topic")]
    pub topic: String,
}

impl From<CitationBody> for CitationRecord {
    fn from(body: CitationBody) -> Self {
        Self {
            title: body.topic,
            link: body.url,
        }
    }
}

/// Incoming request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
    pub session_id: String,
}

/// Outgoing response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    /// Generated query text or rendered reference list (possibly empty).
    pub source: String,
}
