//! Ordered, deduplicated reference lists.

use std::collections::HashSet;
use std::fmt;

use futures::StreamExt;
use tracing::debug;

use crate::error::Result;
use crate::types::CitationRecord;

use super::resolver::{CitationResolver, Resolution};

/// Citation records in first-seen order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList {
    records: Vec<CitationRecord>,
    seen: HashSet<CitationRecord>,
}

impl ReferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record unless an equal one is already present.
    pub fn insert(&mut self, record: CitationRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CitationRecord> {
        self.records.iter()
    }

    /// Render as `"{n}. [{title}]({link})\n\n"` entries, numbered from 1.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            write!(f, "{}. [{}]({})\n\n", i + 1, record.title, record.link)?;
        }
        Ok(())
    }
}

impl Extend<CitationRecord> for ReferenceList {
    fn extend<I: IntoIterator<Item = CitationRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<CitationRecord> for ReferenceList {
    fn from_iter<I: IntoIterator<Item = CitationRecord>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Resolves storage URIs and renders the resulting reference list.
#[derive(Debug, Clone)]
pub struct CitationListBuilder {
    resolver: CitationResolver,
    concurrency: usize,
}

impl CitationListBuilder {
    pub fn new(resolver: CitationResolver) -> Self {
        Self {
            resolver,
            concurrency: 1,
        }
    }

    /// Allow up to `limit` object fetches in flight. Output order is unaffected.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Resolve every URI, in input order, into a deduplicated list.
    pub async fn collect(&self, uris: &[String]) -> Result<ReferenceList> {
        let mut resolutions = futures::stream::iter(uris)
            .map(|uri| self.resolver.resolve(uri))
            .buffered(self.concurrency);

        let mut list = ReferenceList::new();
        while let Some(resolution) = resolutions.next().await {
            if let Resolution::Resolved(record) = resolution? {
                list.insert(record);
            }
        }
        debug!(requested = uris.len(), unique = list.len(), "built reference list");
        Ok(list)
    }

    /// Resolve and render. An empty URI list renders as an empty string.
    pub async fn build(&self, uris: &[String]) -> Result<String> {
        Ok(self.collect(uris).await?.render())
    }
}
