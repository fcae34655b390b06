//! Interprets the agent's completion stream.
//!
//! The stream is consumed once, front to back. Answer text and trace records
//! are collected during that pass; provenance is classified afterwards from
//! the collected traces.

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::error::{AnswerError, Result};
use crate::runtime::AgentResponse;
use crate::types::{Provenance, TraceEvent, TracePart};

use super::sql::extract_sql_query;

/// Prefix of the answer reported when a response has no completion stream.
pub const NO_COMPLETION_PREFIX: &str = "No completion found in response";

/// Result of consuming one completion stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Text of the last chunk observed (empty if there was none).
    pub answer: String,
    /// Trace records in stream order.
    pub traces: Vec<TracePart>,
}

impl Interpretation {
    /// Classify where the answer came from.
    ///
    /// A generated query wins over knowledge-base references. An error means
    /// a knowledge-base observation could not be read.
    pub fn provenance(&self) -> Result<Provenance> {
        classify(&self.traces)
    }
}

/// Drain an agent response into answer text and trace records.
pub async fn interpret(response: AgentResponse) -> Result<Interpretation> {
    let Some(mut completion) = response.completion else {
        return Ok(Interpretation {
            answer: format!("{NO_COMPLETION_PREFIX}: {}", response.metadata),
            traces: Vec::new(),
        });
    };

    let mut interpretation = Interpretation::default();
    while let Some(event) = completion.next().await {
        let event = event?;
        debug!(kind = event.kind(), "completion event");
        match event {
            TraceEvent::Chunk { bytes } => {
                interpretation.answer = String::from_utf8(bytes)
                    .map_err(|e| AnswerError::Decode(format!("chunk is not UTF-8: {e}")))?;
                debug!(text = %interpretation.answer, "response from the agent");
            }
            TraceEvent::Trace(part) => interpretation.traces.push(part),
            TraceEvent::Other(_) => {}
        }
    }
    Ok(interpretation)
}

/// Classify the provenance of a set of trace records.
pub fn classify(traces: &[TracePart]) -> Result<Provenance> {
    if let Some(query) = generated_query(traces) {
        info!(provenance = "GeneratedQuery", "classified trace provenance");
        return Ok(Provenance::GeneratedQuery(query));
    }

    let provenance = match knowledge_base_references(traces)? {
        Some(uris) => Provenance::RetrievedReferences(uris),
        None => Provenance::None,
    };
    info!(provenance = provenance.as_ref(), "classified trace provenance");
    Ok(provenance)
}

/// The query extracted from the last action-group observation that has one.
fn generated_query(traces: &[TracePart]) -> Option<String> {
    traces
        .iter()
        .filter_map(|part| match part.observation() {
            Ok(observation) => observation,
            Err(e) => {
                warn!(error = %e, "skipping unreadable observation");
                None
            }
        })
        .filter_map(|obs| obs.action_group_text().and_then(extract_sql_query))
        .last()
}

/// Storage URIs of every knowledge-base reference, in stream order.
///
/// `Ok(None)` when no trace carries a knowledge-base lookup.
fn knowledge_base_references(traces: &[TracePart]) -> Result<Option<Vec<String>>> {
    let mut uris: Option<Vec<String>> = None;
    for part in traces {
        let Some(observation) = part.observation()? else {
            continue;
        };
        let Some(lookup) = observation.knowledge_base_lookup()? else {
            continue;
        };
        debug!(count = lookup.retrieved_references.len(), "knowledge base references");
        uris.get_or_insert_with(Vec::new).extend(
            lookup
                .retrieved_references
                .into_iter()
                .map(|r| r.location.s3_location.uri),
        );
    }
    Ok(uris)
}
