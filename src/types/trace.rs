//! Streamed agent events and the trace metadata carried inside them.

use base64::Engine;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{AnswerError, Result};

/// One event of the agent's completion stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Answer text bytes.
    Chunk { bytes: Vec<u8> },
    /// Execution metadata for one agent step.
    Trace(TracePart),
    /// Anything else the stream carries (return-control, errors, ...).
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct WireChunk {
    #[serde(default)]
    bytes: String,
}

impl TraceEvent {
    /// Create a chunk event from text.
    pub fn chunk(text: impl Into<String>) -> Self {
        Self::Chunk {
            bytes: text.into().into_bytes(),
        }
    }

    /// Create a trace event wrapping the given `trace` tree.
    pub fn trace(trace: serde_json::Value) -> Self {
        Self::Trace(TracePart {
            trace,
            ..Default::default()
        })
    }

    /// Parse a JSON-encoded stream event.
    ///
    /// Chunk payloads are base64 encoded on the wire.
    pub fn from_wire(value: serde_json::Value) -> Result<Self> {
        if let Some(chunk) = value.get("chunk") {
            let chunk: WireChunk = serde_json::from_value(chunk.clone())?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(chunk.bytes.as_bytes())
                .map_err(|e| AnswerError::Decode(format!("chunk bytes: {e}")))?;
            return Ok(Self::Chunk { bytes });
        }
        if let Some(trace) = value.get("trace") {
            let part: TracePart = serde_json::from_value(trace.clone())?;
            return Ok(Self::Trace(part));
        }
        Ok(Self::Other(value))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::Trace(_) => "trace",
            Self::Other(_) => "other",
        }
    }
}

/// The `trace` member of a trace event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_alias_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Loosely-typed trace tree (`orchestrationTrace`, `preProcessingTrace`, ...).
    #[serde(default)]
    pub trace: serde_json::Value,
}

impl TracePart {
    /// The orchestration step's observation, if this trace has one.
    ///
    /// Returns `Ok(None)` for traces of any other shape.
    pub fn observation(&self) -> Result<Option<Observation>> {
        let Some(raw) = self
            .trace
            .get("orchestrationTrace")
            .and_then(|o| o.get("observation"))
        else {
            return Ok(None);
        };
        serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| AnswerError::MalformedTrace(format!("observation: {e}")))
    }
}

/// What an orchestration step observed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(rename = "type", default)]
    pub kind: Option<ObservationType>,
    #[serde(default)]
    pub action_group_invocation_output: Option<ActionGroupInvocationOutput>,
    /// Kept loose here; parsed on demand by [`Observation::knowledge_base_lookup`].
    #[serde(default)]
    pub knowledge_base_lookup_output: Option<serde_json::Value>,
}

impl Observation {
    /// Output text of an `ACTION_GROUP` observation.
    pub fn action_group_text(&self) -> Option<&str> {
        if self.kind != Some(ObservationType::ActionGroup) {
            return None;
        }
        self.action_group_invocation_output
            .as_ref()
            .and_then(|o| o.text.as_deref())
    }

    /// Parsed knowledge-base lookup output, if present.
    pub fn knowledge_base_lookup(&self) -> Result<Option<KnowledgeBaseLookupOutput>> {
        match &self.knowledge_base_lookup_output {
            Some(raw) => serde_json::from_value(raw.clone())
                .map(Some)
                .map_err(|e| AnswerError::MalformedTrace(format!("knowledgeBaseLookupOutput: {e}"))),
            None => Ok(None),
        }
    }
}

/// Observation type reported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ObservationType {
    ActionGroup,
    AgentCollaborator,
    KnowledgeBase,
    Finish,
    AskUser,
    Reprompt,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionGroupInvocationOutput {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseLookupOutput {
    pub retrieved_references: Vec<RetrievedReference>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedReference {
    pub location: ReferenceLocation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLocation {
    pub s3_location: S3Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct S3Location {
    pub uri: String,
}

/// Where the answer's grounding came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsRefStr)]
pub enum Provenance {
    /// A data query the agent generated through an action group.
    GeneratedQuery(String),
    /// Storage URIs of knowledge-base documents, in stream order.
    RetrievedReferences(Vec<String>),
    #[default]
    None,
}
