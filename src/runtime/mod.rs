//! Upstream agent runtime: the streaming invoke call.

pub mod gateway;
pub mod http;

use async_trait::async_trait;
use bon::Builder;
use futures::stream::BoxStream;
use serde::Serialize;

use crate::error::Result;
use crate::types::TraceEvent;

pub use gateway::HttpAgentRuntime;

/// Stream of completion events produced by one invocation.
pub type CompletionStream = BoxStream<'static, Result<TraceEvent>>;

/// Parameters of one agent invocation.
#[derive(Debug, Clone, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    #[serde(skip)]
    #[builder(into)]
    pub agent_id: String,
    #[serde(skip)]
    #[builder(into)]
    pub agent_alias_id: String,
    #[serde(skip)]
    #[builder(into)]
    pub session_id: String,
    #[builder(into)]
    pub input_text: String,
    #[builder(default = true)]
    pub enable_trace: bool,
}

/// What the runtime returned for an invocation.
pub struct AgentResponse {
    /// The event stream; `None` when the response carried no completion.
    pub completion: Option<CompletionStream>,
    /// Response metadata (or the whole body when there is no completion).
    pub metadata: serde_json::Value,
}

impl AgentResponse {
    /// A response wrapping an event stream.
    pub fn streaming(completion: CompletionStream) -> Self {
        Self {
            completion: Some(completion),
            metadata: serde_json::Value::Null,
        }
    }

    /// A response without a completion stream.
    pub fn without_completion(metadata: serde_json::Value) -> Self {
        Self {
            completion: None,
            metadata,
        }
    }
}

impl std::fmt::Debug for AgentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentResponse")
            .field("completion", &self.completion.as_ref().map(|_| ".."))
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// A hosted agent that answers a query with a stream of events.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Invoke the agent. The returned stream is consumed exactly once.
    async fn invoke(&self, request: &InvokeRequest) -> Result<AgentResponse>;
}
