//! Query -> (answer, source) orchestration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::citation::{CitationListBuilder, CitationResolver};
use crate::config::AnswerConfig;
use crate::error::Result;
use crate::extract::interpret;
use crate::runtime::{http::build_client, AgentRuntime, HttpAgentRuntime, InvokeRequest};
use crate::storage::{HttpObjectStore, ObjectStore};
use crate::types::{AnswerResponse, Provenance};

/// Runs one query through the agent and renders its sources.
///
/// Holds only shared, read-only client handles; one instance serves every
/// request.
#[derive(Clone)]
pub struct Pipeline {
    runtime: Arc<dyn AgentRuntime>,
    citations: CitationListBuilder,
    agent_id: String,
    agent_alias_id: String,
}

impl Pipeline {
    pub fn new(
        config: &AnswerConfig,
        runtime: Arc<dyn AgentRuntime>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let citations = CitationListBuilder::new(CitationResolver::new(store))
            .with_concurrency(config.fetch_concurrency);
        Self {
            runtime,
            citations,
            agent_id: config.agent_id.clone(),
            agent_alias_id: config.agent_alias_id.clone(),
        }
    }

    /// Build a pipeline backed by the HTTP runtime and object store.
    pub fn from_config(config: &AnswerConfig) -> Result<Self> {
        let client = build_client(config.request_timeout)?;
        let runtime = HttpAgentRuntime::with_client(&config.runtime_endpoint, client.clone());
        let store = HttpObjectStore::with_client(&config.storage_endpoint, client);
        Ok(Self::new(config, Arc::new(runtime), Arc::new(store)))
    }

    /// Answer `query` within `session_id`.
    pub async fn handle(&self, query: &str, session_id: &str) -> Result<AnswerResponse> {
        info!(query, session_id, "user input");
        let request = InvokeRequest::builder()
            .agent_id(self.agent_id.as_str())
            .agent_alias_id(self.agent_alias_id.as_str())
            .session_id(session_id)
            .input_text(query)
            .build();

        let response = self.runtime.invoke(&request).await?;
        let interpretation = interpret(response).await?;

        let provenance = interpretation.provenance().unwrap_or_else(|e| {
            warn!(error = %e, "error extracting source list from knowledge base");
            Provenance::None
        });

        let source = match provenance {
            Provenance::GeneratedQuery(query) => query,
            Provenance::RetrievedReferences(uris) => self.citations.build(&uris).await?,
            Provenance::None => String::new(),
        };
        debug!(source = %source, "reference string");

        Ok(AnswerResponse {
            answer: interpretation.answer,
            source,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("agent_id", &self.agent_id)
            .field("agent_alias_id", &self.agent_alias_id)
            .field("citations", &self.citations)
            .finish()
    }
}
