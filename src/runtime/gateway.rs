//! HTTP agent runtime speaking the invoke-agent REST shape.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::error::{AnswerError, Result};
use crate::types::TraceEvent;

use super::http::{parse_sse_data, shared_client, status_to_error, LineBuffer};
use super::{AgentResponse, AgentRuntime, InvokeRequest};

/// Posts to `{endpoint}/agents/{id}/agentAliases/{alias}/sessions/{session}/text`
/// and reads the completion as server-sent events.
pub struct HttpAgentRuntime {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAgentRuntime {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, shared_client().clone())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    fn invoke_url(&self, request: &InvokeRequest) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| AnswerError::Configuration(format!("runtime endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AnswerError::Configuration("runtime endpoint cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                "agents",
                request.agent_id.as_str(),
                "agentAliases",
                request.agent_alias_id.as_str(),
                "sessions",
                request.session_id.as_str(),
                "text",
            ]);
        Ok(url)
    }
}

fn parse_event_line(line: &str) -> Option<Result<TraceEvent>> {
    let data = parse_sse_data(line)?;
    match serde_json::from_str::<serde_json::Value>(data) {
        Ok(value) => Some(TraceEvent::from_wire(value)),
        Err(e) => {
            warn!(error = %e, "skipping unparseable event");
            None
        }
    }
}

#[async_trait]
impl AgentRuntime for HttpAgentRuntime {
    async fn invoke(&self, request: &InvokeRequest) -> Result<AgentResponse> {
        let url = self.invoke_url(request)?;
        debug!(
            agent_id = %request.agent_id,
            agent_alias_id = %request.agent_alias_id,
            session_id = %request.session_id,
            "invoking agent"
        );

        let resp = self.client.post(url).json(request).send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let is_event_stream = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));

        if !is_event_stream {
            let body_text = resp.text().await?;
            let metadata = serde_json::from_str(&body_text)
                .unwrap_or(serde_json::Value::String(body_text));
            return Ok(AgentResponse::without_completion(metadata));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut lines = LineBuffer::default();
            let mut failed = false;
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(AnswerError::Network(e));
                        failed = true;
                        break;
                    }
                };

                for line in lines.push(&chunk) {
                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }
                    if let Some(event) = parse_event_line(&line) {
                        yield event;
                    }
                }
            }

            if !failed {
                if let Some(event) = lines.finish().as_deref().and_then(parse_event_line) {
                    yield event;
                }
            }
        };

        Ok(AgentResponse::streaming(Box::pin(stream)))
    }
}
