//! Shared test helpers: scripted runtime and in-memory object store.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use agent_answer::config::{AnswerConfig, ConfigLayer};
use agent_answer::error::{AnswerError, Result};
use agent_answer::runtime::{AgentResponse, AgentRuntime, InvokeRequest};
use agent_answer::storage::ObjectStore;
use agent_answer::types::TraceEvent;

/// A runtime that replays queued event scripts and records requests.
#[derive(Default)]
pub struct MockRuntime {
    scripts: Mutex<Vec<Option<Vec<TraceEvent>>>>,
    requests: Mutex<Vec<InvokeRequest>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a streamed response.
    pub fn queue_events(&self, events: Vec<TraceEvent>) {
        self.scripts.lock().unwrap().push(Some(events));
    }

    /// Queue a response that carries no completion stream.
    pub fn queue_without_completion(&self) {
        self.scripts.lock().unwrap().push(None);
    }

    pub fn requests(&self) -> Vec<InvokeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for MockRuntime {
    async fn invoke(&self, request: &InvokeRequest) -> Result<AgentResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let script = {
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.is_empty() {
                return Err(AnswerError::Stream("no scripted response".into()));
            }
            scripts.remove(0)
        };

        match script {
            Some(events) => {
                let stream = async_stream::stream! {
                    for event in events {
                        yield Ok(event);
                    }
                };
                Ok(AgentResponse::streaming(Box::pin(stream)))
            }
            None => Ok(AgentResponse::without_completion(
                json!({"contentType": "application/json", "sessionId": "mock"}),
            )),
        }
    }
}

/// In-memory object store keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    delays: Mutex<HashMap<(String, String), Duration>>,
    fetches: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), bytes.into());
    }

    /// Store a citation object with the given topic and URL.
    pub fn put_citation(&self, bucket: &str, key: &str, topic: &str, url: &str) {
        self.put(bucket, key, json!({"Topic": topic, "Url": url}).to_string());
    }

    /// Delay reads of one object.
    pub fn delay(&self, bucket: &str, key: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), delay);
    }

    /// Keys fetched so far, in call order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let id = (bucket.to_string(), key.to_string());
        self.fetches.lock().unwrap().push(key.to_string());

        let delay = self.delays.lock().unwrap().get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let object = self.objects.lock().unwrap().get(&id).cloned();
        object.ok_or_else(|| AnswerError::api(404, format!("NoSuchKey: {bucket}/{key}")))
    }
}

/// Config pointing at the given endpoints.
pub fn test_config(runtime_endpoint: &str, storage_endpoint: &str) -> AnswerConfig {
    AnswerConfig::from_layer(ConfigLayer {
        agent_id: Some("AGENT1".into()),
        agent_alias_id: Some("ALIAS1".into()),
        region_name: Some("us-east-1".into()),
        agent_runtime_endpoint: Some(runtime_endpoint.into()),
        storage_endpoint: Some(storage_endpoint.into()),
        citation_fetch_concurrency: Some(4),
        request_timeout_secs: Some(5),
    })
    .unwrap()
}

/// An `ACTION_GROUP` observation trace.
pub fn action_group(text: &str) -> TraceEvent {
    TraceEvent::trace(json!({"orchestrationTrace": {"observation": {
        "type": "ACTION_GROUP",
        "actionGroupInvocationOutput": {"text": text}
    }}}))
}

/// A knowledge-base lookup observation trace.
pub fn kb_lookup(uris: &[&str]) -> TraceEvent {
    let refs: Vec<_> = uris
        .iter()
        .map(|uri| {
            json!({
                "content": {"text": "..."},
                "location": {"type": "S3", "s3Location": {"uri": uri}}
            })
        })
        .collect();
    TraceEvent::trace(json!({"orchestrationTrace": {"observation": {
        "type": "KNOWLEDGE_BASE",
        "knowledgeBaseLookupOutput": {"retrievedReferences": refs}
    }}}))
}

/// A rationale trace with no observation.
pub fn rationale(text: &str) -> TraceEvent {
    TraceEvent::trace(json!({"orchestrationTrace": {"rationale": {"text": text}}}))
}
