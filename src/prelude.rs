//! Convenience re-exports for common use.

pub use crate::citation::{CitationListBuilder, CitationResolver, ReferenceList, Resolution};
pub use crate::config::AnswerConfig;
pub use crate::error::{AnswerError, Result};
pub use crate::extract::{extract_sql_query, interpret, Interpretation};
pub use crate::pipeline::Pipeline;
pub use crate::runtime::{AgentResponse, AgentRuntime, InvokeRequest};
pub use crate::storage::{ObjectStore, StorageUri};
pub use crate::types::{AnswerRequest, AnswerResponse, CitationRecord, Provenance, TraceEvent};
