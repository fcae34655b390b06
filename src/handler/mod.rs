//! Request/response envelope around the pipeline.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AnswerError, Result};
use crate::pipeline::Pipeline;
use crate::types::AnswerRequest;

/// Envelope returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    /// JSON-encoded body.
    pub body: String,
}

/// Parse a JSON request body.
pub fn parse_request(body: &str) -> Result<AnswerRequest> {
    serde_json::from_str(body).map_err(|e| AnswerError::InvalidRequest(e.to_string()))
}

/// Handle one raw request body.
///
/// Pipeline-level degradation is already folded into the answer/source
/// strings; only unrecoverable failures come back as `Err`.
pub async fn handle_body(pipeline: &Pipeline, body: &str) -> Result<HandlerResponse> {
    info!(body, "event");
    let request = parse_request(body)?;
    let output = pipeline
        .handle(&request.query, &request.session_id)
        .await?;
    Ok(HandlerResponse {
        status_code: 200,
        body: serde_json::to_string(&output)?,
    })
}

/// Turn a handler result into an envelope, mapping failures to a server error.
pub fn into_envelope(result: Result<HandlerResponse>) -> HandlerResponse {
    match result {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "request failed");
            HandlerResponse {
                status_code: 500,
                body: serde_json::json!({ "error": e.to_string() }).to_string(),
            }
        }
    }
}
