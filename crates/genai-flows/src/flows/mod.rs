//! Flow adapters: one module per generation feature. Every adapter has the
//! same shape — validate the typed input, render it into a fixed prompt
//! template, invoke the client constrained to JSON output, and decode the
//! result against the flow's output type.

pub mod learning_path;
pub mod predictive_report;
pub mod security_tool;
pub mod task_prioritization;

use crate::error::{GenAiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a generation result into a flow's output type; a mismatch is the
/// flow-level schema error, not a JSON error.
pub(crate) fn decode<T: DeserializeOwned>(flow: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GenAiError::SchemaMismatch {
        flow,
        reason: e.to_string(),
    })
}

/// Required-field check for flow inputs.
pub(crate) fn require(flow: &'static str, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GenAiError::InvalidInput {
            flow,
            reason: format!("{field} is required"),
        });
    }
    Ok(())
}
