//! `genai-flows` — typed client and flow adapters for the hosted
//! generation API.
//!
//! Every AI feature on the platform goes through the same pipeline:
//!
//! ```text
//! FlowInput (typed, validated)
//!     │
//!     ▼
//! prompt template   ← fixed natural-language template per flow
//!     │
//!     ▼
//! GenClient         ← POST models/{model}:generateContent, JSON-constrained
//!     │
//!     ▼
//! FlowOutput (typed) ← decoded against the flow's output schema, or a
//!                      distinct error: safety block, empty response,
//!                      invalid JSON, schema mismatch
//! ```
//!
//! There is deliberately no retry policy and no cancellation: a failed call
//! surfaces one generation error, a slow call stays in flight.

pub mod client;
pub mod error;
pub mod flows;
pub mod types;

pub use client::GenClient;
pub use error::GenAiError;
pub use flows::learning_path::{LearningPathInput, LearningPathOutput, RoadmapStep};
pub use flows::predictive_report::{PredictiveReportInput, PredictiveReportOutput};
pub use flows::security_tool::{SecurityToolInput, SecurityToolOutput, ToolType};
pub use flows::task_prioritization::{
    PrioritizeTasksInput, PrioritizeTasksOutput, PrioritizedTask, TaskSummary,
};
pub use types::{HarmBlockThreshold, HarmCategory, SafetySetting};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GenAiError>;
