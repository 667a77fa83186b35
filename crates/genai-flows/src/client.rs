use crate::error::{GenAiError, Result};
use crate::types::{
    ApiErrorEnvelope, FinishReason, GenerateContentRequest, GenerateContentResponse, SafetySetting,
};
use serde_json::Value;

// ---------------------------------------------------------------------------
// GenClient
//
// Thin HTTP client for the hosted generation API. One call shape: send a
// rendered prompt, receive JSON text, hand back the parsed value. No retry
// policy and no client-side timeout — a slow call stays in flight until the
// server answers or the connection drops.
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct GenClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GenClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client reading the API key from the named environment
    /// variable.
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_env: &str,
    ) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| GenAiError::MissingApiKey(api_key_env.to_string()))?;
        Ok(Self::new(base_url, model, api_key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` and return the model's output parsed as JSON.
    ///
    /// Failure taxonomy: transport errors, non-2xx API errors, safety-filter
    /// blocks (prompt-level or candidate-level), empty responses, and output
    /// that is not valid JSON. Schema validation against a flow's output
    /// type happens in the flow adapter, not here.
    pub async fn generate_json(&self, prompt: &str, safety: &[SafetySetting]) -> Result<Value> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let request = GenerateContentRequest::from_prompt(prompt, safety);

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "generation request");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&raw) {
                Ok(envelope) => envelope.error.message,
                Err(_) => raw,
            };
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;

        if let Some(reason) = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(GenAiError::SafetyBlocked(reason));
        }
        let Some(candidate) = body.candidates.first() else {
            return Err(GenAiError::EmptyResponse);
        };
        if candidate.finish_reason == Some(FinishReason::Safety) {
            return Err(GenAiError::SafetyBlocked("candidate withheld".to_string()));
        }

        let text = body.first_text().ok_or(GenAiError::EmptyResponse)?;
        serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| GenAiError::InvalidJson(e.to_string()))
    }
}

/// Models sometimes wrap JSON output in a Markdown code fence even when a
/// JSON mime type was requested.
fn strip_code_fences(text: &str) -> &str {
    let t = text.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    t.strip_suffix("```").unwrap_or(t).trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
