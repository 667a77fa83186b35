use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use genai_flows::flows::security_tool;
use genai_flows::SecurityToolInput;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/toolkit/generate — generate testing material for authorized
/// security work. The flow ships its own per-category safety thresholds.
pub async fn generate(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SecurityToolInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let client = super::gen_client(&app.config)?;
    let output = security_tool::run(&client, &input).await?;
    Ok(Json(serde_json::to_value(&output)?))
}
