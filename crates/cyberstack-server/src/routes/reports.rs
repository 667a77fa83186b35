use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use genai_flows::flows::predictive_report;
use genai_flows::PredictiveReportInput;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/reports/generate — run the predictive-report flow. Reports
/// are ephemeral: returned to the caller, never stored.
pub async fn generate(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PredictiveReportInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let client = super::gen_client(&app.config)?;
    let report = predictive_report::run(&client, &input).await?;
    Ok(Json(serde_json::to_value(&report)?))
}
