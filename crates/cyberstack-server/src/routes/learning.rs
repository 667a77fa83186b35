use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::learning::{self, CertificationDraft};
use genai_flows::flows::learning_path;
use genai_flows::LearningPathInput;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/learning/certifications — the caller's tracked certifications.
pub async fn list_certifications(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let certs = learning::list_certifications(&app.store, &uid)?;
    Ok(Json(serde_json::to_value(&certs)?))
}

/// POST /api/learning/certifications
pub async fn add_certification(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<CertificationDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let cert = tokio::task::spawn_blocking(move || {
        learning::add_certification(&store, &uid, draft)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&cert)?))
}

/// PUT /api/learning/certifications/{id}
pub async fn update_certification(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<CertificationDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let cert = tokio::task::spawn_blocking(move || {
        learning::update_certification(&store, &uid, &id, draft)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&cert)?))
}

/// DELETE /api/learning/certifications/{id}
pub async fn delete_certification(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || learning::delete_certification(&store, &uid, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": deleted, "deleted": true })))
}

/// POST /api/learning/path — run the learning-path flow and persist the
/// output verbatim as the caller's current path.
pub async fn generate_path(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LearningPathInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let client = super::gen_client(&app.config)?;
    let output = learning_path::run(&client, &input).await?;

    let value = serde_json::to_value(&output)?;
    let store = app.store.clone();
    let persisted = value.clone();
    tokio::task::spawn_blocking(move || learning::save_learning_path(&store, &uid, &persisted))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(value))
}

/// GET /api/learning/path — the last generated path, if any.
pub async fn get_path(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let path = learning::load_learning_path(&app.store, &uid)?;
    Ok(Json(path.unwrap_or(serde_json::Value::Null)))
}
