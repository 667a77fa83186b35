use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::types::Role;
use cyberstack_core::user;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

/// GET /api/users — admin only.
pub async fn list_users(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let users = user::list_users(&app.store)?;
    Ok(Json(serde_json::to_value(&users)?))
}

/// PUT /api/users/{id}/role — admin only.
pub async fn set_role(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RoleBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let uid = id.clone();
    tokio::task::spawn_blocking(move || user::set_role(&store, &id, body.role))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": uid, "role": body.role })))
}

/// DELETE /api/users/{id} — admin only. Removes the store record but not
/// the identity credential; the configured primary admin is protected.
pub async fn delete_user(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let config = app.config.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || user::delete_user(&store, &config, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": deleted, "deleted": true })))
}
