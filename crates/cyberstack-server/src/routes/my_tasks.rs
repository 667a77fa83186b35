use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::{access, user_tasks, CoreError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AddTaskBody {
    pub text: String,
}

#[derive(serde::Deserialize)]
pub struct EditTaskBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(serde::Deserialize)]
pub struct EfficiencyBody {
    pub value: u32,
}

fn view(app: &AppState, uid: &str) -> Result<serde_json::Value, AppError> {
    Ok(serde_json::json!({
        "tasks": user_tasks::tasks(&app.store, uid)?,
        "performance": user_tasks::performance(&app.store, uid)?,
    }))
}

/// GET /api/my-tasks — the caller's personal list, seeded on first visit.
pub async fn my_view(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let seed_uid = uid.clone();
    tokio::task::spawn_blocking(move || user_tasks::ensure_seeded(&store, &seed_uid))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(view(&app, &uid)?))
}

/// GET /api/my-tasks/{uid} — another user's list; self or admin only.
pub async fn user_view(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(target): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    if uid != target && !access::is_admin(&app.store, &uid) {
        return Err(AppError(CoreError::Forbidden.into()));
    }
    Ok(Json(view(&app, &target)?))
}

/// POST /api/my-tasks — add a to-do item.
pub async fn add_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let task = tokio::task::spawn_blocking(move || user_tasks::add_task(&store, &uid, &body.text))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&task)?))
}

/// PUT /api/my-tasks/{id} — edit text and/or toggle completion. The
/// completion rate cache is recomputed on the way out.
pub async fn edit_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<EditTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let edited = id.clone();
    tokio::task::spawn_blocking(move || {
        if let Some(text) = &body.text {
            user_tasks::edit_text(&store, &uid, &id, text)?;
        }
        if let Some(completed) = body.completed {
            user_tasks::set_completed(&store, &uid, &id, completed)?;
        }
        Ok::<_, CoreError>(())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": edited, "ok": true })))
}

/// DELETE /api/my-tasks/{id}
pub async fn delete_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || user_tasks::delete_task(&store, &uid, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": deleted, "deleted": true })))
}

/// PUT /api/my-tasks/efficiency — hand-edited metric, 0–100.
pub async fn set_efficiency(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EfficiencyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    let store = app.store.clone();
    let perf_uid = uid.clone();
    tokio::task::spawn_blocking(move || user_tasks::set_efficiency(&store, &perf_uid, body.value))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(
        user_tasks::performance(&app.store, &uid)?,
    )?))
}
