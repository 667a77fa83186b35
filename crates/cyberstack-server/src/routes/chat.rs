use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::{chat, user, CoreError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct MessageBody {
    pub text: String,
}

/// GET /api/chat/channels — channels visible to the caller. Anonymous
/// callers see only the public channel. Missing fixed channels are merged
/// in first, mirroring first-visit seeding.
pub async fn list_channels(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let viewer = app.current_uid(&headers);

    let store = app.store.clone();
    tokio::task::spawn_blocking(move || chat::ensure_default_channels(&store))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let channels = chat::visible_channels(&app.store, viewer.as_deref())?;
    Ok(Json(serde_json::to_value(&channels)?))
}

/// GET /api/chat/messages/{channel} — requires sign-in and channel
/// visibility.
pub async fn list_messages(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(channel): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    require_visible(&app, &uid, &channel)?;
    let messages = chat::messages(&app.store, &channel)?;
    Ok(Json(serde_json::to_value(&messages)?))
}

/// POST /api/chat/messages/{channel} — append-only; messages are never
/// edited or deleted.
pub async fn post_message(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(channel): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let uid = app.require_uid(&headers)?;
    require_visible(&app, &uid, &channel)?;
    let author = user::get_user(&app.store, &uid)?;

    let store = app.store.clone();
    let message =
        tokio::task::spawn_blocking(move || chat::post_message(&store, &channel, &author, &body.text))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&message)?))
}

/// A channel the viewer cannot see behaves like one they cannot touch.
fn require_visible(app: &AppState, uid: &str, channel: &str) -> Result<(), AppError> {
    let visible = chat::visible_channels(&app.store, Some(uid))?;
    if visible.iter().any(|c| c.id == channel) {
        Ok(())
    } else {
        Err(AppError(CoreError::Forbidden.into()))
    }
}
