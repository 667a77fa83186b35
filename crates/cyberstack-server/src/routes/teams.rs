use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::team::{self, TeamDraft, TeamMember};
use cyberstack_core::types::TeamName;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct TeamBody {
    pub name: TeamName,
    pub description: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl TeamBody {
    fn into_draft(self) -> TeamDraft {
        TeamDraft {
            name: self.name,
            description: self.description,
            capacity: self.capacity,
            members: self.members,
        }
    }
}

#[derive(serde::Deserialize)]
pub struct MemberBody {
    pub user_id: String,
    #[serde(default = "default_member_role")]
    pub role: String,
}

fn default_member_role() -> String {
    "Member".to_string()
}

/// GET /api/teams — visible to any signed-in user.
pub async fn list_teams(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let teams = team::list_teams(&app.store)?;
    Ok(Json(serde_json::to_value(&teams)?))
}

/// POST /api/teams — admin only.
pub async fn create_team(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TeamBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let created = tokio::task::spawn_blocking(move || team::create_team(&store, body.into_draft()))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&created)?))
}

/// PUT /api/teams/{id} — admin only; replaces the record.
pub async fn update_team(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TeamBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let updated =
        tokio::task::spawn_blocking(move || team::update_team(&store, &id, body.into_draft()))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&updated)?))
}

/// DELETE /api/teams/{id} — admin only.
pub async fn delete_team(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || team::delete_team(&store, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": deleted, "deleted": true })))
}

/// POST /api/teams/{id}/members — admin only; rejects duplicates.
pub async fn add_member(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<MemberBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_admin(&headers)?;
    let store = app.store.clone();
    let updated = tokio::task::spawn_blocking(move || {
        team::add_member(&store, &id, &body.user_id, &body.role)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&updated)?))
}
