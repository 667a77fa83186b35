use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use cyberstack_core::board::{self, PriorityAssignment, TaskDraft};
use cyberstack_core::team;
use cyberstack_core::types::{ColumnId, Priority, TeamColor};
use genai_flows::flows::task_prioritization;
use genai_flows::{GenAiError, PrioritizeTasksInput, TaskSummary};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct TaskBody {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub team: TeamColor,
    pub status: ColumnId,
}

#[derive(serde::Deserialize)]
pub struct MoveBody {
    pub id: String,
    pub from: ColumnId,
    pub to: ColumnId,
    #[serde(default)]
    pub to_index: usize,
}

#[derive(serde::Deserialize, Default)]
pub struct PrioritizeBody {
    #[serde(default)]
    pub threat_intelligence: Option<String>,
    #[serde(default)]
    pub team_capacity: Option<String>,
}

/// GET /api/board — full board snapshot.
pub async fn get_board(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let columns = board::board(&app.store)?;
    Ok(Json(serde_json::json!({ "columns": columns })))
}

/// POST /api/board/tasks — create a task in the given column.
pub async fn add_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let store = app.store.clone();
    let task = tokio::task::spawn_blocking(move || {
        board::add_task(
            &store,
            body.status,
            TaskDraft {
                title: body.title,
                description: body.description,
                priority: body.priority,
                team: body.team,
            },
        )
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&task)?))
}

/// PUT /api/board/tasks/{id} — edit fields; a changed status relocates the
/// record to the new column.
pub async fn edit_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let store = app.store.clone();
    let task = tokio::task::spawn_blocking(move || {
        board::edit_task(
            &store,
            &id,
            TaskDraft {
                title: body.title,
                description: body.description,
                priority: body.priority,
                team: body.team,
            },
            body.status,
        )
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&task)?))
}

/// DELETE /api/board/tasks/{id}
pub async fn delete_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let store = app.store.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || board::delete_task(&store, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "id": deleted, "deleted": true })))
}

/// POST /api/board/move — drag-and-drop semantics: splice within a column,
/// two-path batch across columns.
pub async fn move_task(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MoveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;
    let store = app.store.clone();
    tokio::task::spawn_blocking(move || {
        board::move_task(&store, &body.id, body.from, body.to, body.to_index)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// POST /api/board/prioritize — run the task-prioritization flow over the
/// whole board and merge the result back, one batched patch set. An empty
/// board short-circuits without calling the generation API.
pub async fn prioritize(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PrioritizeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.require_uid(&headers)?;

    let tasks = board::all_tasks(&app.store)?;
    if tasks.is_empty() {
        return Ok(Json(
            serde_json::json!({ "prioritizedTasks": [], "applied": 0 }),
        ));
    }

    let client = super::gen_client(&app.config)?;
    let input = PrioritizeTasksInput {
        tasks: tasks
            .iter()
            .map(|t| TaskSummary {
                id: t.id.clone(),
                title: t.title.clone(),
                description: t.description.clone(),
                priority: Some(t.priority.to_string()),
            })
            .collect(),
        threat_intelligence: body
            .threat_intelligence
            .unwrap_or_else(default_threat_intelligence),
        team_capacity: match body.team_capacity {
            Some(capacity) => capacity,
            None => capacity_summary(&app)?,
        },
    };

    let output = task_prioritization::run(&client, &input).await?;

    let mut assignments = Vec::with_capacity(output.prioritized_tasks.len());
    for decision in &output.prioritized_tasks {
        let priority: Priority =
            decision
                .priority
                .parse()
                .map_err(|_| GenAiError::SchemaMismatch {
                    flow: "task-prioritization",
                    reason: format!("unknown priority '{}'", decision.priority),
                })?;
        assignments.push(PriorityAssignment {
            id: decision.id.clone(),
            priority,
            reason: decision.reason.clone(),
        });
    }

    let store = app.store.clone();
    let applied =
        tokio::task::spawn_blocking(move || board::apply_prioritization(&store, &assignments))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "prioritizedTasks": output.prioritized_tasks,
        "applied": applied,
    })))
}

fn default_threat_intelligence() -> String {
    "No new threat intelligence supplied; prioritize by impact and current backlog.".to_string()
}

/// Capacity context derived from the live rosters.
fn capacity_summary(app: &AppState) -> Result<String, AppError> {
    let teams = team::list_teams(&app.store)?;
    if teams.is_empty() {
        return Ok("No team capacity information available.".to_string());
    }
    Ok(teams
        .iter()
        .map(|t| format!("{} is at {}% capacity.", t.name, t.capacity))
        .collect::<Vec<_>>()
        .join(" "))
}
