use axum::extract::State;
use axum::Json;
use cyberstack_core::types::ColumnId;
use cyberstack_core::{board, chat, team, user};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state — store summary: record counts per top-level area.
pub async fn get_state(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = &app.store;

    let mut tasks = serde_json::Map::new();
    let mut total_tasks = 0;
    for &column in ColumnId::all() {
        let count = board::column_tasks(store, column)?.len();
        total_tasks += count;
        tasks.insert(column.to_string(), serde_json::json!(count));
    }

    Ok(Json(serde_json::json!({
        "users": user::list_users(store)?.len(),
        "teams": team::list_teams(store)?.len(),
        "channels": chat::list_channels(store)?.len(),
        "tasks": tasks,
        "total_tasks": total_tasks,
    })))
}
