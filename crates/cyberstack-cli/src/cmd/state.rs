use crate::output::{print_json, print_table};
use cyberstack_core::types::ColumnId;
use cyberstack_core::{board, chat, team, user, Store};
use std::path::Path;

/// `cyberstack state` — record counts per store area.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;

    let users = user::list_users(&store)?.len();
    let teams = team::list_teams(&store)?.len();
    let channels = chat::list_channels(&store)?.len();

    let mut per_column = Vec::new();
    let mut total = 0;
    for &column in ColumnId::all() {
        let count = board::column_tasks(&store, column)?.len();
        total += count;
        per_column.push((column, count));
    }

    if json {
        let tasks: serde_json::Map<String, serde_json::Value> = per_column
            .iter()
            .map(|(c, n)| (c.to_string(), serde_json::json!(n)))
            .collect();
        print_json(&serde_json::json!({
            "users": users,
            "teams": teams,
            "channels": channels,
            "tasks": tasks,
            "total_tasks": total,
        }))?;
    } else {
        let mut rows = vec![
            vec!["users".to_string(), users.to_string()],
            vec!["teams".to_string(), teams.to_string()],
            vec!["channels".to_string(), channels.to_string()],
        ];
        for (column, count) in &per_column {
            rows.push(vec![format!("tasks/{column}"), count.to_string()]);
        }
        rows.push(vec!["tasks total".to_string(), total.to_string()]);
        print_table(&["area", "count"], &rows);
    }
    Ok(())
}
