use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use cyberstack_core::board::{self, PriorityAssignment, TaskDraft};
use cyberstack_core::config::Config;
use cyberstack_core::types::{ColumnId, Priority, TeamColor};
use cyberstack_core::{team, Store};
use genai_flows::flows::task_prioritization;
use genai_flows::{GenClient, PrioritizeTasksInput, TaskSummary};
use std::path::Path;

#[derive(Subcommand)]
pub enum BoardSubcommand {
    /// Show the board, one section per column
    List,
    /// Add a task to a column (todo, in-progress, done)
    Add {
        column: String,
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Medium")]
        priority: String,
        #[arg(long, default_value = "Red")]
        team: String,
    },
    /// Move a task between or within columns
    Move {
        id: String,
        from: String,
        to: String,
        /// Destination position for same-column moves
        #[arg(long, default_value = "0")]
        index: usize,
    },
    /// Delete a task
    Delete { id: String },
    /// Re-prioritize the whole board via the generation API
    Prioritize {
        /// Threat intelligence context to weigh in
        #[arg(long)]
        threat_intel: Option<String>,
        /// Team capacity context (default: derived from the rosters)
        #[arg(long)]
        capacity: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: BoardSubcommand, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    match subcmd {
        BoardSubcommand::List => list(&store, json),
        BoardSubcommand::Add {
            column,
            title,
            description,
            priority,
            team,
        } => add(&store, &column, &title.join(" "), description, &priority, &team, json),
        BoardSubcommand::Move { id, from, to, index } => {
            move_task(&store, &id, &from, &to, index, json)
        }
        BoardSubcommand::Delete { id } => delete(&store, &id, json),
        BoardSubcommand::Prioritize {
            threat_intel,
            capacity,
        } => prioritize(root, &store, threat_intel, capacity, json),
    }
}

fn list(store: &Store, json: bool) -> anyhow::Result<()> {
    let columns = board::board(store)?;
    if json {
        print_json(&columns)?;
        return Ok(());
    }
    for column in columns {
        println!("{} ({})", column.title, column.tasks.len());
        if column.tasks.is_empty() {
            println!("  (empty)");
        } else {
            let rows: Vec<Vec<String>> = column
                .tasks
                .iter()
                .map(|t| {
                    vec![
                        t.id.clone(),
                        t.title.clone(),
                        t.priority.to_string(),
                        t.team.to_string(),
                    ]
                })
                .collect();
            print_table(&["id", "title", "priority", "team"], &rows);
        }
        println!();
    }
    Ok(())
}

fn add(
    store: &Store,
    column: &str,
    title: &str,
    description: String,
    priority: &str,
    team: &str,
    json: bool,
) -> anyhow::Result<()> {
    let column: ColumnId = column.parse().with_context(|| format!("invalid column '{column}'"))?;
    let priority: Priority = priority
        .parse()
        .with_context(|| format!("invalid priority '{priority}'"))?;
    let team: TeamColor = team.parse().with_context(|| format!("invalid team '{team}'"))?;

    let task = board::add_task(
        store,
        column,
        TaskDraft {
            title: title.to_string(),
            description,
            priority,
            team,
        },
    )?;

    if json {
        print_json(&task)?;
    } else {
        println!("Added task [{}] to {column}: {}", task.id, task.title);
    }
    Ok(())
}

fn move_task(
    store: &Store,
    id: &str,
    from: &str,
    to: &str,
    index: usize,
    json: bool,
) -> anyhow::Result<()> {
    let from: ColumnId = from.parse().with_context(|| format!("invalid column '{from}'"))?;
    let to: ColumnId = to.parse().with_context(|| format!("invalid column '{to}'"))?;
    board::move_task(store, id, from, to, index)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "from": from, "to": to, "index": index }))?;
    } else {
        println!("Moved [{id}] {from} -> {to}");
    }
    Ok(())
}

fn delete(store: &Store, id: &str, json: bool) -> anyhow::Result<()> {
    board::delete_task(store, id)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted task [{id}]");
    }
    Ok(())
}

fn prioritize(
    root: &Path,
    store: &Store,
    threat_intel: Option<String>,
    capacity: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let tasks = board::all_tasks(store)?;
    if tasks.is_empty() {
        println!("Board is empty; nothing to prioritize.");
        return Ok(());
    }

    let config = Config::load(root)?;
    let client = GenClient::from_env(
        &config.genai.endpoint,
        &config.genai.model,
        &config.genai.api_key_env,
    )?;

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
        threat_intelligence: threat_intel.unwrap_or_else(|| {
            "No new threat intelligence supplied; prioritize by impact and current backlog."
                .to_string()
        }),
        team_capacity: match capacity {
            Some(c) => c,
            None => {
                let teams = team::list_teams(store)?;
                if teams.is_empty() {
                    "No team capacity information available.".to_string()
                } else {
                    teams
                        .iter()
                        .map(|t| format!("{} is at {}% capacity.", t.name, t.capacity))
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            }
        },
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(task_prioritization::run(&client, &input))?;

    let mut assignments = Vec::with_capacity(output.prioritized_tasks.len());
    for decision in &output.prioritized_tasks {
        let priority: Priority = decision
            .priority
            .parse()
            .with_context(|| format!("generation returned unknown priority '{}'", decision.priority))?;
        assignments.push(PriorityAssignment {
            id: decision.id.clone(),
            priority,
            reason: decision.reason.clone(),
        });
    }
    let applied = board::apply_prioritization(store, &assignments)?;

    if json {
        print_json(&serde_json::json!({
            "prioritized": output.prioritized_tasks,
            "applied": applied,
        }))?;
    } else {
        println!("Re-prioritized {applied} tasks:");
        for decision in &output.prioritized_tasks {
            println!("  [{}] {} — {}", decision.id, decision.priority, decision.reason);
        }
    }
    Ok(())
}
