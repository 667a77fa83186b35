use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use cyberstack_core::team::{self, TeamDraft};
use cyberstack_core::types::TeamName;
use cyberstack_core::Store;
use std::path::Path;

#[derive(Subcommand)]
pub enum TeamSubcommand {
    /// List teams with capacity and member counts
    List,
    /// Create a team (name is one of: red, blue, purple)
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "0")]
        capacity: u32,
    },
    /// Update a team's description and/or capacity
    Update {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Add a member to a team
    AddMember {
        id: String,
        uid: String,
        #[arg(long, default_value = "Member")]
        role: String,
    },
    /// Delete a team
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: TeamSubcommand, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    match subcmd {
        TeamSubcommand::List => list(&store, json),
        TeamSubcommand::Create {
            name,
            description,
            capacity,
        } => create(&store, &name, description, capacity, json),
        TeamSubcommand::Update {
            id,
            description,
            capacity,
        } => update(&store, &id, description, capacity, json),
        TeamSubcommand::AddMember { id, uid, role } => add_member(&store, &id, &uid, &role, json),
        TeamSubcommand::Delete { id } => delete(&store, &id, json),
    }
}

fn list(store: &Store, json: bool) -> anyhow::Result<()> {
    let teams = team::list_teams(store)?;
    if json {
        print_json(&teams)?;
    } else if teams.is_empty() {
        println!("No teams. Run 'cyberstack seed' to create the fixed rosters.");
    } else {
        let rows: Vec<Vec<String>> = teams
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.name.to_string(),
                    format!("{}%", t.capacity),
                    t.members.len().to_string(),
                ]
            })
            .collect();
        print_table(&["id", "name", "capacity", "members"], &rows);
    }
    Ok(())
}

fn create(
    store: &Store,
    name: &str,
    description: String,
    capacity: u32,
    json: bool,
) -> anyhow::Result<()> {
    let name: TeamName = name.parse().with_context(|| format!("invalid team name '{name}'"))?;
    let created = team::create_team(
        store,
        TeamDraft {
            name,
            description,
            capacity,
            members: Vec::new(),
        },
    )?;

    if json {
        print_json(&created)?;
    } else {
        println!("Created team [{}]: {}", created.id, created.name);
    }
    Ok(())
}

fn update(
    store: &Store,
    id: &str,
    description: Option<String>,
    capacity: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let existing = team::get_team(store, id)?;
    let updated = team::update_team(
        store,
        id,
        TeamDraft {
            name: existing.name,
            description: description.unwrap_or(existing.description),
            capacity: capacity.unwrap_or(existing.capacity),
            members: existing.members,
        },
    )?;

    if json {
        print_json(&updated)?;
    } else {
        println!("Updated team [{id}]");
    }
    Ok(())
}

fn add_member(store: &Store, id: &str, uid: &str, role: &str, json: bool) -> anyhow::Result<()> {
    let updated = team::add_member(store, id, uid, role)?;

    if json {
        print_json(&updated)?;
    } else {
        println!("Added [{uid}] to team [{id}] as {role}");
    }
    Ok(())
}

fn delete(store: &Store, id: &str, json: bool) -> anyhow::Result<()> {
    team::delete_team(store, id)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted team [{id}]");
    }
    Ok(())
}
