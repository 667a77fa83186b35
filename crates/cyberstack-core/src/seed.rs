use crate::board::Task;
use crate::chat;
use crate::error::Result;
use crate::paths;
use crate::store::Store;
use crate::team::Team;
use crate::types::{ColumnId, Priority, TeamColor, TeamName};
use serde::Serialize;

// ---------------------------------------------------------------------------
// First-run seeding
//
// Mirrors the platform's bootstrap behavior: fixed rosters and channels
// appear the first time the store is empty, and the board starts with a
// sample workload. Each area seeds independently and only when absent, so
// re-running is always safe.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub teams_seeded: bool,
    pub channels_added: usize,
    pub board_seeded: bool,
}

pub fn seed(store: &Store) -> Result<SeedSummary> {
    Ok(SeedSummary {
        teams_seeded: seed_teams(store)?,
        channels_added: chat::ensure_default_channels(store)?,
        board_seeded: seed_board(store)?,
    })
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// The three fixed teams. Ids line up with their chat channel ids.
pub fn default_teams() -> Vec<Team> {
    vec![
        Team {
            id: "red-team".to_string(),
            name: TeamName::RedTeam,
            description:
                "Offensive security experts focused on penetration testing and simulating attacks."
                    .to_string(),
            capacity: 85,
            members: Vec::new(),
        },
        Team {
            id: "blue-team".to_string(),
            name: TeamName::BlueTeam,
            description:
                "Defensive security specialists responsible for threat detection and incident response."
                    .to_string(),
            capacity: 92,
            members: Vec::new(),
        },
        Team {
            id: "purple-team".to_string(),
            name: TeamName::PurpleTeam,
            description:
                "Collaborative unit that integrates red and blue team strategies to maximize security."
                    .to_string(),
            capacity: 78,
            members: Vec::new(),
        },
    ]
}

fn seed_teams(store: &Store) -> Result<bool> {
    if store.exists("teams")? {
        return Ok(false);
    }
    let mut patches = Vec::new();
    for team in default_teams() {
        patches.push((paths::team(&team.id), serde_json::to_value(&team)?));
    }
    store.update(patches)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

fn sample_task(
    id: &str,
    title: &str,
    description: &str,
    priority: Priority,
    team: TeamColor,
    order: u32,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        team,
        order,
        priority_reason: None,
    }
}

fn sample_board() -> Vec<(ColumnId, Task)> {
    vec![
        (
            ColumnId::Todo,
            sample_task(
                "task-1",
                "Network Vulnerability Scan",
                "Perform a full scan of the external network perimeter.",
                Priority::High,
                TeamColor::Red,
                0,
            ),
        ),
        (
            ColumnId::Todo,
            sample_task(
                "task-8",
                "Application Security Review",
                "Static and dynamic analysis of the new customer portal.",
                Priority::Medium,
                TeamColor::Red,
                1,
            ),
        ),
        (
            ColumnId::InProgress,
            sample_task(
                "task-3",
                "Review Firewall Ruleset",
                "Audit all firewall rules for legacy or insecure configurations.",
                Priority::High,
                TeamColor::Blue,
                0,
            ),
        ),
        (
            ColumnId::InProgress,
            sample_task(
                "task-7",
                "Conduct ATT&CK Emulation",
                "Emulate APT41 techniques to test detection capabilities.",
                Priority::High,
                TeamColor::Purple,
                1,
            ),
        ),
        (
            ColumnId::Done,
            sample_task(
                "task-2",
                "Phishing Campaign Simulation",
                "Simulate a targeted phishing attack on the finance department.",
                Priority::Medium,
                TeamColor::Red,
                0,
            ),
        ),
        (
            ColumnId::Done,
            sample_task(
                "task-4",
                "Update SIEM Detection Logic",
                "Incorporate new IOCs from recent threat intel feeds.",
                Priority::High,
                TeamColor::Blue,
                1,
            ),
        ),
        (
            ColumnId::Done,
            sample_task(
                "task-5",
                "Analyze Endpoint Logs",
                "Hunt for persistence mechanisms on critical servers.",
                Priority::Medium,
                TeamColor::Blue,
                2,
            ),
        ),
        (
            ColumnId::Done,
            sample_task(
                "task-6",
                "Develop New Detection Playbook",
                "Create a new playbook based on the latest Red Team TTPs.",
                Priority::Low,
                TeamColor::Purple,
                3,
            ),
        ),
    ]
}

fn seed_board(store: &Store) -> Result<bool> {
    if store.exists("kanban")? {
        return Ok(false);
    }
    let mut patches = Vec::new();
    for (column, task) in sample_board() {
        patches.push((paths::task(column, &task.id), serde_json::to_value(&task)?));
    }
    store.update(patches)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board;
    use crate::team;

    #[test]
    fn seed_populates_empty_store() {
        let store = Store::in_memory();
        let summary = seed(&store).unwrap();
        assert!(summary.teams_seeded);
        assert_eq!(summary.channels_added, 4);
        assert!(summary.board_seeded);

        assert_eq!(team::list_teams(&store).unwrap().len(), 3);
        assert_eq!(board::column_tasks(&store, ColumnId::Todo).unwrap().len(), 2);
        assert_eq!(
            board::column_tasks(&store, ColumnId::InProgress).unwrap().len(),
            2
        );
        assert_eq!(board::column_tasks(&store, ColumnId::Done).unwrap().len(), 4);
    }

    #[test]
    fn seed_is_idempotent() {
        let store = Store::in_memory();
        seed(&store).unwrap();

        // Mutate, then re-seed: nothing is overwritten.
        board::delete_task(&store, "task-1").unwrap();
        let summary = seed(&store).unwrap();
        assert!(!summary.teams_seeded);
        assert_eq!(summary.channels_added, 0);
        assert!(!summary.board_seeded);
        assert!(board::locate(&store, "task-1").unwrap().is_none());
    }

    #[test]
    fn seeded_columns_read_in_declared_order() {
        let store = Store::in_memory();
        seed(&store).unwrap();
        let todo = board::column_tasks(&store, ColumnId::Todo).unwrap();
        assert_eq!(todo[0].id, "task-1");
        assert_eq!(todo[1].id, "task-8");
    }
}
