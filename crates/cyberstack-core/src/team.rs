use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::TeamName;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Role within the team, e.g. "Lead Pentester". Free text.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: TeamName,
    pub description: String,
    /// Utilization percentage, 0–100.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDraft {
    pub name: TeamName,
    pub description: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn list_teams(store: &Store) -> Result<Vec<Team>> {
    let map: BTreeMap<String, Team> = store.get_as("teams")?.unwrap_or_default();
    Ok(map.into_values().collect())
}

pub fn get_team(store: &Store, id: &str) -> Result<Team> {
    store
        .get_as(&paths::team(id))?
        .ok_or_else(|| CoreError::TeamNotFound(id.to_string()))
}

pub fn create_team(store: &Store, draft: TeamDraft) -> Result<Team> {
    validate(&draft)?;
    let id = fresh_team_id(store)?;
    let team = Team {
        id,
        name: draft.name,
        description: draft.description,
        capacity: draft.capacity,
        members: draft.members,
    };
    store.set(&paths::team(&team.id), &team)?;
    Ok(team)
}

pub fn update_team(store: &Store, id: &str, draft: TeamDraft) -> Result<Team> {
    validate(&draft)?;
    if !store.exists(&paths::team(id))? {
        return Err(CoreError::TeamNotFound(id.to_string()));
    }
    let team = Team {
        id: id.to_string(),
        name: draft.name,
        description: draft.description,
        capacity: draft.capacity,
        members: draft.members,
    };
    store.set(&paths::team(id), &team)?;
    Ok(team)
}

pub fn delete_team(store: &Store, id: &str) -> Result<()> {
    if !store.exists(&paths::team(id))? {
        return Err(CoreError::TeamNotFound(id.to_string()));
    }
    store.remove(&paths::team(id))
}

pub fn add_member(store: &Store, team_id: &str, user_id: &str, role: &str) -> Result<Team> {
    let mut team = get_team(store, team_id)?;
    if team.members.iter().any(|m| m.user_id == user_id) {
        return Err(CoreError::DuplicateTeamMember(user_id.to_string()));
    }
    team.members.push(TeamMember {
        user_id: user_id.to_string(),
        role: role.to_string(),
    });
    store.set(&paths::team(team_id), &team)?;
    Ok(team)
}

/// Teams that count `uid` among their members.
pub fn teams_of(store: &Store, uid: &str) -> Result<Vec<Team>> {
    Ok(list_teams(store)?
        .into_iter()
        .filter(|t| t.members.iter().any(|m| m.user_id == uid))
        .collect())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate(draft: &TeamDraft) -> Result<()> {
    if draft.capacity > 100 {
        return Err(CoreError::InvalidCapacity(draft.capacity as i64));
    }
    let mut seen = HashSet::new();
    for member in &draft.members {
        if !seen.insert(member.user_id.as_str()) {
            return Err(CoreError::DuplicateTeamMember(member.user_id.clone()));
        }
    }
    Ok(())
}

fn fresh_team_id(store: &Store) -> Result<String> {
    let millis = Utc::now().timestamp_millis().max(0);
    let mut n = 0u32;
    loop {
        let candidate = if n == 0 {
            format!("team-{millis}")
        } else {
            format!("team-{millis}-{n}")
        };
        if !store.exists(&paths::team(&candidate))? {
            return Ok(candidate);
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
