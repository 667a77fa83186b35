use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A personal to-do item. The store record omits `id`; it is the child key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTask {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Two headline metrics. `efficiency` is hand-edited; `completion_rate` is
/// a derived cache recomputed from the task list on every mutation. Both
/// are last-write-wins, so concurrent editors can clobber each other.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPerformance {
    #[serde(default)]
    pub efficiency: u32,
    #[serde(default, rename = "completionRate")]
    pub completion_rate: u32,
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// First visit seeds a starter list and default metrics. Returns true if
/// seeding happened.
pub fn ensure_seeded(store: &Store, uid: &str) -> Result<bool> {
    if store.exists(&paths::user_tasks(uid))? {
        return Ok(false);
    }
    store.set(
        &paths::user_tasks(uid),
        &json!({
            "tasks": {
                "task-1": { "text": "Complete onboarding tutorial", "completed": true },
                "task-2": { "text": "Set up your profile", "completed": false },
                "task-3": { "text": "Explore the dashboard features", "completed": false },
            },
            "performance": { "efficiency": 75, "completionRate": 0 },
        }),
    )?;
    recompute_completion_rate(store, uid)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub fn tasks(store: &Store, uid: &str) -> Result<Vec<UserTask>> {
    let map: BTreeMap<String, UserTask> =
        store.get_as(&paths::user_task_list(uid))?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(key, mut task)| {
            task.id = key;
            task
        })
        .collect())
}

pub fn performance(store: &Store, uid: &str) -> Result<UserPerformance> {
    Ok(store
        .get_as(&paths::performance(uid))?
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

pub fn add_task(store: &Store, uid: &str, text: &str) -> Result<UserTask> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::EmptyTaskText);
    }
    let mut task = UserTask {
        id: String::new(),
        text: text.to_string(),
        completed: false,
    };
    let key = store.push(&paths::user_task_list(uid), &task)?;
    task.id = key;
    recompute_completion_rate(store, uid)?;
    Ok(task)
}

pub fn set_completed(store: &Store, uid: &str, id: &str, completed: bool) -> Result<()> {
    require_task(store, uid, id)?;
    store.set(&format!("{}/completed", paths::user_task(uid, id)), &completed)?;
    recompute_completion_rate(store, uid).map(|_| ())
}

pub fn edit_text(store: &Store, uid: &str, id: &str, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::EmptyTaskText);
    }
    require_task(store, uid, id)?;
    store.set(&format!("{}/text", paths::user_task(uid, id)), &text)
}

pub fn delete_task(store: &Store, uid: &str, id: &str) -> Result<()> {
    require_task(store, uid, id)?;
    store.remove(&paths::user_task(uid, id))?;
    recompute_completion_rate(store, uid).map(|_| ())
}

/// Manually edited effectiveness metric, 0–100.
pub fn set_efficiency(store: &Store, uid: &str, value: u32) -> Result<()> {
    if value > 100 {
        return Err(CoreError::InvalidEfficiency(value as i64));
    }
    store.set(&format!("{}/efficiency", paths::performance(uid)), &value)
}

// ---------------------------------------------------------------------------
// Derived metric
// ---------------------------------------------------------------------------

/// `round(100 × completed / total)`; 0 for an empty list.
pub fn completion_rate(tasks: &[UserTask]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    ((completed as f64 / tasks.len() as f64) * 100.0).round() as u32
}

/// Overwrite the stored performance record with a freshly derived
/// completion rate, keeping whatever efficiency value is stored right now.
pub fn recompute_completion_rate(store: &Store, uid: &str) -> Result<UserPerformance> {
    let rate = completion_rate(&tasks(store, uid)?);
    let mut perf = performance(store, uid)?;
    perf.completion_rate = rate;
    store.set(&paths::performance(uid), &perf)?;
    Ok(perf)
}

fn require_task(store: &Store, uid: &str, id: &str) -> Result<()> {
    if !store.exists(&paths::user_task(uid, id))? {
        return Err(CoreError::TaskNotFound(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_happens_once() {
        let store = Store::in_memory();
        assert!(ensure_seeded(&store, "u1").unwrap());
        assert!(!ensure_seeded(&store, "u1").unwrap());

        let list = tasks(&store, "u1").unwrap();
        assert_eq!(list.len(), 3);
        // One of three starter tasks is completed.
        let perf = performance(&store, "u1").unwrap();
        assert_eq!(perf.efficiency, 75);
        assert_eq!(perf.completion_rate, 33);
    }

    #[test]
    fn completion_rate_formula() {
        assert_eq!(completion_rate(&[]), 0);

        let make = |completed: &[bool]| -> Vec<UserTask> {
            completed
                .iter()
                .enumerate()
                .map(|(i, &c)| UserTask {
                    id: format!("t{i}"),
                    text: "x".to_string(),
                    completed: c,
                })
                .collect()
        };
        assert_eq!(completion_rate(&make(&[true, false])), 50);
        assert_eq!(completion_rate(&make(&[true, true, false])), 67);
        assert_eq!(completion_rate(&make(&[false, false, false])), 0);
        assert_eq!(completion_rate(&make(&[true])), 100);
    }

    #[test]
    fn rate_tracks_mutations() {
        let store = Store::in_memory();
        let a = add_task(&store, "u1", "write report").unwrap();
        let _b = add_task(&store, "u1", "review findings").unwrap();
        assert_eq!(performance(&store, "u1").unwrap().completion_rate, 0);

        set_completed(&store, "u1", &a.id, true).unwrap();
        assert_eq!(performance(&store, "u1").unwrap().completion_rate, 50);

        delete_task(&store, "u1", &a.id).unwrap();
        assert_eq!(performance(&store, "u1").unwrap().completion_rate, 0);
    }

    #[test]
    fn rate_resets_to_zero_when_list_empties() {
        let store = Store::in_memory();
        let a = add_task(&store, "u1", "only one").unwrap();
        set_completed(&store, "u1", &a.id, true).unwrap();
        assert_eq!(performance(&store, "u1").unwrap().completion_rate, 100);

        delete_task(&store, "u1", &a.id).unwrap();
        assert_eq!(performance(&store, "u1").unwrap().completion_rate, 0);
    }

    #[test]
    fn efficiency_is_validated_and_kept_through_recompute() {
        let store = Store::in_memory();
        assert!(matches!(
            set_efficiency(&store, "u1", 130).unwrap_err(),
            CoreError::InvalidEfficiency(130)
        ));

        set_efficiency(&store, "u1", 80).unwrap();
        let _ = add_task(&store, "u1", "task").unwrap();
        let perf = performance(&store, "u1").unwrap();
        assert_eq!(perf.efficiency, 80);
        assert_eq!(perf.completion_rate, 0);
    }

    #[test]
    fn empty_text_is_rejected() {
        let store = Store::in_memory();
        assert!(matches!(
            add_task(&store, "u1", "  ").unwrap_err(),
            CoreError::EmptyTaskText
        ));
        let a = add_task(&store, "u1", "real").unwrap();
        assert!(matches!(
            edit_text(&store, "u1", &a.id, "").unwrap_err(),
            CoreError::EmptyTaskText
        ));
    }

    #[test]
    fn unknown_task_operations_fail() {
        let store = Store::in_memory();
        assert!(matches!(
            set_completed(&store, "u1", "ghost", true).unwrap_err(),
            CoreError::TaskNotFound(_)
        ));
        assert!(matches!(
            delete_task(&store, "u1", "ghost").unwrap_err(),
            CoreError::TaskNotFound(_)
        ));
    }
}
