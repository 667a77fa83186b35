use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::{ColumnId, Priority, TeamColor};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A board task. Status is not a field: it is the column path the record
/// lives under (`kanban/{column}/tasks/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub team: TeamColor,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_reason: Option<String>,
}

/// Form fields for creating or editing a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub team: TeamColor,
}

/// One lane of the board snapshot, tasks in display order.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub id: ColumnId,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// A re-prioritization decision to merge back into the board.
#[derive(Debug, Clone)]
pub struct PriorityAssignment {
    pub id: String,
    pub priority: Priority,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Tasks of one column, sorted by `(order, id)`.
pub fn column_tasks(store: &Store, column: ColumnId) -> Result<Vec<Task>> {
    let map: BTreeMap<String, Task> = store
        .get_as(&paths::column_tasks(column))?
        .unwrap_or_default();
    let mut tasks: Vec<Task> = map.into_values().collect();
    tasks.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    Ok(tasks)
}

/// Full board snapshot, one entry per fixed column.
pub fn board(store: &Store) -> Result<Vec<BoardColumn>> {
    let mut columns = Vec::with_capacity(ColumnId::all().len());
    for &column in ColumnId::all() {
        columns.push(BoardColumn {
            id: column,
            title: column.title(),
            tasks: column_tasks(store, column)?,
        });
    }
    Ok(columns)
}

/// Every task on the board, flattened for prioritization input.
pub fn all_tasks(store: &Store) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    for &column in ColumnId::all() {
        tasks.extend(column_tasks(store, column)?);
    }
    Ok(tasks)
}

/// Which column a task currently lives under, if any.
pub fn locate(store: &Store, id: &str) -> Result<Option<(ColumnId, Task)>> {
    for &column in ColumnId::all() {
        if let Some(task) = store.get_as::<Task>(&paths::task(column, id))? {
            return Ok(Some((column, task)));
        }
    }
    Ok(None)
}

pub fn find_task(store: &Store, id: &str) -> Result<(ColumnId, Task)> {
    locate(store, id)?.ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a task at the bottom of `column`.
pub fn add_task(store: &Store, column: ColumnId, draft: TaskDraft) -> Result<Task> {
    let id = fresh_task_id(store)?;
    let order = column_tasks(store, column)?.len() as u32;
    let task = Task {
        id,
        title: draft.title,
        description: draft.description,
        priority: draft.priority,
        team: draft.team,
        order,
        priority_reason: None,
    };
    store.set(&paths::task(column, &task.id), &task)?;
    Ok(task)
}

/// Edit a task's fields, moving it if `status` differs from its current
/// column. A status change is a delete at the old path followed by a create
/// at the new one — two writes, not a transaction.
pub fn edit_task(store: &Store, id: &str, draft: TaskDraft, status: ColumnId) -> Result<Task> {
    let (current, existing) = find_task(store, id)?;

    if current == status {
        let task = Task {
            id: existing.id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            team: draft.team,
            order: existing.order,
            priority_reason: existing.priority_reason,
        };
        store.set(&paths::task(current, id), &task)?;
        return Ok(task);
    }

    // The re-created record starts over: position and any prioritization
    // note belong to the old column entry.
    let task = Task {
        id: existing.id,
        title: draft.title,
        description: draft.description,
        priority: draft.priority,
        team: draft.team,
        order: 0,
        priority_reason: None,
    };
    store.remove(&paths::task(current, id))?;
    store.set(&paths::task(status, id), &task)?;
    Ok(task)
}

pub fn delete_task(store: &Store, id: &str) -> Result<()> {
    let (column, _) = find_task(store, id)?;
    store.remove(&paths::task(column, id))
}

/// Move a task. Within one column this splices the ordered list and rewrites
/// the whole column collection with re-stamped `order` fields. Across
/// columns it is a single two-path batch (clear source, set destination);
/// the destination position is not persisted, so `to_index` only applies to
/// same-column moves.
pub fn move_task(
    store: &Store,
    id: &str,
    from: ColumnId,
    to: ColumnId,
    to_index: usize,
) -> Result<()> {
    if from == to {
        let mut tasks = column_tasks(store, from)?;
        let from_index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        if to_index >= tasks.len() {
            return Err(CoreError::IndexOutOfBounds {
                index: to_index,
                len: tasks.len(),
            });
        }
        let moved = tasks.remove(from_index);
        tasks.insert(to_index, moved);
        return write_column(store, from, tasks);
    }

    let task = store
        .get_as::<Task>(&paths::task(from, id))?
        .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
    store.update(vec![
        (paths::task(from, id), Value::Null),
        (paths::task(to, id), serde_json::to_value(&task)?),
    ])
}

/// Merge generation-flow priority decisions back into the board: one batched
/// update, one `priority` + `priority_reason` patch pair per task the board
/// still contains. Returns how many tasks were patched; ids the board no
/// longer knows are skipped.
pub fn apply_prioritization(store: &Store, assignments: &[PriorityAssignment]) -> Result<usize> {
    let mut patches = Vec::new();
    let mut applied = 0;
    for assignment in assignments {
        let Some((column, _)) = locate(store, &assignment.id)? else {
            continue;
        };
        patches.push((
            paths::task_priority(column, &assignment.id),
            serde_json::to_value(assignment.priority)?,
        ));
        patches.push((
            paths::task_priority_reason(column, &assignment.id),
            Value::String(assignment.reason.clone()),
        ));
        applied += 1;
    }
    if !patches.is_empty() {
        store.update(patches)?;
    }
    Ok(applied)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_column(store: &Store, column: ColumnId, tasks: Vec<Task>) -> Result<()> {
    let mut map = Map::new();
    for (index, mut task) in tasks.into_iter().enumerate() {
        task.order = index as u32;
        map.insert(task.id.clone(), serde_json::to_value(&task)?);
    }
    store.set(&paths::column_tasks(column), &Value::Object(map))
}

fn fresh_task_id(store: &Store) -> Result<String> {
    let millis = Utc::now().timestamp_millis().max(0);
    let mut n = 0u32;
    loop {
        let candidate = if n == 0 {
            format!("task-{millis}")
        } else {
            format!("task-{millis}-{n}")
        };
        if locate(store, &candidate)?.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            priority: Priority::Medium,
            team: TeamColor::Red,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn add_appends_in_order() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("Scan")).unwrap();
        let b = add_task(&store, ColumnId::Todo, draft("Audit")).unwrap();
        assert_ne!(a.id, b.id);

        let tasks = column_tasks(&store, ColumnId::Todo).unwrap();
        assert_eq!(ids(&tasks), vec![a.id, b.id]);
    }

    #[test]
    fn same_column_move_matches_destination_index() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();
        let b = add_task(&store, ColumnId::Todo, draft("B")).unwrap();
        let c = add_task(&store, ColumnId::Todo, draft("C")).unwrap();

        move_task(&store, &c.id, ColumnId::Todo, ColumnId::Todo, 0).unwrap();

        let tasks = column_tasks(&store, ColumnId::Todo).unwrap();
        assert_eq!(ids(&tasks), vec![c.id.clone(), a.id.clone(), b.id.clone()]);

        // No loss or duplication.
        let mut sorted = ids(&tasks);
        sorted.sort();
        let mut expected = vec![a.id, b.id, c.id];
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn same_column_move_rejects_out_of_bounds_index() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();
        let err = move_task(&store, &a.id, ColumnId::Todo, ColumnId::Todo, 5).unwrap_err();
        assert!(matches!(err, CoreError::IndexOutOfBounds { len: 1, .. }));
    }

    #[test]
    fn cross_column_move_leaves_exactly_one_record() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();

        move_task(&store, &a.id, ColumnId::Todo, ColumnId::Done, 0).unwrap();

        let mut holding = Vec::new();
        for &column in ColumnId::all() {
            if column_tasks(&store, column).unwrap().iter().any(|t| t.id == a.id) {
                holding.push(column);
            }
        }
        assert_eq!(holding, vec![ColumnId::Done]);
    }

    #[test]
    fn move_unknown_task_fails() {
        let store = Store::in_memory();
        let err = move_task(&store, "task-0", ColumnId::Todo, ColumnId::Done, 0).unwrap_err();
        assert!(matches!(err, CoreError::TaskNotFound(_)));
    }

    #[test]
    fn edit_in_place_keeps_position() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();
        let b = add_task(&store, ColumnId::Todo, draft("B")).unwrap();

        let mut updated = draft("A2");
        updated.priority = Priority::Critical;
        edit_task(&store, &a.id, updated, ColumnId::Todo).unwrap();

        let tasks = column_tasks(&store, ColumnId::Todo).unwrap();
        assert_eq!(ids(&tasks), vec![a.id.clone(), b.id]);
        assert_eq!(tasks[0].title, "A2");
        assert_eq!(tasks[0].priority, Priority::Critical);
    }

    #[test]
    fn edit_with_status_change_relocates_record() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();

        edit_task(&store, &a.id, draft("A"), ColumnId::InProgress).unwrap();

        assert!(column_tasks(&store, ColumnId::Todo).unwrap().is_empty());
        let (column, _) = find_task(&store, &a.id).unwrap();
        assert_eq!(column, ColumnId::InProgress);
    }

    #[test]
    fn delete_removes_record() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();
        delete_task(&store, &a.id).unwrap();
        assert!(locate(&store, &a.id).unwrap().is_none());
        assert!(matches!(
            delete_task(&store, &a.id).unwrap_err(),
            CoreError::TaskNotFound(_)
        ));
    }

    #[test]
    fn prioritization_patches_known_tasks_and_skips_the_rest() {
        let store = Store::in_memory();
        let a = add_task(&store, ColumnId::Todo, draft("A")).unwrap();
        let b = add_task(&store, ColumnId::Done, draft("B")).unwrap();

        let applied = apply_prioritization(
            &store,
            &[
                PriorityAssignment {
                    id: a.id.clone(),
                    priority: Priority::Critical,
                    reason: "active exploitation".to_string(),
                },
                PriorityAssignment {
                    id: "task-gone".to_string(),
                    priority: Priority::Low,
                    reason: "stale".to_string(),
                },
                PriorityAssignment {
                    id: b.id.clone(),
                    priority: Priority::Low,
                    reason: "already shipped".to_string(),
                },
            ],
        )
        .unwrap();
        assert_eq!(applied, 2);

        let (_, a2) = find_task(&store, &a.id).unwrap();
        assert_eq!(a2.priority, Priority::Critical);
        assert_eq!(a2.priority_reason.as_deref(), Some("active exploitation"));
        let (_, b2) = find_task(&store, &b.id).unwrap();
        assert_eq!(b2.priority, Priority::Low);
    }

    #[test]
    fn empty_prioritization_is_a_no_op() {
        let store = Store::in_memory();
        assert_eq!(apply_prioritization(&store, &[]).unwrap(), 0);
    }
}
