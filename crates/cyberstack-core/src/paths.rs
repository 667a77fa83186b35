use crate::error::{CoreError, Result};
use crate::types::ColumnId;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Workspace files
// ---------------------------------------------------------------------------

pub const CYBERSTACK_DIR: &str = ".cyberstack";
pub const CONFIG_FILE: &str = ".cyberstack/config.yaml";
pub const STORE_FILE: &str = ".cyberstack/store.yaml";
pub const CREDENTIALS_FILE: &str = ".cyberstack/credentials.yaml";

pub fn cyberstack_dir(root: &Path) -> PathBuf {
    root.join(CYBERSTACK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn store_path(root: &Path) -> PathBuf {
    root.join(STORE_FILE)
}

pub fn credentials_path(root: &Path) -> PathBuf {
    root.join(CREDENTIALS_FILE)
}

// ---------------------------------------------------------------------------
// Store paths
//
// The document tree is addressed by slash-delimited paths. These helpers
// are the only place path shapes are spelled out.
// ---------------------------------------------------------------------------

pub fn user(uid: &str) -> String {
    format!("users/{uid}")
}

pub fn user_role(uid: &str) -> String {
    format!("users/{uid}/role")
}

pub fn team(id: &str) -> String {
    format!("teams/{id}")
}

pub fn column_tasks(column: ColumnId) -> String {
    format!("kanban/{column}/tasks")
}

pub fn task(column: ColumnId, id: &str) -> String {
    format!("kanban/{column}/tasks/{id}")
}

pub fn task_priority(column: ColumnId, id: &str) -> String {
    format!("kanban/{column}/tasks/{id}/priority")
}

pub fn task_priority_reason(column: ColumnId, id: &str) -> String {
    format!("kanban/{column}/tasks/{id}/priority_reason")
}

pub fn channel(id: &str) -> String {
    format!("chat/channels/{id}")
}

pub fn channel_messages(channel: &str) -> String {
    format!("chat/messages/{channel}")
}

pub fn certifications(uid: &str) -> String {
    format!("learning/{uid}/certifications")
}

pub fn certification(uid: &str, id: &str) -> String {
    format!("learning/{uid}/certifications/{id}")
}

pub fn learning_path(uid: &str) -> String {
    format!("learning/{uid}/path")
}

pub fn user_tasks(uid: &str) -> String {
    format!("user-tasks/{uid}")
}

pub fn user_task_list(uid: &str) -> String {
    format!("user-tasks/{uid}/tasks")
}

pub fn user_task(uid: &str, id: &str) -> String {
    format!("user-tasks/{uid}/tasks/{id}")
}

pub fn performance(uid: &str) -> String {
    format!("user-tasks/{uid}/performance")
}

// ---------------------------------------------------------------------------
// Key validation
// ---------------------------------------------------------------------------

static KEY_RE: OnceLock<Regex> = OnceLock::new();

fn key_re() -> &'static Regex {
    KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap())
}

/// Validate a single path segment (a store key). Rejects empty segments,
/// slashes, and dot-only names so a key can never escape its subtree.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > 128 || key == "." || key == ".." || !key_re().is_match(key) {
        return Err(CoreError::InvalidKey(key.to_string()));
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
    fn valid_keys() {
        for key in ["task-1", "red-team", "a", "user_7", "0f3a.b", "In-Progress"] {
            validate_key(key).unwrap_or_else(|_| panic!("expected valid: {key}"));
        }
    }

    #[test]
    fn invalid_keys() {
        for key in ["", ".", "..", "a/b", "-leading", ".hidden", "has space"] {
            assert!(validate_key(key).is_err(), "expected invalid: {key}");
        }
    }

    #[test]
    fn store_path_shapes() {
        assert_eq!(user("u1"), "users/u1");
        assert_eq!(task(ColumnId::InProgress, "task-9"), "kanban/in-progress/tasks/task-9");
        assert_eq!(channel_messages("public"), "chat/messages/public");
        assert_eq!(certification("u1", "c2"), "learning/u1/certifications/c2");
        assert_eq!(performance("u1"), "user-tasks/u1/performance");
    }

    #[test]
    fn workspace_paths() {
        let root = Path::new("/tmp/proj");
        assert_eq!(config_path(root), PathBuf::from("/tmp/proj/.cyberstack/config.yaml"));
        assert_eq!(store_path(root), PathBuf::from("/tmp/proj/.cyberstack/store.yaml"));
    }
}
