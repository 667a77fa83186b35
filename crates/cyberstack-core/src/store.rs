use crate::error::Result;
use crate::io;
use crate::paths;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Store
//
// A path-addressed JSON document tree: the single source of truth for every
// entity in the platform. `set` replaces a subtree, `update` patches several
// paths as one batch, `remove` deletes a subtree, and `subscribe` registers
// an observer that receives the subtree snapshot on every relevant change.
//
// Writes are last-write-wins with no versioning. The whole tree is persisted
// as YAML after every mutation, before observers are notified.
// ---------------------------------------------------------------------------

type Callback = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

struct Subscriber {
    id: u64,
    segments: Vec<String>,
    callback: Callback,
}

struct StoreState {
    tree: Value,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
    push_seq: u64,
}

struct Inner {
    file: Option<PathBuf>,
    state: Mutex<StoreState>,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

/// Handle returned by [`Store::subscribe`]. Dropping it unregisters the
/// observer, so a listener cannot outlive its owner.
pub struct Subscription {
    inner: Weak<Inner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut st) = inner.state.lock() {
                st.subscribers.retain(|s| s.id != self.id);
            }
        }
    }
}

impl Store {
    /// Open the store backing file under `root`, creating an empty tree if
    /// the file does not exist yet.
    pub fn open(root: &Path) -> Result<Store> {
        let file = paths::store_path(root);
        let tree = if file.exists() {
            let data = std::fs::read_to_string(&file)?;
            if data.trim().is_empty() {
                Value::Object(Map::new())
            } else {
                serde_yaml::from_str(&data)?
            }
        } else {
            Value::Object(Map::new())
        };
        Ok(Self::with_tree(Some(file), tree))
    }

    /// An unpersisted store. Used by unit tests that exercise pure
    /// tree semantics.
    pub fn in_memory() -> Store {
        Self::with_tree(None, Value::Object(Map::new()))
    }

    fn with_tree(file: Option<PathBuf>, tree: Value) -> Store {
        let tree = if tree.is_object() {
            tree
        } else {
            Value::Object(Map::new())
        };
        Store {
            inner: Arc::new(Inner {
                file,
                state: Mutex::new(StoreState {
                    tree,
                    subscribers: Vec::new(),
                    next_subscriber: 0,
                    push_seq: 0,
                }),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Snapshot of the subtree at `path`, or `None` if nothing is stored there.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let segments = split_path(path)?;
        let st = self.lock();
        Ok(get_at(&st.tree, &segments).cloned())
    }

    /// Typed read: deserialize the subtree at `path`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.get(path)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.get(path)?.is_some())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Replace the subtree at `path` entirely. Writing a JSON null is
    /// equivalent to [`Store::remove`].
    pub fn set<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let segments = split_path(path)?;
        let value = serde_json::to_value(value)?;
        self.apply(vec![(segments, value)])
    }

    /// Apply several path patches as one atomic batch: a single lock, a
    /// single persist, and one notification per affected observer.
    pub fn update(&self, patches: Vec<(String, Value)>) -> Result<()> {
        let mut resolved = Vec::with_capacity(patches.len());
        for (path, value) in patches {
            resolved.push((split_path(&path)?, value));
        }
        self.apply(resolved)
    }

    /// Delete the subtree at `path`. Deleting an absent path is a no-op.
    pub fn remove(&self, path: &str) -> Result<()> {
        let segments = split_path(path)?;
        self.apply(vec![(segments, Value::Null)])
    }

    /// Insert `value` under a generated child key at `path` and return the
    /// key. Keys are unique and lexically increasing within a process, so a
    /// keyed collection reads back in insertion order.
    pub fn push<T: Serialize>(&self, path: &str, value: &T) -> Result<String> {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let seq = {
            let mut st = self.lock();
            let seq = st.push_seq;
            st.push_seq += 1;
            seq
        };
        let suffix = Uuid::new_v4().simple().to_string();
        let key = format!("{millis:013x}-{seq:06x}-{}", &suffix[..6]);
        let child = if path.trim_matches('/').is_empty() {
            key.clone()
        } else {
            format!("{}/{key}", path.trim_matches('/'))
        };
        self.set(&child, value)?;
        Ok(key)
    }

    /// Register an observer on `path`. The callback fires once with the
    /// current snapshot, then again after every write whose path is an
    /// ancestor, descendant, or exact match of the subscribed path.
    pub fn subscribe<F>(&self, path: &str, callback: F) -> Result<Subscription>
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        let segments = split_path(path)?;
        let cb: Callback = Arc::new(callback);
        let mut st = self.lock();
        let id = st.next_subscriber;
        st.next_subscriber += 1;
        st.subscribers.push(Subscriber {
            id,
            segments: segments.clone(),
            callback: cb.clone(),
        });
        let snapshot = get_at(&st.tree, &segments).cloned();
        drop(st);
        cb(snapshot.as_ref());
        Ok(Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .expect("infallible: store mutex is never poisoned by a panic-free writer")
    }

    fn apply(&self, patches: Vec<(Vec<String>, Value)>) -> Result<()> {
        let mut st = self.lock();

        // Mutate a copy so a failed persist leaves memory untouched.
        let mut next = st.tree.clone();
        for (segments, value) in &patches {
            set_at(&mut next, segments, value.clone());
        }
        self.persist(&next)?;
        st.tree = next;

        // Collect affected observers while locked, invoke after unlocking so
        // a callback may call back into the store.
        let mut pending: Vec<(Callback, Option<Value>)> = Vec::new();
        for sub in &st.subscribers {
            let hit = patches
                .iter()
                .any(|(segments, _)| related(segments, &sub.segments));
            if hit {
                pending.push((
                    sub.callback.clone(),
                    get_at(&st.tree, &sub.segments).cloned(),
                ));
            }
        }
        drop(st);

        for (callback, snapshot) in pending {
            callback(snapshot.as_ref());
        }
        Ok(())
    }

    fn persist(&self, tree: &Value) -> Result<()> {
        if let Some(file) = &self.inner.file {
            let data = serde_yaml::to_string(tree)?;
            io::atomic_write(file, data.as_bytes())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree navigation
// ---------------------------------------------------------------------------

fn split_path(path: &str) -> Result<Vec<String>> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        paths::validate_key(segment)?;
        segments.push(segment.to_string());
    }
    Ok(segments)
}

/// Two paths are related when one is a (non-strict) prefix of the other:
/// a write anywhere above or below an observer changes its snapshot.
fn related(a: &[String], b: &[String]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

fn get_at<'a>(tree: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut node = tree;
    for segment in segments {
        node = node.get(segment)?;
    }
    Some(node)
}

fn set_at(tree: &mut Value, segments: &[String], value: Value) {
    if segments.is_empty() {
        *tree = if value.is_null() {
            Value::Object(Map::new())
        } else {
            value
        };
        return;
    }
    if value.is_null() {
        remove_at(tree, segments);
        return;
    }
    let mut node = tree;
    for segment in &segments[..segments.len() - 1] {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node
            .as_object_mut()
            .expect("infallible: node was just coerced to an object");
        node = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let map = node
        .as_object_mut()
        .expect("infallible: node was just coerced to an object");
    map.insert(segments[segments.len() - 1].clone(), value);
}

fn remove_at(tree: &mut Value, segments: &[String]) {
    if segments.is_empty() {
        *tree = Value::Object(Map::new());
        return;
    }
    let mut node = tree;
    for segment in &segments[..segments.len() - 1] {
        match node.get_mut(segment) {
            Some(next) => node = next,
            None => return,
        }
    }
    if let Some(map) = node.as_object_mut() {
        map.remove(segments[segments.len() - 1].as_str());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn set_and_get_roundtrip() {
        let store = Store::in_memory();
        store.set("users/u1", &json!({ "email": "a@b.c", "role": "User" })).unwrap();
        let value = store.get("users/u1").unwrap().unwrap();
        assert_eq!(value["email"], "a@b.c");
        assert_eq!(store.get("users/u2").unwrap(), None);
    }

    #[test]
    fn set_replaces_subtree_entirely() {
        let store = Store::in_memory();
        store.set("teams/t1", &json!({ "name": "Red Team", "capacity": 85 })).unwrap();
        store.set("teams/t1", &json!({ "name": "Blue Team" })).unwrap();
        let value = store.get("teams/t1").unwrap().unwrap();
        assert_eq!(value["name"], "Blue Team");
        assert!(value.get("capacity").is_none());
    }

    #[test]
    fn remove_deletes_subtree() {
        let store = Store::in_memory();
        store.set("users/u1", &json!({ "email": "a@b.c" })).unwrap();
        store.remove("users/u1").unwrap();
        assert_eq!(store.get("users/u1").unwrap(), None);
        // Parent map survives (no pruning of empty parents).
        assert!(store.get("users").unwrap().is_some());
    }

    #[test]
    fn set_null_is_remove() {
        let store = Store::in_memory();
        store.set("users/u1", &json!({ "email": "a@b.c" })).unwrap();
        store.set("users/u1", &Value::Null).unwrap();
        assert_eq!(store.get("users/u1").unwrap(), None);
    }

    #[test]
    fn update_applies_all_patches() {
        let store = Store::in_memory();
        store.set("kanban/todo/tasks/t1", &json!({ "id": "t1" })).unwrap();
        store
            .update(vec![
                ("kanban/todo/tasks/t1".to_string(), Value::Null),
                ("kanban/done/tasks/t1".to_string(), json!({ "id": "t1" })),
            ])
            .unwrap();
        assert_eq!(store.get("kanban/todo/tasks/t1").unwrap(), None);
        assert!(store.get("kanban/done/tasks/t1").unwrap().is_some());
    }

    #[test]
    fn push_keys_are_unique_and_ordered() {
        let store = Store::in_memory();
        let mut keys = Vec::new();
        for i in 0..20 {
            keys.push(store.push("chat/messages/public", &json!({ "n": i })).unwrap());
        }
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, keys, "push keys must be lexically increasing");
    }

    #[test]
    fn invalid_key_is_rejected() {
        let store = Store::in_memory();
        assert!(store.set("users/../secrets", &json!(1)).is_err());
        assert!(store.get("users//u1").is_err());
    }

    #[test]
    fn subscribe_fires_immediately_and_on_change() {
        let store = Store::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let _sub = store
            .subscribe("teams", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.set("teams/t1", &json!({ "name": "Red Team" })).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Writes elsewhere in the tree must not fire the observer.
        store.set("users/u1", &json!({ "email": "a@b.c" })).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ancestor_write_notifies_descendant_observer() {
        let store = Store::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let _sub = store
            .subscribe("kanban/todo/tasks", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store.set("kanban", &json!({ "todo": { "tasks": {} } })).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn batch_update_notifies_observer_once() {
        let store = Store::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let _sub = store
            .subscribe("kanban", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store
            .update(vec![
                ("kanban/todo/tasks/t1".to_string(), Value::Null),
                ("kanban/done/tasks/t1".to_string(), json!({ "id": "t1" })),
            ])
            .unwrap();
        // One initial call + one for the whole batch.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = Store::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let sub = store
            .subscribe("teams", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        drop(sub);

        store.set("teams/t1", &json!({ "name": "Red Team" })).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1, "only the initial call");
    }

    #[test]
    fn observer_receives_subtree_snapshot() {
        let store = Store::in_memory();
        let last: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let sink = last.clone();
        let _sub = store
            .subscribe("users/u1", move |snapshot| {
                *sink.lock().unwrap() = snapshot.cloned();
            })
            .unwrap();
        assert!(last.lock().unwrap().is_none());

        store.set("users/u1/role", &json!("Admin")).unwrap();
        let seen = last.lock().unwrap().clone().unwrap();
        assert_eq!(seen["role"], "Admin");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            store.set("users/u1", &json!({ "email": "a@b.c", "role": "User" })).unwrap();
        }
        let store = Store::open(dir.path()).unwrap();
        let value = store.get("users/u1").unwrap().unwrap();
        assert_eq!(value["email"], "a@b.c");
    }

    #[test]
    fn open_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.get("users").unwrap(), None);
    }
}
