use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::Role;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// PlatformUser
// ---------------------------------------------------------------------------

/// A platform account as read from the store. The raw record holds a
/// free-text role string; it is normalized to [`Role`] on the way out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

fn from_record(id: &str, record: &Value) -> PlatformUser {
    PlatformUser {
        id: id.to_string(),
        email: record
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        role: Role::normalize(record.get("role").and_then(Value::as_str)),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create the store record for a freshly registered identity. Every new
/// account starts as an ordinary user; promotion is a separate admin action.
pub fn register_user(store: &Store, uid: &str, email: &str) -> Result<PlatformUser> {
    let record = json!({ "email": email, "role": Role::User.as_str() });
    store.set(&paths::user(uid), &record)?;
    Ok(from_record(uid, &record))
}

pub fn get_user(store: &Store, uid: &str) -> Result<PlatformUser> {
    let record = store
        .get(&paths::user(uid))?
        .ok_or_else(|| CoreError::UserNotFound(uid.to_string()))?;
    Ok(from_record(uid, &record))
}

pub fn list_users(store: &Store) -> Result<Vec<PlatformUser>> {
    let map: BTreeMap<String, Value> = store.get_as("users")?.unwrap_or_default();
    Ok(map
        .iter()
        .map(|(id, record)| from_record(id, record))
        .collect())
}

pub fn set_role(store: &Store, uid: &str, role: Role) -> Result<()> {
    if !store.exists(&paths::user(uid))? {
        return Err(CoreError::UserNotFound(uid.to_string()));
    }
    store.set(&paths::user_role(uid), &role.as_str())
}

/// Delete a user's store record. The identity credential is left in place —
/// a known inconsistency carried over from the platform this replaces.
/// The configured primary admin can never be deleted.
pub fn delete_user(store: &Store, config: &Config, uid: &str) -> Result<()> {
    let user = get_user(store, uid)?;
    if user.email.eq_ignore_ascii_case(&config.primary_admin_email) {
        return Err(CoreError::PrimaryAdmin);
    }
    store.remove(&paths::user(uid))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
