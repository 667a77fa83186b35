use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::Role;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Admin gate
//
// One predicate gates every admin-only operation: does the caller's stored
// role read as admin? The check is fail-closed — a missing user record,
// missing role field, or non-string value all deny.
// ---------------------------------------------------------------------------

/// The caller's effective role as currently stored.
pub fn stored_role(store: &Store, uid: &str) -> Role {
    let raw = store.get(&paths::user_role(uid)).ok().flatten();
    Role::normalize(raw.as_ref().and_then(Value::as_str))
}

pub fn is_admin(store: &Store, uid: &str) -> bool {
    stored_role(store, uid).is_admin()
}

pub fn require_admin(store: &Store, uid: &str) -> Result<()> {
    if is_admin(store, uid) {
        Ok(())
    } else {
        Err(CoreError::Forbidden)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admin_match_is_case_insensitive() {
        let store = Store::in_memory();
        for role in ["admin", "Admin", "ADMIN"] {
            store
                .set("users/u1", &json!({ "email": "a@x.y", "role": role }))
                .unwrap();
            assert!(is_admin(&store, "u1"), "role {role:?} should grant access");
        }
    }

    #[test]
    fn only_admin_grants_access() {
        let store = Store::in_memory();
        for role in ["user", "administrator", "admin ", ""] {
            store
                .set("users/u1", &json!({ "email": "a@x.y", "role": role }))
                .unwrap();
            assert!(!is_admin(&store, "u1"), "role {role:?} must not grant access");
        }
    }

    #[test]
    fn gate_fails_closed_before_data_arrives() {
        let store = Store::in_memory();
        // No record at all.
        assert!(!is_admin(&store, "u1"));
        assert!(matches!(
            require_admin(&store, "u1").unwrap_err(),
            CoreError::Forbidden
        ));

        // Record without a role field.
        store.set("users/u1", &json!({ "email": "a@x.y" })).unwrap();
        assert!(!is_admin(&store, "u1"));

        // Role that is not a string.
        store.set("users/u1/role", &json!(7)).unwrap();
        assert!(!is_admin(&store, "u1"));
    }
}
