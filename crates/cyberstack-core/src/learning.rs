use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::types::CertStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Certification
// ---------------------------------------------------------------------------

/// A tracked certification, owned per-user. The store record omits `id`;
/// it is the push key, injected on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub status: CertStatus,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationDraft {
    pub name: String,
    pub status: CertStatus,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
}

impl CertificationDraft {
    /// Form validation: a name is always required; In Progress carries a
    /// progress percentage clamped to 0–100; Planned and Completed require
    /// a date.
    fn normalize(self) -> Result<Certification> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::CertificationNameRequired);
        }
        let date = self.date.unwrap_or_default().trim().to_string();
        if self.status.requires_date() && date.is_empty() {
            return Err(CoreError::CertificationDateRequired(
                self.status.to_string(),
            ));
        }
        Ok(Certification {
            id: String::new(),
            name,
            status: self.status,
            progress: self.progress.unwrap_or(0).min(100),
            date,
        })
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn list_certifications(store: &Store, uid: &str) -> Result<Vec<Certification>> {
    let map: BTreeMap<String, Certification> =
        store.get_as(&paths::certifications(uid))?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(key, mut cert)| {
            cert.id = key;
            cert
        })
        .collect())
}

pub fn add_certification(
    store: &Store,
    uid: &str,
    draft: CertificationDraft,
) -> Result<Certification> {
    let mut cert = draft.normalize()?;
    let key = store.push(&paths::certifications(uid), &cert)?;
    cert.id = key;
    Ok(cert)
}

pub fn update_certification(
    store: &Store,
    uid: &str,
    id: &str,
    draft: CertificationDraft,
) -> Result<Certification> {
    if !store.exists(&paths::certification(uid, id))? {
        return Err(CoreError::CertificationNotFound(id.to_string()));
    }
    let mut cert = draft.normalize()?;
    store.set(&paths::certification(uid, id), &cert)?;
    cert.id = id.to_string();
    Ok(cert)
}

pub fn delete_certification(store: &Store, uid: &str, id: &str) -> Result<()> {
    if !store.exists(&paths::certification(uid, id))? {
        return Err(CoreError::CertificationNotFound(id.to_string()));
    }
    store.remove(&paths::certification(uid, id))
}

// ---------------------------------------------------------------------------
// Learning path persistence
//
// Generated learning paths are ephemeral AI output, stored verbatim as
// returned by the flow and replaced wholesale on regeneration.
// ---------------------------------------------------------------------------

pub fn save_learning_path(store: &Store, uid: &str, path: &Value) -> Result<()> {
    store.set(&paths::learning_path(uid), path)
}

pub fn load_learning_path(store: &Store, uid: &str) -> Result<Option<Value>> {
    store.get(&paths::learning_path(uid))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
