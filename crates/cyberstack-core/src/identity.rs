use crate::error::{CoreError, Result};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity provider
//
// Email/password credentials, consumed by callers as opaque calls that
// return a user id. Records live in `.cyberstack/credentials.yaml` as
// salted SHA-256 digests. Sessions are the caller's concern: sign-out is
// just forgetting the token that sign-in produced.
// ---------------------------------------------------------------------------

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialRecord {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: Vec<CredentialRecord>,
}

pub struct IdentityStore {
    path: PathBuf,
    records: Vec<CredentialRecord>,
}

impl IdentityStore {
    /// Load credentials from `root`; an absent file is an empty registry.
    pub fn load(root: &Path) -> Result<IdentityStore> {
        let path = paths::credentials_path(root);
        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let file: CredentialFile = serde_yaml::from_str(&data)?;
            file.users
        } else {
            Vec::new()
        };
        Ok(IdentityStore { path, records })
    }

    /// Register a new account and return its generated user id.
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<String> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(CoreError::WeakPassword);
        }
        if self.find(email).is_some() {
            return Err(CoreError::EmailExists);
        }
        let uid = Uuid::new_v4().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        self.records.push(CredentialRecord {
            uid: uid.clone(),
            email: email.to_string(),
            salt: salt.clone(),
            password_hash: digest(&salt, password),
        });
        self.save()?;
        Ok(uid)
    }

    /// Check a credential pair and return the user id it belongs to. A
    /// wrong password and an unknown email are indistinguishable to the
    /// caller.
    pub fn verify(&self, email: &str, password: &str) -> Result<String> {
        let record = self.find(email).ok_or(CoreError::InvalidCredential)?;
        if digest(&record.salt, password) != record.password_hash {
            return Err(CoreError::InvalidCredential);
        }
        Ok(record.uid.clone())
    }

    pub fn email_of(&self, uid: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.uid == uid)
            .map(|r| r.email.as_str())
    }

    fn find(&self, email: &str) -> Option<&CredentialRecord> {
        self.records
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(email))
    }

    fn save(&self) -> Result<()> {
        let file = CredentialFile {
            users: self.records.clone(),
        };
        let data = serde_yaml::to_string(&file)?;
        io::atomic_write(&self.path, data.as_bytes())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
