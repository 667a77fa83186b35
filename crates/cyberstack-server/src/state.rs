use crate::error::AppError;
use axum::http::HeaderMap;
use cyberstack_core::config::Config;
use cyberstack_core::{CoreError, Store, Subscription};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Shared application state passed to all route handlers.
///
/// Sessions are opaque bearer tokens held in memory: sign-in mints one,
/// sign-out forgets it, a restart signs everyone out.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub store: Store,
    pub config: Arc<Config>,
    pub event_tx: broadcast::Sender<()>,
    sessions: Arc<Mutex<HashMap<String, String>>>,
    // Keeps the store → SSE bridge registered for the server's lifetime.
    _store_events: Arc<Subscription>,
}

impl AppState {
    pub fn new(root: PathBuf) -> anyhow::Result<Self> {
        let store = Store::open(&root)?;
        let config = Config::load(&root)?;

        // Bridge store changes into the SSE broadcast: any write anywhere
        // in the tree fans out as one `update` event.
        let (tx, _) = broadcast::channel(64);
        let bridge = tx.clone();
        let store_events = store.subscribe("", move |_| {
            let _ = bridge.send(());
        })?;

        Ok(Self {
            root,
            store,
            config: Arc::new(config),
            event_tx: tx,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            _store_events: Arc::new(store_events),
        })
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    pub fn create_session(&self, uid: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .lock()
            .expect("infallible: session map lock")
            .insert(token.clone(), uid.to_string());
        token
    }

    pub fn revoke_session(&self, token: &str) {
        self.sessions
            .lock()
            .expect("infallible: session map lock")
            .remove(token);
    }

    /// The signed-in user, if the request carries a live bearer token.
    pub fn current_uid(&self, headers: &HeaderMap) -> Option<String> {
        let token = bearer_token(headers)?;
        self.sessions
            .lock()
            .expect("infallible: session map lock")
            .get(token)
            .cloned()
    }

    pub fn require_uid(&self, headers: &HeaderMap) -> Result<String, AppError> {
        self.current_uid(headers)
            .ok_or_else(|| AppError(CoreError::Unauthorized.into()))
    }

    /// Admin gate: re-checks the stored role on every call, fail-closed.
    pub fn require_admin(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let uid = self.require_uid(headers)?;
        cyberstack_core::access::require_admin(&self.store, &uid)?;
        Ok(uid)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
