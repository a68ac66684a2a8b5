//! In-memory presence registry.
//!
//! One `RwLock<HashMap>` per process: lookups (every emit) vastly outnumber
//! connect/disconnect, so reads stay concurrent. Map operations never
//! suspend across a store call.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::ports::{ConnectionHandle, PresenceRegistry};

/// Process-local registry of online users.
///
/// Nothing here survives a restart; clients repopulate the map as they
/// reconnect.
pub struct InMemoryPresenceRegistry {
    online: RwLock<HashMap<UserId, ConnectionHandle>>,
}

impl InMemoryPresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            online: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn connect(&self, handle: ConnectionHandle) {
        let user_id = handle.user_id().clone();
        let replaced = self
            .online
            .write()
            .await
            .insert(user_id.clone(), handle)
            .is_some();

        if replaced {
            tracing::debug!(user_id = %user_id, "replaced stale connection on reconnect");
        } else {
            tracing::debug!(user_id = %user_id, "user joined");
        }
    }

    async fn disconnect(&self, handle: &ConnectionHandle) {
        let mut online = self.online.write().await;

        // Only evict the mapping this handle still owns. A disconnect that
        // arrives after the same user reconnected must not tear down the
        // fresh connection.
        if let Some(current) = online.get(handle.user_id()) {
            if current.connection_id() == handle.connection_id() {
                online.remove(handle.user_id());
                tracing::debug!(user_id = %handle.user_id(), "user disconnected");
            }
        }
    }

    async fn lookup(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.online.read().await.get(user_id).cloned()
    }

    async fn online_count(&self) -> usize {
        self.online.read().await.len()
    }
}
