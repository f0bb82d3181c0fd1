//! Session state shared between the auth helpers and whoever embeds them.
//!
//! The in-memory view (token + user) is mirrored to a persistent [`Store`]
//! entry. Both are only ever replaced together, see [`SessionContext::adopt`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{StoreConfig, DEFAULT_TOKEN_KEY};
use crate::error::StorageError;
use crate::models::display_name;
use crate::store::{create_store, MemoryStore, Store};

/// Who is logged in. The empty token with no user means logged out.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: String,
    pub user: Option<Value>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn user_name(&self) -> Option<String> {
        self.user.as_ref().map(display_name)
    }
}

/// Explicit, cloneable handle to one session: its in-memory state plus the
/// store entry the raw token is persisted under.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn Store>,
    key: String,
}

impl SessionContext {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            store,
            key: key.into(),
        }
    }

    /// A session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_TOKEN_KEY)
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StorageError> {
        Ok(Self::new(create_store(config)?, config.key.clone()))
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// A copy of the current in-memory state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// The raw token persisted by a previous session, if any.
    pub fn stored_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get_item(&self.key)?
            .filter(|token| !token.is_empty()))
    }

    /// Persist `token` and make it the current session.
    ///
    /// The state lock is held across the store write, so concurrent adopts
    /// and clears land in the same order in both places. If the write fails
    /// the in-memory state is left exactly as it was.
    pub(crate) fn adopt(
        &self,
        token: &str,
        user: Option<Value>,
    ) -> Result<SessionState, StorageError> {
        let mut state = self.lock();
        self.store.set_item(&self.key, token)?;
        *state = SessionState {
            token: token.to_string(),
            user,
        };
        debug!(
            persistent = self.store.is_persistent(),
            "Adopted session token under key '{}'", self.key
        );
        Ok(state.clone())
    }

    /// Forget the session. The in-memory state is reset even when removing
    /// the stored token fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.lock();
        *state = SessionState::default();
        self.store.remove_item(&self.key)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_adopt_updates_store_and_state() {
        let ctx = SessionContext::in_memory();
        let state = ctx.adopt("a.b.c", Some(json!({"name": "a"}))).unwrap();

        assert!(state.is_logged_in());
        assert_eq!(state.user_name().as_deref(), Some("a"));
        assert_eq!(ctx.snapshot(), state);
        assert_eq!(ctx.stored_token().unwrap().as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = SessionContext::in_memory();
        let other = ctx.clone();
        ctx.adopt("a.b.c", None).unwrap();
        assert_eq!(other.snapshot().token, "a.b.c");
    }

    #[test]
    fn test_clear_resets_everything() {
        let ctx = SessionContext::in_memory();
        ctx.adopt("a.b.c", Some(json!("a@example.com"))).unwrap();
        ctx.clear().unwrap();

        assert_eq!(ctx.snapshot(), SessionState::default());
        assert!(!ctx.snapshot().is_logged_in());
        assert_eq!(ctx.stored_token().unwrap(), None);
    }

    /// Stalls between writing an entry and returning, widening the window
    /// in which a second writer could slip in.
    struct SlowStore {
        inner: MemoryStore,
        delay: Duration,
    }

    impl Store for SlowStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value)?;
            thread::sleep(self.delay);
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)?;
            thread::sleep(self.delay);
            Ok(())
        }
    }

    fn slow_context() -> SessionContext {
        let store = Arc::new(SlowStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(300),
        });
        SessionContext::new(store, "jwt")
    }

    fn assert_consistent(ctx: &SessionContext) {
        let stored = ctx.stored_token().unwrap().unwrap_or_default();
        assert_eq!(stored, ctx.snapshot().token);
    }

    #[test]
    fn test_overlapping_adopts_keep_store_and_state_in_step() {
        let ctx = slow_context();
        let other = ctx.clone();
        let first = thread::spawn(move || {
            other.adopt("first.token.x", None).unwrap();
        });

        thread::sleep(Duration::from_millis(50));
        ctx.adopt("second.token.y", None).unwrap();
        first.join().unwrap();

        assert_consistent(&ctx);
        assert_eq!(ctx.snapshot().token, "second.token.y");
    }

    #[test]
    fn test_clear_overlapping_adopt_keeps_store_and_state_in_step() {
        let ctx = slow_context();
        let other = ctx.clone();
        let adopting = thread::spawn(move || {
            other.adopt("first.token.x", None).unwrap();
        });

        thread::sleep(Duration::from_millis(50));
        ctx.clear().unwrap();
        adopting.join().unwrap();

        assert_consistent(&ctx);
        assert!(!ctx.snapshot().is_logged_in());
    }

    #[test]
    fn test_empty_stored_value_counts_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set_item("jwt", "").unwrap();
        let ctx = SessionContext::new(store, "jwt");
        assert_eq!(ctx.stored_token().unwrap(), None);
    }
}
