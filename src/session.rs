use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::UserProfile;
use crate::storage::{KeyValueStore, MemoryStore, StoreState};

/// Persisted key holding the opaque session token.
pub const TOKEN_KEY: &str = "token";
/// Persisted key holding the JSON-serialized cached profile.
pub const USER_KEY: &str = "userInfo";

/// Session
///
/// The credential store: the single owner of the session token and the cached
/// user profile. It is created once, handed explicitly to every client, policy
/// and guard call, and torn down with [`Session::clear`].
///
/// Store failures never escape: reads degrade to "no session", writes are
/// logged and dropped.
///
/// Two counters guard against out-of-order responses:
/// - `epoch` changes on every login/logout/forced expiry. The pipeline
///   captures it when a call is issued and discards the response if it no
///   longer matches.
/// - profile writes carry a sequence number taken at issue time; a response
///   issued earlier than one already applied is ignored.
pub struct Session {
    store: StoreState,
    epoch: AtomicU64,
    profile_seq: AtomicU64,
    // Highest profile sequence applied so far. Held across the store write so
    // the compare and the write happen as one step.
    applied_profile_seq: Mutex<u64>,
}

/// SessionState
///
/// Shared handle passed into the pipeline, resource clients and the guard.
pub type SessionState = Arc<Session>;

impl Session {
    pub fn new(store: StoreState) -> Self {
        Self {
            store,
            epoch: AtomicU64::new(0),
            profile_seq: AtomicU64::new(0),
            applied_profile_seq: Mutex::new(0),
        }
    }

    /// An empty session over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn shared(store: StoreState) -> SessionState {
        Arc::new(Self::new(store))
    }

    // --- Credential Store contract ---

    pub fn get_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("session store read failed, treating as logged out: {}", e);
                None
            }
        }
    }

    /// The cached profile. A stored value that does not parse is treated as
    /// absent, the same as no value at all.
    pub fn get_user(&self) -> Option<UserProfile> {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("session store read failed, treating as no profile: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("cached profile is malformed, ignoring it: {}", e);
                None
            }
        }
    }

    /// Writes token and profile together and starts a new epoch. Passing no
    /// user removes any previously cached profile so a stale identity never
    /// outlives its token.
    pub fn set_session(&self, token: &str, user: Option<&UserProfile>) {
        self.write(TOKEN_KEY, token);
        match user {
            Some(user) => self.write_user(user),
            None => self.delete(USER_KEY),
        }
        self.bump_epoch();
        tracing::info!(user_id = user.map(|u| u.id), "session established");
    }

    /// Removes both keys and starts a new epoch.
    pub fn clear_session(&self) {
        self.delete(TOKEN_KEY);
        self.delete(USER_KEY);
        self.bump_epoch();
        tracing::info!("session cleared");
    }

    /// Teardown alias used by embedders at shutdown.
    pub fn clear(&self) {
        self.clear_session();
    }

    /// Overwrites only the cached profile. The token and epoch are untouched.
    pub fn set_user(&self, user: &UserProfile) {
        self.write_user(user);
    }

    // --- Ordering helpers used by the pipeline and resource clients ---

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Reserves the next profile sequence number. Call when the request is
    /// issued, not when it completes.
    pub fn next_profile_seq(&self) -> u64 {
        self.profile_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies a profile response unless a later-issued one already landed.
    /// Returns whether the cache was written.
    pub fn apply_profile(&self, seq: u64, user: &UserProfile) -> bool {
        let mut applied = self.applied_profile_seq.lock();
        if seq <= *applied {
            tracing::debug!(seq, applied = *applied, "ignoring out-of-order profile response");
            return false;
        }
        *applied = seq;
        self.write_user(user);
        true
    }

    fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn write_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => self.write(USER_KEY, &raw),
            Err(e) => tracing::warn!("failed to serialize profile: {}", e),
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "session store write failed: {}", e);
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, "session store delete failed: {}", e);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.get_token().is_some())
            .field("epoch", &self.epoch())
            .finish()
    }
}
