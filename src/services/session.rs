//! Session token store.
//!
//! DESIGN
//! ======
//! Sessions are opaque 32-byte hex tokens held in memory, each optionally
//! bound to a user id (dev sessions have none). Every session expires after
//! the store's TTL; expired entries are invisible to lookups and are purged
//! whenever a new session is created. Restarting the server logs everyone
//! out.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Length of a session token in hex characters.
pub const TOKEN_LEN: usize = 64;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Whether `token` has the shape produced by [`generate_token`].
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Owning user; `None` for dev sessions.
    pub user_id: Option<Uuid>,
    expires_at: Instant,
}

impl Session {
    fn is_live_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Shared map of session tokens. Clones share the same map.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    /// Create a session, returning its token.
    pub async fn create(&self, user_id: Option<Uuid>) -> String {
        self.create_at(user_id, Instant::now()).await
    }

    pub(crate) async fn create_at(&self, user_id: Option<Uuid>, now: Instant) -> String {
        let token = generate_token();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| session.is_live_at(now));
        sessions.insert(token.clone(), Session { user_id, expires_at: now + self.ttl });
        token
    }

    /// Look up a live session.
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.get_at(token, Instant::now()).await
    }

    pub(crate) async fn get_at(&self, token: &str, now: Instant) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(token)
            .copied()
            .filter(|session| session.is_live_at(now))
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.get(token).await.is_some()
    }

    /// Delete a session. Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of stored sessions, including expired ones not yet purged.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
