/// Login sessions
///
/// [`SessionStore`] is the process-wide registry of logged-in sessions. Each
/// session maps a random identifier to the ID of the user it belongs to. The
/// identifier is what the browser carries; the web layer signs it into a
/// cookie, so this module never sees an unsigned value from a client.
///
/// A session that has not been used for the idle timeout is expired: it
/// resolves to nobody and is dropped from the map, either on the next lookup
/// or by [`SessionStore::purge_expired`].
///
/// # State Machine
///
/// ```text
/// Anonymous --login--> Authenticated(user) --logout | idle timeout--> Anonymous
/// ```
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todo_shared::auth::session::SessionStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = SessionStore::new(Duration::from_secs(3600));
///
/// let session_id = store.login(7).await;
/// assert_eq!(store.resolve(&session_id).await, Some(7));
///
/// store.logout(&session_id).await;
/// assert_eq!(store.resolve(&session_id).await, None);
/// # }
/// ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};
use tokio::{sync::RwLock, task::JoinHandle, time::Instant};
use tracing::debug;

/// Length of the random session identifier (characters)
const SESSION_ID_LENGTH: usize = 32;

/// Idle time after which a session is expired
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: i64,
    last_seen: Instant,
}

/// Process-wide session registry
///
/// Cloning is cheap; all clones share the same sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    /// Creates an empty store whose sessions expire after `idle_timeout`
    /// without use
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Starts a new session for `user_id` and returns its identifier
    ///
    /// Expired sessions are swept first, so the map never holds more than the
    /// sessions used within the idle timeout plus the new one.
    pub async fn login(&self, user_id: i64) -> String {
        let session_id = generate_session_id();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        sessions.insert(
            session_id.clone(),
            SessionEntry {
                user_id,
                last_seen: now,
            },
        );
        debug!(user_id, live = sessions.len(), "Session started");

        session_id
    }

    /// Ends the session `session_id`
    ///
    /// # Returns
    ///
    /// True if a session was removed
    pub async fn logout(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        if let Some(entry) = removed {
            debug!(user_id = entry.user_id, "Session ended");
        }
        removed.is_some()
    }

    /// Returns the user behind `session_id`, or None if the request is
    /// anonymous
    ///
    /// A live session has its idle clock reset. An expired one is removed.
    pub async fn resolve(&self, session_id: &str) -> Option<i64> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;

        if self.is_expired(entry, now) {
            let user_id = entry.user_id;
            sessions.remove(session_id);
            debug!(user_id, "Session expired");
            return None;
        }

        entry.last_seen = now;
        Some(entry.user_id)
    }

    /// Drops every expired session
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    /// Spawns a task that calls [`purge_expired`](Self::purge_expired) every
    /// `period` until aborted
    pub fn spawn_reaper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    debug!(purged, "Expired sessions purged");
                }
            }
        })
    }

    /// Number of sessions in the map, including expired ones not yet purged
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the map holds no sessions
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_seen) >= self.idle_timeout
    }
}

fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}
