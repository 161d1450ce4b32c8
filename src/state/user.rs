//! User-related types and state.

use super::dashmap_ext::DashMapExt;
use crate::error::{StateError, TransportError};
use crate::network::LineSink;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use relay_proto::UserModes;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// A connected, registered user.
///
/// Identity fields are fixed at registration. Modes, liveness and the
/// joined-channel set sit behind a short-lived mutex that is never held
/// across an `.await`.
pub struct User {
    pub nick: String,
    pub user: String,
    pub host: String,
    /// Unique session identifier for this connection (guards registry removal).
    pub session_id: Uuid,
    sink: Arc<dyn LineSink>,
    state: Mutex<UserState>,
}

/// Mutable per-user state.
#[derive(Debug, Clone)]
pub struct UserState {
    pub modes: UserModes,
    /// Last time the user proved it was alive (registration or matching PONG).
    pub last_activity: Instant,
    /// When the outstanding liveness PING was sent.
    pub last_ping_sent: Instant,
    pub awaiting_pong: bool,
    /// Channels this user joined (names only; channels own membership).
    pub channels: BTreeSet<String>,
}

/// Parameters for creating a new User.
pub struct UserParams {
    pub nick: String,
    pub user: String,
    pub host: String,
    pub sink: Arc<dyn LineSink>,
}

impl User {
    /// Create a new user, marked active now.
    pub fn new(params: UserParams) -> Self {
        let UserParams {
            nick,
            user,
            host,
            sink,
        } = params;
        let now = Instant::now();
        Self {
            nick,
            user,
            host,
            session_id: Uuid::new_v4(),
            sink,
            state: Mutex::new(UserState {
                modes: UserModes::NONE,
                last_activity: now,
                last_ping_sent: now,
                awaiting_pong: false,
                channels: BTreeSet::new(),
            }),
        }
    }

    /// Identity prefix used on lines this user originates (`nick!user@host`).
    pub fn prefix(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }

    /// Copy of the current mutable state.
    pub fn snapshot(&self) -> UserState {
        self.state.lock().clone()
    }

    pub fn modes(&self) -> UserModes {
        self.state.lock().modes
    }

    pub fn add_modes(&self, modes: UserModes) {
        self.state.lock().modes.insert(modes);
    }

    /// A matching PONG arrived: clear the outstanding ping and refresh activity.
    pub fn record_pong(&self, now: Instant) {
        let mut state = self.state.lock();
        state.awaiting_pong = false;
        state.last_activity = now;
    }

    /// A liveness PING was just sent.
    pub fn record_ping_sent(&self, now: Instant) {
        let mut state = self.state.lock();
        state.awaiting_pong = true;
        state.last_ping_sent = now;
    }

    pub fn join_channel(&self, channel: &str) {
        self.state.lock().channels.insert(channel.to_string());
    }

    /// True when both handles refer to the same connection.
    pub fn same_session(&self, other: &User) -> bool {
        self.session_id == other.session_id
    }
}

#[async_trait]
impl LineSink for User {
    async fn write_line(&self, line: &str) -> Result<(), TransportError> {
        self.sink.write_line(line).await
    }

    fn close(&self) {
        self.sink.close();
    }

    fn is_closed(&self) -> bool {
        self.sink.is_closed()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("nick", &self.nick)
            .field("user", &self.user)
            .field("host", &self.host)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// Concurrent nickname → user map.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: DashMap<String, Arc<User>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user under its nickname. Fails if the nickname is taken.
    pub fn insert(&self, user: Arc<User>) -> Result<(), StateError> {
        match self.users.entry(user.nick.clone()) {
            Entry::Occupied(_) => Err(StateError::NicknameInUse(user.nick.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    /// Look up a user that must exist.
    pub fn get(&self, nick: &str) -> Result<Arc<User>, StateError> {
        self.find(nick)
            .ok_or_else(|| StateError::NoSuchNick(nick.to_string()))
    }

    pub fn find(&self, nick: &str) -> Option<Arc<User>> {
        self.users.get_cloned(nick)
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.users.contains_key(nick)
    }

    /// Remove `user` if its nickname still maps to the same session.
    ///
    /// Returns false when the entry is already gone or now belongs to a
    /// newer connection using the same nickname.
    pub fn remove_session(&self, user: &User) -> bool {
        self.users
            .remove_if(&user.nick, |_, current| current.same_session(user))
            .is_some()
    }

    /// Every registered user at this instant.
    pub fn snapshot(&self) -> Vec<Arc<User>> {
        self.users.values_cloned()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
