//! Shared fixtures for unit tests.

use crate::config::Config;
use crate::error::TransportError;
use crate::network::LineSink;
use crate::state::{Matrix, User, UserParams};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A [`LineSink`] that records every line written to it (without CRLF).
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl RecordingSink {
    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drain recorded lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

#[async_trait]
impl LineSink for RecordingSink {
    async fn write_line(&self, line: &str) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.lines.lock().push(line.trim_end_matches("\r\n").to_string());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Matrix with the default configuration and server name `irc.test`.
pub fn test_matrix() -> Arc<Matrix> {
    let mut config = Config::default();
    config.server.name = "irc.test".to_string();
    Arc::new(Matrix::new(&config))
}

/// A registered user together with the sink its lines land in.
pub struct TestUser {
    pub user: Arc<User>,
    pub sink: Arc<RecordingSink>,
}

impl TestUser {
    /// Build a user without registering it.
    pub fn new(nick: &str) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let user = Arc::new(User::new(UserParams {
            nick: nick.to_string(),
            user: nick.to_string(),
            host: "localhost".to_string(),
            sink: sink.clone(),
        }));
        Self { user, sink }
    }

    /// Build a user and insert it into `matrix`.
    pub fn register(matrix: &Matrix, nick: &str) -> Self {
        let test_user = Self::new(nick);
        matrix
            .users
            .insert(Arc::clone(&test_user.user))
            .expect("nickname free in test matrix");
        test_user
    }
}
