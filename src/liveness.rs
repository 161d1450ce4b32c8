//! Liveness background task.
//!
//! Periodically pings idle users and disconnects those that leave a ping
//! unanswered for too long.

use crate::network::send;
use crate::state::Matrix;
use relay_proto::Command;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What one sweep did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Nicknames sent a liveness PING.
    pub pinged: Vec<String>,
    /// Nicknames disconnected for ping timeout.
    pub disconnected: Vec<String>,
}

/// Spawn the liveness background task.
///
/// Runs every `liveness.check_interval` seconds for the life of the process.
pub fn spawn_liveness_task(matrix: Arc<Matrix>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = matrix.liveness.check_interval();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // first tick fires immediately
        info!(period_secs = period.as_secs(), "Liveness monitor started");

        loop {
            interval.tick().await;
            let report = sweep(&matrix, Instant::now()).await;
            if !report.pinged.is_empty() || !report.disconnected.is_empty() {
                debug!(
                    pinged = report.pinged.len(),
                    disconnected = report.disconnected.len(),
                    "Liveness sweep"
                );
            }
        }
    })
}

/// Inspect every registered user once, as of `now`.
pub async fn sweep(matrix: &Matrix, now: Instant) -> SweepReport {
    let idle_timeout = matrix.liveness.idle_timeout();
    let pong_timeout = matrix.liveness.pong_timeout();
    let ping = Command::new("PING").with_params([matrix.server_name()]);
    let mut report = SweepReport::default();

    for user in matrix.users.snapshot() {
        let state = user.snapshot();

        if !state.awaiting_pong && now.saturating_duration_since(state.last_activity) > idle_timeout {
            debug!(nick = %user.nick, "Idle user, sending PING");
            // Marked even on failure so the pong timeout still reaps the user.
            user.record_ping_sent(now);
            match send(user.as_ref(), &ping).await {
                Ok(()) => report.pinged.push(user.nick.clone()),
                Err(e) => warn!(nick = %user.nick, error = %e, "Failed to send liveness PING"),
            }
            continue;
        }

        if state.awaiting_pong && now.saturating_duration_since(state.last_ping_sent) > pong_timeout {
            warn!(nick = %user.nick, "Ping timeout - disconnecting");
            matrix.disconnect_user(&user, "Ping timeout").await;
            report.disconnected.push(user.nick.clone());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::LineSink;
    use crate::test_support::{TestUser, test_matrix};
    use std::time::Duration;

    #[tokio::test]
    async fn active_user_is_left_alone() {
        let matrix = test_matrix();
        let alice = TestUser::register(&matrix, "alice");

        let report = sweep(&matrix, Instant::now() + Duration::from_secs(299)).await;

        assert_eq!(report, SweepReport::default());
        assert!(alice.sink.lines().is_empty());
    }

    #[tokio::test]
    async fn idle_user_is_pinged_once() {
        let matrix = test_matrix();
        let alice = TestUser::register(&matrix, "alice");
        let later = Instant::now() + Duration::from_secs(301);

        let report = sweep(&matrix, later).await;
        assert_eq!(report.pinged, vec!["alice"]);
        assert_eq!(alice.sink.lines(), vec!["PING irc.test"]);
        let state = alice.user.snapshot();
        assert!(state.awaiting_pong);
        assert_eq!(state.last_ping_sent, later);

        // Still within the pong window: no second PING, no disconnect.
        let report = sweep(&matrix, later + Duration::from_secs(30)).await;
        assert_eq!(report, SweepReport::default());
        assert_eq!(alice.sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn unanswered_ping_disconnects() {
        let matrix = test_matrix();
        let alice = TestUser::register(&matrix, "alice");
        let pinged_at = Instant::now() + Duration::from_secs(301);
        sweep(&matrix, pinged_at).await;

        let report = sweep(&matrix, pinged_at + Duration::from_secs(31)).await;

        assert_eq!(report.disconnected, vec!["alice"]);
        assert_eq!(
            alice.sink.lines(),
            vec!["PING irc.test", "ERROR :Ping timeout"]
        );
        assert!(alice.sink.is_closed());
        assert!(matrix.users.find("alice").is_none());
    }

    #[tokio::test]
    async fn answered_ping_keeps_user() {
        let matrix = test_matrix();
        let alice = TestUser::register(&matrix, "alice");
        let pinged_at = Instant::now() + Duration::from_secs(301);
        sweep(&matrix, pinged_at).await;
        alice.user.record_pong(pinged_at + Duration::from_secs(5));

        let report = sweep(&matrix, pinged_at + Duration::from_secs(60)).await;

        assert_eq!(report, SweepReport::default());
        assert!(matrix.users.find("alice").is_some());
    }

    #[tokio::test]
    async fn failed_write_does_not_stop_sweep() {
        let matrix = test_matrix();
        let alice = TestUser::register(&matrix, "alice");
        let bob = TestUser::register(&matrix, "bob");
        alice.sink.close();

        let report = sweep(&matrix, Instant::now() + Duration::from_secs(301)).await;

        assert_eq!(report.pinged, vec!["bob"]);
        assert_eq!(bob.sink.lines(), vec!["PING irc.test"]);
        assert!(alice.user.snapshot().awaiting_pong);
    }
}
