//! Waiting for the synchronization marker
//!
//! Responses carry no request correlation, so the end of a burst of GETs is
//! detected by queueing one extra `@SYS:VERSION=?` after it. The wait for its
//! response is bounded by a timeout that grows with the burst length.

use crate::connection::LinkState;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use ynca_core::{YncaError, YncaResult};

/// Timeout parameters for discovery and subunit initialization
///
/// The wait is `base_timeout + commands * command_spacing * margin_factor`.
/// Receivers that just powered on answer well behind the nominal spacing,
/// hence a margin of 5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitSettings {
    pub base_timeout: Duration,
    pub margin_factor: f64,
}

impl Default for InitSettings {
    fn default() -> Self {
        Self {
            base_timeout: Duration::from_secs(2),
            margin_factor: 5.0,
        }
    }
}

impl InitSettings {
    /// Whether `margin_factor` is a finite number of at least 1
    pub fn is_valid(&self) -> bool {
        self.margin_factor.is_finite() && self.margin_factor >= 1.0
    }

    /// Timeout for a burst of `commands` lines
    ///
    /// An invalid margin factor counts as 1.
    pub fn timeout_for(&self, commands: u64, command_spacing: Duration) -> Duration {
        let margin = if self.is_valid() {
            self.margin_factor
        } else {
            1.0
        };
        let scaled = command_spacing.as_secs_f64() * margin * commands as f64;
        let scaled = Duration::try_from_secs_f64(scaled).unwrap_or(Duration::MAX);
        self.base_timeout.saturating_add(scaled)
    }
}

/// Wait until `marker` fires
///
/// Fails with `InitializationFailed` on timeout, or as soon as the link
/// leaves the connected state. `what` names the waiting party in the error.
pub(crate) async fn wait_for_marker(
    marker: oneshot::Receiver<()>,
    mut link: watch::Receiver<LinkState>,
    timeout: Duration,
    what: &str,
) -> YncaResult<()> {
    let link_lost = async move {
        // An error means the connection itself is gone
        let _ = link.wait_for(|state| *state != LinkState::Connected).await;
    };

    tokio::select! {
        result = tokio::time::timeout(timeout, marker) => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(YncaError::InitializationFailed(format!(
                "{}: synchronization was abandoned",
                what
            ))),
            Err(_) => Err(YncaError::InitializationFailed(format!(
                "{}: no synchronization within {:?}",
                what, timeout
            ))),
        },
        _ = link_lost => Err(YncaError::InitializationFailed(format!(
            "{}: connection lost while waiting for synchronization",
            what
        ))),
    }
}
