//! Connection lifecycle states.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Why the coordinator entered [`LifecycleState::Failed`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum FailureReason {
    /// Discovery finished without producing any bridge candidates.
    #[strum(serialize = "no bridges found")]
    NoBridgesFound,
    /// Pushlink authentication timed out or lost the bridge.
    #[strum(serialize = "pushlink failed")]
    PushlinkFailed,
    /// The coordinator was driven without a usable bridge configuration.
    #[strum(serialize = "configuration error")]
    ConfigurationError,
}

impl FailureReason {
    /// Whether a fresh discovery attempt can clear this failure.
    ///
    /// A configuration error needs caller intervention first; retrying the
    /// same sequence reproduces it.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FailureReason::ConfigurationError)
    }
}

/// The connection lifecycle of a bridge session.
///
/// Exactly one state is live at a time and every transition goes through the
/// coordinator, so observers always see a consistent ordering.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No session. The starting state, and the state after [`disconnect`].
    ///
    /// [`disconnect`]: crate::BridgeLifecycleCoordinator::disconnect
    Idle,
    /// A bridge search is in flight.
    Discovering,
    /// A candidate was selected and pushlink authentication is running.
    AwaitingPushlink,
    /// Pushlink succeeded; the bridge address is cached.
    Authenticated,
    /// The periodic light refresh is running.
    HeartbeatActive,
    /// The session is paused. The bridge address stays cached, so the
    /// heartbeat can be re-enabled without re-authenticating.
    Disconnected,
    /// A terminal failure; [`start_discovery`] is the retry entry point.
    ///
    /// [`start_discovery`]: crate::BridgeLifecycleCoordinator::start_discovery
    Failed(FailureReason),
}

impl LifecycleState {
    /// Whether [`start_discovery`] is accepted from this state.
    ///
    /// [`start_discovery`]: crate::BridgeLifecycleCoordinator::start_discovery
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{FailureReason, LifecycleState};
    ///
    /// assert!(LifecycleState::Idle.can_start_discovery());
    /// assert!(LifecycleState::Failed(FailureReason::NoBridgesFound).can_start_discovery());
    /// assert!(!LifecycleState::Discovering.can_start_discovery());
    /// ```
    pub fn can_start_discovery(&self) -> bool {
        matches!(
            self,
            LifecycleState::Idle | LifecycleState::Disconnected | LifecycleState::Failed(_)
        )
    }

    /// Whether an authenticated bridge session exists in this state.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            LifecycleState::Authenticated | LifecycleState::HeartbeatActive
        )
    }

    /// Whether this is a terminal failure state.
    pub fn is_failed(&self) -> bool {
        matches!(self, LifecycleState::Failed(_))
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Idle => write!(f, "idle"),
            LifecycleState::Discovering => write!(f, "discovering"),
            LifecycleState::AwaitingPushlink => write!(f, "awaiting pushlink"),
            LifecycleState::Authenticated => write!(f, "authenticated"),
            LifecycleState::HeartbeatActive => write!(f, "heartbeat active"),
            LifecycleState::Disconnected => write!(f, "disconnected"),
            LifecycleState::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn discovery_entry_states() {
        assert!(LifecycleState::Idle.can_start_discovery());
        assert!(LifecycleState::Disconnected.can_start_discovery());
        for reason in FailureReason::iter() {
            assert!(LifecycleState::Failed(reason).can_start_discovery());
        }

        assert!(!LifecycleState::Discovering.can_start_discovery());
        assert!(!LifecycleState::AwaitingPushlink.can_start_discovery());
        assert!(!LifecycleState::Authenticated.can_start_discovery());
        assert!(!LifecycleState::HeartbeatActive.can_start_discovery());
    }

    #[test]
    fn connected_states() {
        assert!(LifecycleState::Authenticated.is_connected());
        assert!(LifecycleState::HeartbeatActive.is_connected());

        assert!(!LifecycleState::Idle.is_connected());
        assert!(!LifecycleState::Disconnected.is_connected());
        assert!(!LifecycleState::Failed(FailureReason::PushlinkFailed).is_connected());
    }

    #[test]
    fn only_configuration_errors_are_permanent() {
        for reason in FailureReason::iter() {
            assert_eq!(
                reason.is_retryable(),
                reason != FailureReason::ConfigurationError
            );
        }
    }

    #[test]
    fn display_includes_failure_reason() {
        assert_eq!(LifecycleState::AwaitingPushlink.to_string(), "awaiting pushlink");
        assert_eq!(
            LifecycleState::Failed(FailureReason::NoBridgesFound).to_string(),
            "failed (no bridges found)"
        );
        assert_eq!(
            LifecycleState::Failed(FailureReason::ConfigurationError).to_string(),
            "failed (configuration error)"
        );
    }
}
