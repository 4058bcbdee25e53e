use uuid::Uuid;

use crate::state::LifecycleState;

/// All error types that can occur while coordinating a bridge connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation was called from a state that does not permit it.
    #[error("operation {operation:?} is not valid in state {state}")]
    InvalidStateTransition {
        state: LifecycleState,
        operation: &'static str,
    },

    /// The local network is unreachable.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The discovery transport failed before producing any candidates.
    #[error("bridge discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Pushlink authentication failed.
    #[error("pushlink authentication failed: {0}")]
    AuthFailed(String),

    /// The coordinator was driven without a usable bridge configuration.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// The specified light is not registered.
    #[error("light {id:?} not found")]
    LightNotFound { id: String },

    /// The specified light is registered but currently unreachable.
    #[error("light {id:?} is unreachable")]
    LightUnreachable { id: String },

    /// A per-light update was rejected by the bridge.
    #[error("update for light {id:?} failed: {reason}")]
    LightUpdate { id: String, reason: String },

    /// The light is already a member of the group.
    #[error("light {id:?} is already a member of group {group}")]
    DuplicateMember { group: Uuid, id: String },
}

impl Error {
    /// Create a new invalid state transition error
    pub fn invalid_transition(state: LifecycleState, operation: &'static str) -> Self {
        Error::InvalidStateTransition { state, operation }
    }

    /// Create a new light not found error
    pub fn light_not_found(id: &str) -> Self {
        Error::LightNotFound { id: id.to_string() }
    }

    /// Create a new light unreachable error
    pub fn light_unreachable(id: &str) -> Self {
        Error::LightUnreachable { id: id.to_string() }
    }

    /// Create a new per-light update error
    pub fn light_update(id: &str, reason: &str) -> Self {
        Error::LightUpdate {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new duplicate member error
    pub fn duplicate_member(group: &Uuid, id: &str) -> Self {
        Error::DuplicateMember {
            group: *group,
            id: id.to_string(),
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
