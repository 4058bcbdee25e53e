//! Lifecycle events delivered to observers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::LifecycleState;

/// Callback invoked for every lifecycle event.
///
/// Callbacks run on the coordinator's task after the internal lock is
/// released; blocking in one delays later events but never deadlocks.
pub type EventCallback = Box<dyn Fn(&LifecycleEvent) + Send + Sync + 'static>;

/// Handle for one observer registration.
///
/// Returned by [`subscribe`] and consumed by [`unsubscribe`]; dropping the
/// id without unsubscribing leaves the observer registered.
///
/// [`subscribe`]: crate::BridgeLifecycleCoordinator::subscribe
/// [`unsubscribe`]: crate::BridgeLifecycleCoordinator::unsubscribe
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) Uuid);

/// Everything the coordinator reports to the outside world.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The lifecycle state changed.
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
    },
    /// The session cannot continue without the user (retry a failed search,
    /// press the link button again). `title` and `message` are ready for
    /// display; the coordinator never renders them itself.
    UserActionRequired { title: String, message: String },
    /// Pushlink is still waiting for the link button; the wait window was
    /// re-armed.
    PushlinkProgress,
    /// A heartbeat refresh replaced the light registry.
    LightsUpdated { lights: usize },
}

impl LifecycleEvent {
    pub(crate) fn state_changed(from: LifecycleState, to: LifecycleState) -> Self {
        LifecycleEvent::StateChanged { from, to }
    }

    pub(crate) fn user_action(title: &str, message: &str) -> Self {
        LifecycleEvent::UserActionRequired {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_changed_carries_both_ends() {
        let event = LifecycleEvent::state_changed(
            LifecycleState::Idle,
            LifecycleState::Discovering,
        );
        assert_eq!(
            event,
            LifecycleEvent::StateChanged {
                from: LifecycleState::Idle,
                to: LifecycleState::Discovering,
            }
        );
    }

    #[test]
    fn events_serialize_with_their_payloads() {
        let json = serde_json::to_value(LifecycleEvent::LightsUpdated { lights: 4 }).unwrap();
        assert_eq!(json["LightsUpdated"]["lights"], 4);

        let json = serde_json::to_value(LifecycleEvent::user_action("Title", "Message")).unwrap();
        assert_eq!(json["UserActionRequired"]["title"], "Title");
    }
}
