//! Event history tracking for debugging and diagnostics.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::events::LifecycleEvent;

/// A recorded lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: LifecycleEvent,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of the most recent lifecycle events.
#[derive(Debug, Clone)]
pub struct EventHistory {
    entries: Vec<EventRecord>,
    last_error: Option<String>,
    start_time: Instant,
    max_entries: usize,
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_error: None,
            start_time: Instant::now(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(&mut self, event: &LifecycleEvent) {
        self.entries.push(EventRecord {
            event: event.clone(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> &[EventRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LifecycleState;

    #[test]
    fn test_record_event() {
        let mut history = EventHistory::new();
        history.record(&LifecycleEvent::state_changed(
            LifecycleState::Idle,
            LifecycleState::Discovering,
        ));

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_record_error() {
        let mut history = EventHistory::new();
        history.record_error("bridge stopped answering");
        assert_eq!(history.last_error(), Some("bridge stopped answering"));
    }

    #[test]
    fn test_max_entries() {
        let mut history = EventHistory::with_max_entries(2);
        for lights in 0..5 {
            history.record(&LifecycleEvent::LightsUpdated { lights });
        }

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.entries()[0].event,
            LifecycleEvent::LightsUpdated { lights: 3 }
        );
    }

    #[test]
    fn test_clear() {
        let mut history = EventHistory::new();
        history.record(&LifecycleEvent::PushlinkProgress);
        history.record_error("boom");

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last_error(), None);
    }
}
