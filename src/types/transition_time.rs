//! Transition time for light state changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a light takes to fade to a new state, in deciseconds.
///
/// The bridge counts transitions in tenths of a second; 0 applies the new
/// state instantly. Any `u16` is a valid wire value (the cap works out to
/// a little under two hours).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTime {
    pub(crate) deciseconds: u16,
}

impl TransitionTime {
    /// Create a new instant TransitionTime (0 deciseconds).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::TransitionTime;
    ///
    /// assert_eq!(TransitionTime::new().deciseconds(), 0);
    /// ```
    pub fn new() -> Self {
        TransitionTime { deciseconds: 0 }
    }

    /// Create a TransitionTime from a decisecond count.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::TransitionTime;
    ///
    /// assert_eq!(TransitionTime::from_deciseconds(4).as_duration().as_millis(), 400);
    /// ```
    pub fn from_deciseconds(deciseconds: u16) -> Self {
        TransitionTime { deciseconds }
    }

    /// Create a TransitionTime from a [`Duration`], rounded down to whole
    /// deciseconds.
    ///
    /// Returns `None` if the duration exceeds the wire cap of 6553.5 s.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_bridge_rs::TransitionTime;
    ///
    /// let fade = TransitionTime::from_duration(Duration::from_secs(2)).unwrap();
    /// assert_eq!(fade.deciseconds(), 20);
    /// assert!(TransitionTime::from_duration(Duration::from_secs(7000)).is_none());
    /// ```
    pub fn from_duration(duration: Duration) -> Option<Self> {
        let deciseconds = duration.as_millis() / 100;
        if deciseconds <= u16::MAX as u128 {
            Some(TransitionTime {
                deciseconds: deciseconds as u16,
            })
        } else {
            None
        }
    }

    /// Get the decisecond count.
    pub fn deciseconds(&self) -> u16 {
        self.deciseconds
    }

    /// Get the transition length as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.deciseconds as u64 * 100)
    }

    /// Whether the transition is instant.
    pub fn is_instant(&self) -> bool {
        self.deciseconds == 0
    }
}
