//! Strobe rate for flashing effects.

use std::time::Duration;

/// How many strobe frames to apply per second.
///
/// Must be positive and should not exceed 10 per second; the bridge starts
/// dropping commands beyond that, so faster rates are rejected outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrobeRate {
    per_second: f64,
}

impl StrobeRate {
    const MAX: f64 = 10.0;

    /// Create a new StrobeRate with the given frames per second.
    ///
    /// Returns `None` unless `0 < per_second <= 10`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::StrobeRate;
    ///
    /// assert!(StrobeRate::create(0.0).is_none());
    /// assert!(StrobeRate::create(2.5).is_some());
    /// assert!(StrobeRate::create(10.0).is_some());
    /// assert!(StrobeRate::create(10.1).is_none());
    /// assert!(StrobeRate::create(f64::NAN).is_none());
    /// ```
    pub fn create(per_second: f64) -> Option<Self> {
        if per_second > 0.0 && per_second <= Self::MAX {
            Some(StrobeRate { per_second })
        } else {
            None
        }
    }

    /// Get the frames-per-second value.
    pub fn per_second(&self) -> f64 {
        self.per_second
    }

    /// Get the pause between strobe frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::StrobeRate;
    ///
    /// let rate = StrobeRate::create(4.0).unwrap();
    /// assert_eq!(rate.interval().as_millis(), 250);
    /// ```
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.per_second)
    }
}
