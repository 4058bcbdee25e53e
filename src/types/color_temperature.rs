//! Color temperature control.

use serde::{Deserialize, Serialize};

/// Color temperature in mireds, with valid values from 153 to 500.
///
/// The bridge speaks mireds (micro reciprocal degrees), the inverse of the
/// Kelvin scale: lower mired values are cooler (more blue) and higher
/// values are warmer. Typical values:
/// - 153 mired: Cool daylight (~6500K)
/// - 370 mired: Warm white (~2700K)
/// - 500 mired: Candlelight (~2000K)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorTemperature {
    pub(crate) mired: u16,
}

// Derived Default would sit at 0 mired, outside the valid range, and
// kelvin() divides by the mired value.
impl Default for ColorTemperature {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTemperature {
    const MIN: u16 = 153;
    const MAX: u16 = 500;

    /// Create a new ColorTemperature at the coolest value (153 mired).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::ColorTemperature;
    ///
    /// assert_eq!(ColorTemperature::new().mired(), 153);
    /// ```
    pub fn new() -> Self {
        ColorTemperature { mired: Self::MIN }
    }

    /// Get the mired value.
    pub fn mired(&self) -> u16 {
        self.mired
    }

    /// Get the approximate temperature in Kelvin.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::ColorTemperature;
    ///
    /// assert_eq!(ColorTemperature::create(500).unwrap().kelvin(), 2000);
    /// assert_eq!(ColorTemperature::create(153).unwrap().kelvin(), 6535);
    /// ```
    pub fn kelvin(&self) -> u16 {
        (1_000_000 / self.mired as u32) as u16
    }

    /// Create a new ColorTemperature with the given mired value.
    ///
    /// Returns `None` if value is outside the valid range (153-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::ColorTemperature;
    ///
    /// assert!(ColorTemperature::create(152).is_none());
    /// assert!(ColorTemperature::create(153).is_some());
    /// assert!(ColorTemperature::create(500).is_some());
    /// assert!(ColorTemperature::create(501).is_none());
    /// ```
    pub fn create(mired: u16) -> Option<Self> {
        if Self::is_valid(mired) {
            Some(ColorTemperature { mired })
        } else {
            None
        }
    }

    /// Create a ColorTemperature from a Kelvin value.
    ///
    /// Returns `None` if the converted value falls outside 153-500 mired
    /// (roughly 2000K-6535K).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::ColorTemperature;
    ///
    /// assert_eq!(ColorTemperature::from_kelvin(2700).unwrap().mired(), 370);
    /// assert!(ColorTemperature::from_kelvin(1500).is_none());
    /// assert!(ColorTemperature::from_kelvin(8000).is_none());
    /// ```
    pub fn from_kelvin(kelvin: u16) -> Option<Self> {
        if kelvin == 0 {
            return None;
        }
        Self::create((1_000_000 / kelvin as u32).min(u16::MAX as u32) as u16)
    }

    fn is_valid(mired: u16) -> bool {
        (Self::MIN..=Self::MAX).contains(&mired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_valid_temperature() {
        let default = ColorTemperature::default();
        assert_eq!(default, ColorTemperature::new());
        assert_eq!(default.kelvin(), 6535);
    }
}
