//! Brightness control for Hue lights.

use serde::{Deserialize, Serialize};

/// Brightness level on the bridge scale, from 1 to 254.
///
/// 1 is the dimmest a light can be while still emitting; turning a light
/// off is a separate switch, not brightness 0.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MIN: u8 = 1;
    const MAX: u8 = 254;

    /// Create a new Brightness at the maximum (254).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert_eq!(Brightness::new().value(), 254);
    /// ```
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    /// Get the brightness value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Create a new Brightness with the given value.
    ///
    /// Returns `None` if value is outside the valid range (1-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert!(Brightness::create(0).is_none());
    /// assert!(Brightness::create(1).is_some());
    /// assert!(Brightness::create(254).is_some());
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Create a Brightness, using the maximum if value is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Brightness;
    ///
    /// assert_eq!(Brightness::create_or(0).value(), 254);
    /// assert_eq!(Brightness::create_or(120).value(), 120);
    /// ```
    pub fn create_or(value: u8) -> Self {
        if Self::is_valid(value) {
            Brightness { value }
        } else {
            Self::new()
        }
    }

    fn is_valid(value: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}
