//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

/// Hue and Saturation color representation on the bridge scale.
///
/// - Hue: the color angle, where the full `u16` range maps onto the color
///   wheel (0 is red, 21845 is green, 43690 is blue, 65535 wraps to red)
/// - Saturation: the intensity of the color, from 0 (white) to 254 (full)
///
/// This is the native color space of the bridge API and maps directly onto
/// the wire fields.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HueSaturation {
    pub(crate) hue: u16,
    pub(crate) saturation: u8,
}

impl HueSaturation {
    const MAX_SATURATION: u8 = 254;

    /// Create a new HueSaturation with the given values.
    ///
    /// Every `u16` hue is a valid angle; saturation must be 0-254.
    ///
    /// Returns `None` if saturation is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// assert!(HueSaturation::create(0, 254).is_some());     // Red, fully saturated
    /// assert!(HueSaturation::create(21845, 127).is_some()); // Washed-out green
    /// assert!(HueSaturation::create(180, 255).is_none());   // Saturation past the scale
    /// ```
    pub fn create(hue: u16, saturation: u8) -> Option<Self> {
        if saturation <= Self::MAX_SATURATION {
            Some(HueSaturation { hue, saturation })
        } else {
            None
        }
    }

    /// Get the hue value.
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Get the saturation value.
    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Create a HueSaturation from degrees on the color wheel.
    ///
    /// Degrees beyond 360 wrap around. Saturation is still on the 0-254
    /// bridge scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// let green = HueSaturation::from_degrees(120, 254).unwrap();
    /// assert_eq!(green.hue(), 21845);
    /// ```
    pub fn from_degrees(degrees: u32, saturation: u8) -> Option<Self> {
        let hue = ((degrees % 360) as u64 * u16::MAX as u64 / 360) as u16;
        Self::create(hue, saturation)
    }
}
