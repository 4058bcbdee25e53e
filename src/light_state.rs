//! Light state descriptors.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, ColorTemperature, HueSaturation, TransitionTime};

/// A sparse light state: only the attributes that are set are sent or
/// merged.
///
/// The same shape serves both directions. As a desired state it carries the
/// attributes of a single update command; as a reported state it carries
/// what the bridge last said about a light. Serialization uses the bridge's
/// wire field names.
///
/// # Creating states
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use hue_bridge_rs::{Brightness, LightState};
///    let state = LightState::from(&Brightness::create(120).unwrap());
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use hue_bridge_rs::{HueSaturation, LightState, TransitionTime};
///    let mut state = LightState::new();
///    state.set_on(true);
///    state.set_hue_saturation(&HueSaturation::create(21845, 200).unwrap());
///    state.set_transition_time(&TransitionTime::from_deciseconds(10));
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LightState {
    pub(crate) on: Option<bool>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    #[serde(rename = "ct")]
    pub(crate) color_temperature: Option<u16>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
}

impl LightState {
    /// Create a new empty state.
    ///
    /// At least one attribute must be set for the state to be a valid
    /// command.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::LightState;
    ///
    /// let state = LightState::new();
    /// assert_eq!(state.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this state contains at least one commandable attribute.
    ///
    /// Note: a transition time alone is not valid; it shapes a change but
    /// commands nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{LightState, TransitionTime};
    ///
    /// let mut state = LightState::new();
    ///
    /// state.set_transition_time(&TransitionTime::from_deciseconds(10));
    /// assert_eq!(state.is_valid(), false);
    ///
    /// state.set_on(false);
    /// assert_eq!(state.is_valid(), true);
    /// ```
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.brightness.is_some()
            || self.hue.is_some()
            || self.saturation.is_some()
            || self.color_temperature.is_some()
    }

    /// Set the on/off switch.
    pub fn set_on(&mut self, on: bool) {
        self.on = Some(on);
    }

    /// Set the brightness level.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{Brightness, LightState};
    ///
    /// let mut state = LightState::new();
    /// state.set_brightness(&Brightness::create(200).unwrap());
    /// assert_eq!(state.is_valid(), true);
    /// ```
    pub fn set_brightness(&mut self, brightness: &Brightness) {
        self.brightness = Some(brightness.value);
    }

    /// Set the color by hue and saturation.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{HueSaturation, LightState};
    ///
    /// let mut state = LightState::new();
    /// state.set_hue_saturation(&HueSaturation::create(0, 254).unwrap());
    /// assert_eq!(state.is_valid(), true);
    /// ```
    pub fn set_hue_saturation(&mut self, hs: &HueSaturation) {
        self.hue = Some(hs.hue);
        self.saturation = Some(hs.saturation);
    }

    /// Set the color temperature.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{ColorTemperature, LightState};
    ///
    /// let mut state = LightState::new();
    /// state.set_color_temperature(&ColorTemperature::create(370).unwrap());
    /// assert_eq!(state.is_valid(), true);
    /// ```
    pub fn set_color_temperature(&mut self, ct: &ColorTemperature) {
        self.color_temperature = Some(ct.mired);
    }

    /// Set the transition time for this change.
    pub fn set_transition_time(&mut self, transition: &TransitionTime) {
        self.transition_time = Some(transition.deciseconds);
    }

    /// Get the on/off switch, if set.
    pub fn is_on(&self) -> Option<bool> {
        self.on
    }

    /// Get the brightness, if set.
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness.and_then(Brightness::create)
    }

    /// Get the color as hue and saturation, if both are set.
    pub fn hue_saturation(&self) -> Option<HueSaturation> {
        match (self.hue, self.saturation) {
            (Some(hue), Some(saturation)) => HueSaturation::create(hue, saturation),
            _ => None,
        }
    }

    /// Get the color temperature, if set.
    pub fn color_temperature(&self) -> Option<ColorTemperature> {
        self.color_temperature.and_then(ColorTemperature::create)
    }

    /// Get the transition time, if set.
    pub fn transition_time(&self) -> Option<TransitionTime> {
        self.transition_time.map(TransitionTime::from_deciseconds)
    }

    /// Merge another state into this one.
    ///
    /// Attributes set in `other` overwrite attributes in `self`; unset
    /// attributes leave `self` alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{Brightness, ColorTemperature, LightState};
    ///
    /// let mut state = LightState::from(&ColorTemperature::create(370).unwrap());
    /// state.apply(&LightState::from(&Brightness::create(50).unwrap()));
    ///
    /// assert_eq!(state.color_temperature().unwrap().mired(), 370);
    /// assert_eq!(state.brightness().unwrap().value(), 50);
    /// ```
    pub fn apply(&mut self, other: &Self) {
        if let Some(on) = other.on {
            self.on = Some(on);
        }
        if let Some(brightness) = other.brightness {
            self.brightness = Some(brightness);
        }
        if let Some(hue) = other.hue {
            self.hue = Some(hue);
        }
        if let Some(saturation) = other.saturation {
            self.saturation = Some(saturation);
        }
        if let Some(color_temperature) = other.color_temperature {
            self.color_temperature = Some(color_temperature);
        }
        if let Some(transition_time) = other.transition_time {
            self.transition_time = Some(transition_time);
        }
    }
}

impl From<&Brightness> for LightState {
    fn from(brightness: &Brightness) -> Self {
        let mut state = LightState::new();
        state.set_brightness(brightness);
        state
    }
}

impl From<&HueSaturation> for LightState {
    fn from(hs: &HueSaturation) -> Self {
        let mut state = LightState::new();
        state.set_hue_saturation(hs);
        state
    }
}

impl From<&ColorTemperature> for LightState {
    fn from(ct: &ColorTemperature) -> Self {
        let mut state = LightState::new();
        state.set_color_temperature(ct);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_wire_names_and_skips_unset() {
        let mut state = LightState::new();
        state.set_on(true);
        state.set_brightness(&Brightness::create(128).unwrap());
        state.set_color_temperature(&ColorTemperature::create(370).unwrap());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "on": true, "bri": 128, "ct": 370 })
        );
    }

    #[test]
    fn deserializes_wire_names() {
        let state: LightState =
            serde_json::from_str(r#"{"on":false,"hue":21845,"sat":200,"transitiontime":4}"#)
                .unwrap();
        assert_eq!(state.is_on(), Some(false));
        assert_eq!(state.hue_saturation().unwrap().hue(), 21845);
        assert_eq!(state.transition_time().unwrap().deciseconds(), 4);
    }

    #[test]
    fn apply_keeps_unset_attributes() {
        let mut current = LightState::new();
        current.set_on(true);
        current.set_brightness(&Brightness::create(254).unwrap());

        let mut desired = LightState::new();
        desired.set_brightness(&Brightness::create(10).unwrap());
        current.apply(&desired);

        assert_eq!(current.is_on(), Some(true));
        assert_eq!(current.brightness().unwrap().value(), 10);
    }
}
