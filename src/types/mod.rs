//! Value types for light control parameters.

mod brightness;
mod color_temperature;
mod hue_saturation;
mod strobe_rate;
mod transition_time;

pub use brightness::Brightness;
pub use color_temperature::ColorTemperature;
pub use hue_saturation::HueSaturation;
pub use strobe_rate::StrobeRate;
pub use transition_time::TransitionTime;
