//! Pushlink authentication seam.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::discovery::BridgeCandidate;
use crate::runtime::BoxStream;

/// Progress reports from a pushlink attempt.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum AuthOutcome {
    /// The link button was pressed and the bridge issued credentials.
    #[strum(serialize = "success")]
    Success,
    /// The pushlink window closed without a button press.
    #[strum(serialize = "timeout")]
    Timeout,
    /// The bridge answered but the button has not been pressed yet.
    #[strum(serialize = "button not pressed")]
    ButtonNotPressed,
    /// The bridge stopped answering mid-pushlink.
    #[strum(serialize = "connection lost")]
    ConnectionLost,
    /// Pushlink was driven without a usable bridge configuration.
    #[strum(serialize = "no configured bridge")]
    NoConfiguredBridge,
}

impl AuthOutcome {
    /// Whether this outcome ends the pushlink attempt.
    ///
    /// [`ButtonNotPressed`] is the only outcome the coordinator waits
    /// through; everything else settles the attempt.
    ///
    /// [`ButtonNotPressed`]: AuthOutcome::ButtonNotPressed
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuthOutcome::ButtonNotPressed)
    }
}

/// The pushlink driver.
///
/// Implementations own the actual registration exchange with the bridge;
/// the coordinator only consumes the outcome stream.
pub trait Authenticator: Send + Sync {
    /// Start pushlink against the candidate.
    ///
    /// The stream may yield [`AuthOutcome::ButtonNotPressed`] any number of
    /// times before exactly one terminal outcome. A stream that ends
    /// without a terminal outcome counts as a timeout.
    fn start_pushlink(&self, candidate: BridgeCandidate) -> BoxStream<'static, AuthOutcome>;
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_button_not_pressed_keeps_waiting() {
        for outcome in AuthOutcome::iter() {
            assert_eq!(
                outcome.is_terminal(),
                outcome != AuthOutcome::ButtonNotPressed
            );
        }
    }
}
