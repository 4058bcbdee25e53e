//! Connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::TransitionTime;

/// Timing and retry settings for a bridge connection.
///
/// All values are fixed once the coordinator is constructed; build the
/// config up front and hand it over.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hue_bridge_rs::ConnectionConfig;
///
/// let config = ConnectionConfig {
///     heartbeat_interval: Duration::from_secs(5),
///     ..Default::default()
/// };
/// assert_eq!(config.pushlink_timeout, ConnectionConfig::DEFAULT_PUSHLINK_TIMEOUT);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// How often the heartbeat refreshes the light registry.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval: Duration,

    /// How long to wait for the link button before a pushlink attempt fails.
    ///
    /// This is the window per wait; a button-not-pressed report re-arms it.
    #[serde(default = "default_pushlink_timeout")]
    pub pushlink_timeout: Duration,

    /// How long a single discovery attempt may run.
    #[serde(default = "default_discovery_timeout")]
    pub discovery_timeout: Duration,

    /// How many times a failed discovery transport call is retried.
    ///
    /// Retries cover transport errors only. An empty result set is an
    /// answer, not a failure, and is never silently retried.
    #[serde(default = "default_max_discovery_retries")]
    pub max_discovery_retries: u32,

    /// Transition time stamped on light updates that do not set their own.
    #[serde(default)]
    pub transition_time: TransitionTime,
}

impl ConnectionConfig {
    pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_PUSHLINK_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_DISCOVERY_RETRIES: u32 = 3;
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
            pushlink_timeout: Self::DEFAULT_PUSHLINK_TIMEOUT,
            discovery_timeout: Self::DEFAULT_DISCOVERY_TIMEOUT,
            max_discovery_retries: Self::DEFAULT_MAX_DISCOVERY_RETRIES,
            transition_time: TransitionTime::new(),
        }
    }
}

fn default_heartbeat_interval() -> Duration {
    ConnectionConfig::DEFAULT_HEARTBEAT_INTERVAL
}

fn default_pushlink_timeout() -> Duration {
    ConnectionConfig::DEFAULT_PUSHLINK_TIMEOUT
}

fn default_discovery_timeout() -> Duration {
    ConnectionConfig::DEFAULT_DISCOVERY_TIMEOUT
}

fn default_max_discovery_retries() -> u32 {
    ConnectionConfig::DEFAULT_MAX_DISCOVERY_RETRIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_consts() {
        let config = ConnectionConfig::default();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.pushlink_timeout, Duration::from_secs(30));
        assert_eq!(config.discovery_timeout, Duration::from_secs(10));
        assert_eq!(config.max_discovery_retries, 3);
        assert!(config.transition_time.is_instant());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ConnectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConnectionConfig::default());
    }
}
