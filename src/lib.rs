//! # hue_bridge_rs
//!
//! An async Rust library for discovering and pairing with Philips Hue bridges.
//!
//! This crate provides a **runtime-agnostic** coordinator for the whole bridge
//! connection lifecycle: finding a bridge on the local network, pairing with it
//! through push-button authentication, keeping a light registry fresh with a
//! periodic heartbeat, and steering lights once connected.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hue_bridge_rs::{
//!     Brightness, BridgeLifecycleCoordinator, BridgeResourceCache, ConnectionConfig,
//!     LifecycleEvent, LightState,
//! };
//!
//! // Works with any async runtime!
//! async fn pair_and_dim() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = BridgeLifecycleCoordinator::new(
//!         ConnectionConfig::default(),
//!         discovery, // your Discovery implementation
//!         auth,      // your Authenticator implementation
//!         Arc::new(BridgeResourceCache::new()),
//!     );
//!
//!     coordinator.subscribe(|event| {
//!         if let LifecycleEvent::UserActionRequired { title, message } = event {
//!             println!("{title}: {message}");
//!         }
//!     });
//!
//!     // Find a bridge, then pair; progress arrives through the subscription.
//!     coordinator.start_discovery()?;
//!
//!     // ...once authenticated:
//!     coordinator.enable_heartbeat()?;
//!     let dimmed = LightState::from(&Brightness::create_or(128));
//!     if let Err(errors) = coordinator.update_light("1", dimmed).await {
//!         eprintln!("update failed: {errors:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Lifecycle Coordination**: One state machine from discovery to teardown,
//!   driven by [`BridgeLifecycleCoordinator`]
//! - **Bridge Discovery**: Pluggable search behind the [`Discovery`] trait,
//!   with retry and timeout handling built in
//! - **Pushlink Pairing**: Press-the-button authentication behind the
//!   [`Authenticator`] trait, with a re-arming wait window
//! - **Heartbeat Refresh**: Periodic light polling through a [`LightRegistry`],
//!   with connectivity loss detection
//! - **Light Control**: Brightness, hue/saturation, color temperature and
//!   fade times via [`LightState`] and the typed value structs
//! - **Groups**: Organize lights into a [`LightGroup`] for batch updates
//! - **Strobe**: Flash every reachable light at a fixed [`StrobeRate`]
//! - **Events**: Observe every state change through [`LifecycleEvent`]
//!   subscriptions, with a bounded [`EventHistory`]
//!
//! ## Lifecycle
//!
//! A session moves through `Idle -> Discovering -> AwaitingPushlink ->
//! Authenticated -> HeartbeatActive`. Failures land in `Failed` with a reason
//! and, where the user can help, a ready-to-display prompt; `disconnect`
//! returns to `Idle` from anywhere. See [`LifecycleState`] for the full map.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod auth;
mod config;
mod coordinator;
mod discovery;
mod errors;
mod events;
mod group;
mod history;
mod light_state;
mod registry;
pub mod runtime;
mod state;
mod types;

// Re-export public API
pub use auth::{AuthOutcome, Authenticator};
pub use config::ConnectionConfig;
pub use coordinator::{BridgeLifecycleCoordinator, CoordinatorDiagnostics};
pub use discovery::{BridgeCandidate, Discovery};
pub use errors::Error;
pub use events::{EventCallback, LifecycleEvent, SubscriptionId};
pub use group::LightGroup;
pub use history::{EventHistory, EventRecord};
pub use light_state::LightState;
pub use registry::{BridgeResourceCache, LightRegistry, LightSnapshot, RefreshReport};
pub use state::{FailureReason, LifecycleState};
pub use types::{Brightness, ColorTemperature, HueSaturation, StrobeRate, TransitionTime};
