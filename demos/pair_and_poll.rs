//! Pair with a simulated bridge and poll its lights.
//!
//! This example demonstrates:
//! - Driving the full lifecycle from discovery to an active heartbeat
//! - Observing progress through lifecycle event subscriptions
//! - Updating a light once the session is connected
//!
//! The bridge here is simulated, so the example runs without any hardware.
//!
//! Run with: cargo run --example pair_and_poll

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use hue_bridge_rs::runtime::{self, BoxFuture, BoxStream};
use hue_bridge_rs::{
    AuthOutcome, Authenticator, Brightness, BridgeCandidate, BridgeLifecycleCoordinator,
    BridgeResourceCache, ConnectionConfig, Discovery, Error, LifecycleEvent, LifecycleState,
    LightRegistry, LightSnapshot, LightState, StrobeRate, TransitionTime,
};

/// Finds one simulated bridge after a short search.
struct SimulatedDiscovery;

impl Discovery for SimulatedDiscovery {
    fn search(&self) -> BoxFuture<'_, Result<Vec<BridgeCandidate>, Error>> {
        Box::pin(async {
            runtime::sleep(Duration::from_millis(300)).await;
            Ok(vec![BridgeCandidate {
                id: "001788fffe23a001".to_string(),
                address: Ipv4Addr::new(192, 168, 1, 42),
            }])
        })
    }
}

/// Reports the link button as pressed on the third poll.
struct SimulatedAuth;

impl Authenticator for SimulatedAuth {
    fn start_pushlink(&self, _candidate: BridgeCandidate) -> BoxStream<'static, AuthOutcome> {
        Box::pin(futures::stream::unfold(0u32, |polls| async move {
            runtime::sleep(Duration::from_millis(800)).await;
            let outcome = if polls < 2 {
                AuthOutcome::ButtonNotPressed
            } else {
                AuthOutcome::Success
            };
            Some((outcome, polls + 1))
        }))
    }
}

async fn wait_for(coordinator: &BridgeLifecycleCoordinator, target: LifecycleState) -> bool {
    for _ in 0..100 {
        let state = coordinator.state();
        if state == target {
            return true;
        }
        if state.is_failed() {
            return false;
        }
        runtime::sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A two-second heartbeat keeps the example snappy; the default is 10s.
    let config = ConnectionConfig {
        heartbeat_interval: Duration::from_secs(2),
        transition_time: TransitionTime::from_deciseconds(4),
        ..ConnectionConfig::default()
    };

    let registry = Arc::new(BridgeResourceCache::new());
    registry.replace_all(vec![
        LightSnapshot::new("1", Some("Desk")),
        LightSnapshot::new("2", Some("Shelf")),
        LightSnapshot::new("3", Some("Hallway")),
    ]);

    let coordinator = BridgeLifecycleCoordinator::new(
        config,
        Arc::new(SimulatedDiscovery),
        Arc::new(SimulatedAuth),
        registry.clone(),
    );

    coordinator.subscribe(|event| match event {
        LifecycleEvent::StateChanged { from, to } => println!("  [{from} -> {to}]"),
        LifecycleEvent::UserActionRequired { title, message } => {
            println!("  !! {title}: {message}")
        }
        LifecycleEvent::PushlinkProgress => println!("  .. waiting for the link button"),
        LifecycleEvent::LightsUpdated { lights } => println!("  ** refreshed {lights} light(s)"),
    });

    println!("Searching for Hue bridges...");
    coordinator.start_discovery()?;

    if !wait_for(&coordinator, LifecycleState::Authenticated).await {
        eprintln!("Pairing failed: {}", coordinator.state());
        return Ok(());
    }
    if let Some(bridge) = coordinator.bridge() {
        println!("Paired with bridge {} at {}\n", bridge.id, bridge.address);
    }

    println!("Starting the heartbeat...");
    coordinator.enable_heartbeat()?;
    runtime::sleep(Duration::from_secs(5)).await;

    println!("\nKnown lights:");
    for light in registry.snapshot() {
        let name = light.name.as_deref().unwrap_or("(unnamed)");
        println!("  {} {} reachable={}", light.id, name, light.reachable);
    }

    println!("\nDimming light 1 to half brightness...");
    let dimmed = LightState::from(&Brightness::create_or(128));
    match coordinator.update_light("1", dimmed).await {
        Ok(()) => println!("  done"),
        Err(errors) => {
            for e in errors {
                eprintln!("  failed: {e}");
            }
        }
    }

    if let Some(rate) = StrobeRate::create(5.0) {
        println!("\nStrobing every reachable light at 5 Hz for two seconds...");
        let frame = LightState::from(&Brightness::new());
        coordinator.start_strobe(frame, rate)?;
        runtime::sleep(Duration::from_secs(2)).await;
        coordinator.stop_strobe();
    }

    println!("Disconnecting.");
    coordinator.disconnect();
    println!("\nDiagnostics:\n{}", serde_json::to_string_pretty(&coordinator.diagnostics())?);
    Ok(())
}
