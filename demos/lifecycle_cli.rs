//! CLI for exercising the bridge connection lifecycle.
//!
//! This example runs the coordinator against a simulated bridge, so every
//! path (including the failure prompts) can be exercised from the command
//! line without hardware.
//!
//! Run with: cargo run --example lifecycle_cli -- --help

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hue_bridge_rs::runtime::{self, BoxFuture, BoxStream};
use hue_bridge_rs::{
    AuthOutcome, Authenticator, Brightness, BridgeCandidate, BridgeLifecycleCoordinator,
    BridgeResourceCache, ConnectionConfig, Discovery, Error, LifecycleEvent, LifecycleState,
    LightRegistry, LightSnapshot, LightState, StrobeRate, TransitionTime,
};

#[derive(Parser)]
#[command(name = "lifecycle-cli")]
#[command(about = "Drive the Hue bridge lifecycle against a simulated network", long_about = None)]
struct Cli {
    /// Number of lights the simulated bridge reports
    #[arg(short, long, global = true, default_value = "3")]
    lights: usize,

    /// Number of bridges discovery finds (0 exercises the failure path)
    #[arg(short, long, global = true, default_value = "1")]
    bridges: usize,

    /// Seconds until the simulated link button gets pressed
    #[arg(short, long, global = true, default_value = "2")]
    press_after: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover a bridge and pair with it
    Pair,

    /// Pair, then run the heartbeat for a few refresh rounds
    Poll {
        /// Number of one-second refresh rounds
        #[arg(short, long, default_value = "5")]
        rounds: u64,
    },

    /// Pair, start the heartbeat and strobe every reachable light
    Strobe {
        /// Flashes per second (0 < rate <= 10)
        #[arg(long, default_value = "4.0")]
        rate: f64,

        /// How long to strobe, in seconds
        #[arg(short, long, default_value = "3")]
        seconds: u64,
    },

    /// Run the whole lifecycle and dump coordinator diagnostics
    Diagnostics,
}

/// Search result scripted from the command line.
struct SimulatedDiscovery {
    bridges: usize,
}

impl Discovery for SimulatedDiscovery {
    fn search(&self) -> BoxFuture<'_, Result<Vec<BridgeCandidate>, Error>> {
        Box::pin(async move {
            runtime::sleep(Duration::from_millis(400)).await;
            Ok((0..self.bridges)
                .map(|n| BridgeCandidate {
                    id: format!("001788fffe23a0{n:02}"),
                    address: Ipv4Addr::new(192, 168, 1, 42 + n as u8),
                })
                .collect())
        })
    }
}

/// Presses the link button after a configured delay.
struct SimulatedAuth {
    press_after: Duration,
}

impl Authenticator for SimulatedAuth {
    fn start_pushlink(&self, _candidate: BridgeCandidate) -> BoxStream<'static, AuthOutcome> {
        let press_after = self.press_after;
        Box::pin(futures::stream::unfold(
            Duration::ZERO,
            move |elapsed| async move {
                let poll_interval = Duration::from_millis(800);
                runtime::sleep(poll_interval).await;
                let elapsed = elapsed + poll_interval;
                let outcome = if elapsed < press_after {
                    AuthOutcome::ButtonNotPressed
                } else {
                    AuthOutcome::Success
                };
                Some((outcome, elapsed))
            },
        ))
    }
}

fn simulated_coordinator(cli: &Cli) -> (BridgeLifecycleCoordinator, Arc<BridgeResourceCache>) {
    let config = ConnectionConfig {
        heartbeat_interval: Duration::from_secs(1),
        transition_time: TransitionTime::from_deciseconds(4),
        ..ConnectionConfig::default()
    };

    let registry = Arc::new(BridgeResourceCache::new());
    registry.replace_all(
        (1..=cli.lights)
            .map(|n| LightSnapshot::new(&n.to_string(), Some(format!("Simulated {n}").as_str())))
            .collect(),
    );

    let coordinator = BridgeLifecycleCoordinator::new(
        config,
        Arc::new(SimulatedDiscovery {
            bridges: cli.bridges,
        }),
        Arc::new(SimulatedAuth {
            press_after: Duration::from_secs(cli.press_after),
        }),
        registry.clone(),
    );

    coordinator.subscribe(|event| match event {
        LifecycleEvent::StateChanged { from, to } => println!("  [{from} -> {to}]"),
        LifecycleEvent::UserActionRequired { title, message } => {
            println!("  !! {title}: {message}")
        }
        LifecycleEvent::PushlinkProgress => println!("  .. link button not pressed yet"),
        LifecycleEvent::LightsUpdated { lights } => println!("  ** refreshed {lights} light(s)"),
    });

    (coordinator, registry)
}

/// Poll until the coordinator reaches `target` or fails.
async fn wait_for(coordinator: &BridgeLifecycleCoordinator, target: LifecycleState) -> bool {
    for _ in 0..600 {
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

async fn pair(coordinator: &BridgeLifecycleCoordinator) -> Result<(), Box<dyn std::error::Error>> {
    println!("Searching for Hue bridges...");
    coordinator.start_discovery()?;

    if !wait_for(coordinator, LifecycleState::Authenticated).await {
        return Err(format!("pairing ended in state: {}", coordinator.state()).into());
    }
    if let Some(bridge) = coordinator.bridge() {
        println!("Paired with bridge {} at {}", bridge.id, bridge.address);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (coordinator, registry) = simulated_coordinator(&cli);

    match cli.command {
        Commands::Pair => {
            pair(&coordinator).await?;
        }

        Commands::Poll { rounds } => {
            pair(&coordinator).await?;

            println!("\nPolling for {rounds} round(s)...");
            coordinator.enable_heartbeat()?;
            runtime::sleep(Duration::from_secs(rounds)).await;
            coordinator.disable_heartbeat();

            println!("\nKnown lights:");
            for light in registry.snapshot() {
                let name = light.name.as_deref().unwrap_or("(unnamed)");
                println!("  {:3}  {:20}  reachable={}", light.id, name, light.reachable);
            }
        }

        Commands::Strobe { rate, seconds } => {
            let Some(rate) = StrobeRate::create(rate) else {
                eprintln!("Invalid rate. Must be above 0 and at most 10 flashes per second.");
                return Ok(());
            };

            pair(&coordinator).await?;
            coordinator.enable_heartbeat()?;

            println!("\nStrobing at {} Hz for {seconds}s...", rate.per_second());
            let frame = LightState::from(&Brightness::new());
            coordinator.start_strobe(frame, rate)?;
            runtime::sleep(Duration::from_secs(seconds)).await;
            coordinator.stop_strobe();
            println!("Strobe stopped.");
        }

        Commands::Diagnostics => {
            pair(&coordinator).await?;
            coordinator.enable_heartbeat()?;
            runtime::sleep(Duration::from_secs(3)).await;

            let dimmed = LightState::from(&Brightness::create_or(128));
            if let Err(errors) = coordinator.update_light("1", dimmed).await {
                for e in errors {
                    eprintln!("Light update failed: {e}");
                }
            }

            coordinator.disconnect();
            println!(
                "\nDiagnostics:\n{}",
                serde_json::to_string_pretty(&coordinator.diagnostics())?
            );
        }
    }

    Ok(())
}
