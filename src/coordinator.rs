//! The bridge connection lifecycle coordinator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use futures::StreamExt;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthOutcome, Authenticator};
use crate::config::ConnectionConfig;
use crate::discovery::{BridgeCandidate, Discovery};
use crate::errors::Error;
use crate::events::{EventCallback, LifecycleEvent, SubscriptionId};
use crate::history::{EventHistory, EventRecord};
use crate::light_state::LightState;
use crate::registry::LightRegistry;
use crate::runtime::{self, Instant};
use crate::state::{FailureReason, LifecycleState};
use crate::types::StrobeRate;

type Result<T> = std::result::Result<T, Error>;

const NO_BRIDGES_TITLE: &str = "No Hue Bridges Found";
const CONNECTIVITY_MESSAGE: &str = "Try checking your WiFi connection";
const AUTH_FAILED_TITLE: &str = "Authentication Failed";
const AUTH_TIMEOUT_MESSAGE: &str = "Push button authentication timed out";

const RETRY_DELAYS_MS: [u64; 3] = [750, 1500, 3000];

/// Diagnostics for the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorDiagnostics {
    pub state: LifecycleState,
    pub bridge: Option<BridgeCandidate>,
    pub subscription_count: usize,
    pub seconds_since_last_heartbeat: Option<f64>,
    pub strobe_active: bool,
    pub last_error: Option<String>,
}

struct Inner {
    state: LifecycleState,
    /// Tags in-flight discovery/pushlink work; a bump orphans all of it.
    generation: u64,
    heartbeat_gen: u64,
    strobe_gen: u64,
    bridge: Option<BridgeCandidate>,
    strobe_active: bool,
    last_heartbeat: Option<Instant>,
}

impl Inner {
    fn transition(&mut self, to: LifecycleState, events: &mut Vec<LifecycleEvent>) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        debug!("State changed: {from} -> {to}");
        events.push(LifecycleEvent::state_changed(from, to));
    }

    fn halt_timers(&mut self) {
        self.heartbeat_gen += 1;
        self.strobe_gen += 1;
        self.strobe_active = false;
    }
}

struct Shared {
    config: ConnectionConfig,
    discovery: Arc<dyn Discovery>,
    auth: Arc<dyn Authenticator>,
    registry: Arc<dyn LightRegistry>,
    inner: Mutex<Inner>,
    observers: Mutex<HashMap<SubscriptionId, Arc<EventCallback>>>,
    history: Mutex<EventHistory>,
}

impl Shared {
    /// Record events and hand them to observers.
    ///
    /// Must be called with no internal lock held; callbacks are free to
    /// call back into the coordinator.
    fn emit(&self, events: Vec<LifecycleEvent>) {
        if events.is_empty() {
            return;
        }

        {
            let mut history = self.history.lock().unwrap();
            for event in &events {
                history.record(event);
            }
        }

        let callbacks: Vec<Arc<EventCallback>> =
            self.observers.lock().unwrap().values().cloned().collect();
        for event in &events {
            for callback in &callbacks {
                callback(event);
            }
        }
    }

    fn note_error(&self, error: &Error) {
        self.history.lock().unwrap().record_error(&error.to_string());
    }
}

/// Drives one bridge session from discovery through pushlink to the
/// periodic light refresh.
///
/// The coordinator owns the lifecycle state machine and every timer around
/// it. The network itself stays behind three injected seams:
/// [`Discovery`] finds bridges, [`Authenticator`] runs pushlink and
/// [`LightRegistry`] holds the lights. Progress comes back through
/// subscribed [`LifecycleEvent`] callbacks.
///
/// Cloning is cheap and every clone drives the same session. Background
/// tasks hold only weak references, so dropping the last clone winds the
/// whole session down.
///
/// # Example
///
/// ```ignore
/// let coordinator = BridgeLifecycleCoordinator::new(
///     ConnectionConfig::default(),
///     discovery,
///     auth,
///     Arc::new(BridgeResourceCache::new()),
/// );
///
/// coordinator.subscribe(|event| println!("{event:?}"));
/// coordinator.start_discovery()?;
/// ```
#[derive(Clone)]
pub struct BridgeLifecycleCoordinator {
    shared: Arc<Shared>,
}

impl BridgeLifecycleCoordinator {
    pub fn new(
        config: ConnectionConfig,
        discovery: Arc<dyn Discovery>,
        auth: Arc<dyn Authenticator>,
        registry: Arc<dyn LightRegistry>,
    ) -> Self {
        BridgeLifecycleCoordinator {
            shared: Arc::new(Shared {
                config,
                discovery,
                auth,
                registry,
                inner: Mutex::new(Inner {
                    state: LifecycleState::Idle,
                    generation: 0,
                    heartbeat_gen: 0,
                    strobe_gen: 0,
                    bridge: None,
                    strobe_active: false,
                    last_heartbeat: None,
                }),
                observers: Mutex::new(HashMap::new()),
                history: Mutex::new(EventHistory::new()),
            }),
        }
    }

    /// Search the local network for bridges.
    ///
    /// Valid from [`Idle`], [`Disconnected`] and any [`Failed`] state. The
    /// search runs in the background; the first candidate found moves the
    /// session to [`AwaitingPushlink`], an empty or failed search to
    /// [`Failed`] with a retry prompt for the user.
    ///
    /// [`Idle`]: LifecycleState::Idle
    /// [`Disconnected`]: LifecycleState::Disconnected
    /// [`Failed`]: LifecycleState::Failed
    /// [`AwaitingPushlink`]: LifecycleState::AwaitingPushlink
    pub fn start_discovery(&self) -> Result<()> {
        let (generation, events) = {
            let mut inner = self.shared.inner.lock().unwrap();
            if !inner.state.can_start_discovery() {
                let err = Error::invalid_transition(inner.state, "start_discovery");
                drop(inner);
                error!("{err}");
                self.shared.note_error(&err);
                return Err(err);
            }

            inner.halt_timers();
            inner.generation += 1;
            inner.bridge = None;
            let mut events = Vec::new();
            inner.transition(LifecycleState::Discovering, &mut events);
            (inner.generation, events)
        };
        self.shared.emit(events);

        let shared = Arc::downgrade(&self.shared);
        runtime::spawn(async move {
            Self::drive_discovery(shared, generation).await;
        })
        .detach();
        Ok(())
    }

    /// Start the periodic light refresh.
    ///
    /// Valid from [`Authenticated`], or from [`Disconnected`] while a
    /// bridge address is still cached. The first refresh runs immediately,
    /// then every [`ConnectionConfig::heartbeat_interval`].
    ///
    /// [`Authenticated`]: LifecycleState::Authenticated
    /// [`Disconnected`]: LifecycleState::Disconnected
    pub fn enable_heartbeat(&self) -> Result<()> {
        let (heartbeat_gen, events) = {
            let mut inner = self.shared.inner.lock().unwrap();
            let resumable = inner.state == LifecycleState::Authenticated
                || (inner.state == LifecycleState::Disconnected && inner.bridge.is_some());
            if !resumable {
                let err = Error::invalid_transition(inner.state, "enable_heartbeat");
                drop(inner);
                error!("{err}");
                self.shared.note_error(&err);
                return Err(err);
            }

            inner.heartbeat_gen += 1;
            let mut events = Vec::new();
            inner.transition(LifecycleState::HeartbeatActive, &mut events);
            (inner.heartbeat_gen, events)
        };
        self.shared.emit(events);

        let shared = Arc::downgrade(&self.shared);
        runtime::spawn(async move {
            Self::drive_heartbeat(shared, heartbeat_gen).await;
        })
        .detach();
        Ok(())
    }

    /// Stop the periodic light refresh, keeping the bridge address cached.
    ///
    /// Idempotent; without a running heartbeat this does nothing.
    pub fn disable_heartbeat(&self) {
        let events = {
            let mut inner = self.shared.inner.lock().unwrap();
            let mut events = Vec::new();
            if inner.state == LifecycleState::HeartbeatActive {
                inner.halt_timers();
                inner.transition(LifecycleState::Disconnected, &mut events);
            } else {
                debug!("disable_heartbeat with no heartbeat running");
            }
            events
        };
        self.shared.emit(events);
    }

    /// Tear the session down to [`Idle`].
    ///
    /// Idempotent. Stops every timer, forgets the bridge and orphans any
    /// in-flight discovery or pushlink work; late results are dropped
    /// without a state change.
    ///
    /// [`Idle`]: LifecycleState::Idle
    pub fn disconnect(&self) {
        let events = {
            let mut inner = self.shared.inner.lock().unwrap();
            inner.generation += 1;
            inner.halt_timers();
            inner.bridge = None;
            inner.last_heartbeat = None;
            let mut events = Vec::new();
            inner.transition(LifecycleState::Idle, &mut events);
            events
        };
        self.shared.emit(events);
    }

    /// Send a desired state to one light.
    ///
    /// Valid only while the heartbeat runs. When the caller left the
    /// transition time unset, the configured default is stamped on; an
    /// explicitly chosen transition survives untouched. Unknown and
    /// unreachable lights are refused.
    pub async fn update_light(
        &self,
        id: &str,
        desired: LightState,
    ) -> std::result::Result<(), Vec<Error>> {
        {
            let inner = self.shared.inner.lock().unwrap();
            if inner.state != LifecycleState::HeartbeatActive {
                let err = Error::invalid_transition(inner.state, "update_light");
                drop(inner);
                error!("{err}");
                self.shared.note_error(&err);
                return Err(vec![err]);
            }
        }

        let desired = self.stamp_transition(desired);
        let result = self.shared.registry.update_one(id, desired).await;
        if let Err(errors) = &result {
            for err in errors {
                warn!("Light update failed: {err}");
            }
            if let Some(last) = errors.last() {
                self.shared.note_error(last);
            }
        }
        result
    }

    /// Flash every reachable light with `state`, `rate` times per second.
    ///
    /// Valid only while the heartbeat runs. Starting a new strobe replaces
    /// the previous one; the strobe also dies with the session, so a
    /// disconnect never leaves lights flashing.
    pub fn start_strobe(&self, state: LightState, rate: StrobeRate) -> Result<()> {
        if !state.is_valid() {
            let err = Error::ConfigurationError("strobe state has no attributes set".to_string());
            error!("{err}");
            self.shared.note_error(&err);
            return Err(err);
        }

        let strobe_gen = {
            let mut inner = self.shared.inner.lock().unwrap();
            if inner.state != LifecycleState::HeartbeatActive {
                let err = Error::invalid_transition(inner.state, "start_strobe");
                drop(inner);
                error!("{err}");
                self.shared.note_error(&err);
                return Err(err);
            }

            inner.strobe_gen += 1;
            inner.strobe_active = true;
            inner.strobe_gen
        };

        let shared = Arc::downgrade(&self.shared);
        runtime::spawn(async move {
            Self::drive_strobe(shared, strobe_gen, state, rate).await;
        })
        .detach();
        Ok(())
    }

    /// Stop a running strobe. Idempotent.
    pub fn stop_strobe(&self) {
        let mut inner = self.shared.inner.lock().unwrap();
        if inner.strobe_active {
            inner.strobe_gen += 1;
            inner.strobe_active = false;
        } else {
            debug!("stop_strobe with no strobe running");
        }
    }

    /// Register an observer for lifecycle events.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.shared
            .observers
            .lock()
            .unwrap()
            .insert(id, Arc::new(Box::new(callback) as EventCallback));
        id
    }

    /// Remove an observer registration.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.shared.observers.lock().unwrap().remove(&id);
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.shared.inner.lock().unwrap().state
    }

    /// The tracked bridge, once discovery selected one.
    pub fn bridge(&self) -> Option<BridgeCandidate> {
        self.shared.inner.lock().unwrap().bridge.clone()
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.shared.config
    }

    /// Returns diagnostics covering state, timers and observers.
    pub fn diagnostics(&self) -> CoordinatorDiagnostics {
        let (state, bridge, strobe_active, seconds_since_last_heartbeat) = {
            let inner = self.shared.inner.lock().unwrap();
            (
                inner.state,
                inner.bridge.clone(),
                inner.strobe_active,
                inner.last_heartbeat.map(|t| t.elapsed().as_secs_f64()),
            )
        };

        CoordinatorDiagnostics {
            state,
            bridge,
            subscription_count: self.shared.observers.lock().unwrap().len(),
            seconds_since_last_heartbeat,
            strobe_active,
            last_error: self
                .shared
                .history
                .lock()
                .unwrap()
                .last_error()
                .map(String::from),
        }
    }

    /// The most recent lifecycle events, oldest first.
    pub fn recent_events(&self) -> Vec<EventRecord> {
        self.shared.history.lock().unwrap().entries().to_vec()
    }

    fn stamp_transition(&self, mut state: LightState) -> LightState {
        if state.transition_time.is_none() {
            state.set_transition_time(&self.shared.config.transition_time);
        }
        state
    }

    fn is_stale(shared: &Weak<Shared>, generation: u64) -> bool {
        match shared.upgrade() {
            Some(strong) => strong.inner.lock().unwrap().generation != generation,
            None => true,
        }
    }

    async fn drive_discovery(shared: Weak<Shared>, generation: u64) {
        let Some(strong) = shared.upgrade() else {
            return;
        };
        let discovery = Arc::clone(&strong.discovery);
        let attempt_timeout = strong.config.discovery_timeout;
        let max_retries = strong.config.max_discovery_retries;
        drop(strong);

        let mut last_error = None;
        for attempt in 0..=max_retries {
            if Self::is_stale(&shared, generation) {
                debug!("Abandoning superseded discovery (generation {generation})");
                return;
            }

            match runtime::timeout(attempt_timeout, discovery.search()).await {
                Ok(Ok(candidates)) => {
                    Self::on_discovery_result(&shared, generation, Ok(candidates));
                    return;
                }
                Ok(Err(e)) => {
                    warn!("Discovery attempt {attempt} failed: {e}");
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay_idx = (attempt as usize).min(RETRY_DELAYS_MS.len() - 1);
                        runtime::sleep(Duration::from_millis(RETRY_DELAYS_MS[delay_idx])).await;
                    }
                }
                Err(_) => {
                    // An expired window is an answer about the network, not
                    // a transport hiccup; retrying would just double it.
                    warn!("Discovery attempt {attempt} timed out");
                    last_error = Some(Error::DiscoveryFailed("search timed out".to_string()));
                    break;
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| Error::DiscoveryFailed("search never ran".to_string()));
        Self::on_discovery_result(&shared, generation, Err(error));
    }

    fn on_discovery_result(
        shared: &Weak<Shared>,
        generation: u64,
        result: Result<Vec<BridgeCandidate>>,
    ) {
        let Some(strong) = shared.upgrade() else {
            return;
        };

        let mut events = Vec::new();
        let mut failure = None;
        let selected = {
            let mut inner = strong.inner.lock().unwrap();
            if inner.generation != generation {
                debug!("Dropping stale discovery result (generation {generation})");
                return;
            }

            let candidate = match result {
                Ok(mut candidates) => {
                    if candidates.len() > 1 {
                        // Single-bridge scope: the first candidate wins.
                        debug!(
                            "Discovery produced {} candidates; keeping the first",
                            candidates.len()
                        );
                    }
                    if candidates.is_empty() {
                        None
                    } else {
                        Some(candidates.remove(0))
                    }
                }
                Err(e) => {
                    failure = Some(e);
                    None
                }
            };

            match candidate {
                Some(candidate) => {
                    debug!("Selected bridge {} at {}", candidate.id, candidate.address);
                    inner.bridge = Some(candidate.clone());
                    inner.transition(LifecycleState::AwaitingPushlink, &mut events);
                    Some(candidate)
                }
                None => {
                    inner.transition(
                        LifecycleState::Failed(FailureReason::NoBridgesFound),
                        &mut events,
                    );
                    events.push(LifecycleEvent::user_action(
                        NO_BRIDGES_TITLE,
                        CONNECTIVITY_MESSAGE,
                    ));
                    None
                }
            }
        };

        if let Some(err) = &failure {
            strong.note_error(err);
        }
        strong.emit(events);

        if let Some(candidate) = selected {
            let shared = shared.clone();
            runtime::spawn(async move {
                Self::drive_pushlink(shared, generation, candidate).await;
            })
            .detach();
        }
    }

    async fn drive_pushlink(shared: Weak<Shared>, generation: u64, candidate: BridgeCandidate) {
        let Some(strong) = shared.upgrade() else {
            return;
        };
        let auth = Arc::clone(&strong.auth);
        let window = strong.config.pushlink_timeout;
        drop(strong);

        let mut outcomes = auth.start_pushlink(candidate);
        loop {
            // Each wait gets the full window; a button-not-pressed report
            // re-arms it on the next pass.
            let outcome = match runtime::timeout(window, outcomes.next()).await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => AuthOutcome::Timeout,
                Err(_) => AuthOutcome::Timeout,
            };

            if Self::on_auth_result(&shared, generation, outcome) {
                return;
            }
        }
    }

    /// Apply one pushlink outcome. Returns whether driving is over.
    fn on_auth_result(shared: &Weak<Shared>, generation: u64, outcome: AuthOutcome) -> bool {
        let Some(strong) = shared.upgrade() else {
            return true;
        };

        let mut events = Vec::new();
        let mut failure = None;
        {
            let mut inner = strong.inner.lock().unwrap();
            if inner.generation != generation {
                debug!("Dropping stale pushlink outcome ({outcome})");
                return true;
            }

            match outcome {
                AuthOutcome::ButtonNotPressed => {
                    debug!("Link button not pressed yet; keeping the window open");
                    events.push(LifecycleEvent::PushlinkProgress);
                }
                AuthOutcome::Success => {
                    inner.transition(LifecycleState::Authenticated, &mut events);
                }
                AuthOutcome::Timeout => {
                    inner.transition(
                        LifecycleState::Failed(FailureReason::PushlinkFailed),
                        &mut events,
                    );
                    events.push(LifecycleEvent::user_action(
                        AUTH_FAILED_TITLE,
                        AUTH_TIMEOUT_MESSAGE,
                    ));
                    failure = Some(Error::AuthFailed(
                        "push button authentication timed out".to_string(),
                    ));
                }
                AuthOutcome::ConnectionLost => {
                    inner.transition(
                        LifecycleState::Failed(FailureReason::PushlinkFailed),
                        &mut events,
                    );
                    events.push(LifecycleEvent::user_action(
                        NO_BRIDGES_TITLE,
                        CONNECTIVITY_MESSAGE,
                    ));
                    failure = Some(Error::AuthFailed(
                        "lost connection to the bridge".to_string(),
                    ));
                }
                AuthOutcome::NoConfiguredBridge => {
                    let err = Error::ConfigurationError(
                        "pushlink driven without a configured bridge".to_string(),
                    );
                    error!("{err}");
                    inner.transition(
                        LifecycleState::Failed(FailureReason::ConfigurationError),
                        &mut events,
                    );
                    failure = Some(err);
                }
            }
        }

        if let Some(err) = &failure {
            strong.note_error(err);
        }
        strong.emit(events);
        outcome.is_terminal()
    }

    async fn drive_heartbeat(shared: Weak<Shared>, heartbeat_gen: u64) {
        let Some(strong) = shared.upgrade() else {
            return;
        };
        let interval = strong.config.heartbeat_interval;
        drop(strong);

        loop {
            if !Self::heartbeat_tick(&shared, heartbeat_gen).await {
                return;
            }
            runtime::sleep(interval).await;
        }
    }

    /// Run one refresh. Returns whether the heartbeat stays alive.
    async fn heartbeat_tick(shared: &Weak<Shared>, heartbeat_gen: u64) -> bool {
        let Some(strong) = shared.upgrade() else {
            return false;
        };

        {
            let inner = strong.inner.lock().unwrap();
            if inner.heartbeat_gen != heartbeat_gen
                || inner.state != LifecycleState::HeartbeatActive
            {
                return false;
            }
        }

        // The fetch runs without the lock; the result is re-checked against
        // the generation before it lands.
        let fetched = strong.registry.fetch_all().await;

        let mut events = Vec::new();
        let mut connectivity_loss = None;
        {
            let mut inner = strong.inner.lock().unwrap();
            if inner.heartbeat_gen != heartbeat_gen
                || inner.state != LifecycleState::HeartbeatActive
            {
                debug!("Dropping stale heartbeat refresh");
                return false;
            }

            match fetched {
                Ok(report) => {
                    for err in &report.errors {
                        warn!("Light refresh error: {err}");
                    }
                    let lights = report.lights.len();
                    strong.registry.replace_all(report.lights);
                    inner.last_heartbeat = Some(Instant::now());
                    events.push(LifecycleEvent::LightsUpdated { lights });
                }
                Err(e) => {
                    warn!("Heartbeat lost the bridge: {e}");
                    inner.halt_timers();
                    inner.transition(LifecycleState::Disconnected, &mut events);
                    events.push(LifecycleEvent::user_action(
                        NO_BRIDGES_TITLE,
                        CONNECTIVITY_MESSAGE,
                    ));
                    connectivity_loss = Some(e);
                }
            }
        }

        let keep_going = connectivity_loss.is_none();
        if let Some(err) = &connectivity_loss {
            strong.note_error(err);
        }
        strong.emit(events);
        keep_going
    }

    async fn drive_strobe(
        shared: Weak<Shared>,
        strobe_gen: u64,
        frame: LightState,
        rate: StrobeRate,
    ) {
        let interval = rate.interval();
        loop {
            let Some(strong) = shared.upgrade() else {
                return;
            };
            {
                let inner = strong.inner.lock().unwrap();
                if inner.strobe_gen != strobe_gen
                    || !inner.strobe_active
                    || inner.state != LifecycleState::HeartbeatActive
                {
                    return;
                }
            }

            // Frames go to reachable lights only; unreachable ones are
            // skipped rather than failed, batch-style.
            let targets: Vec<String> = strong
                .registry
                .snapshot()
                .into_iter()
                .filter(|light| light.reachable)
                .map(|light| light.id)
                .collect();
            for id in targets {
                if let Err(errors) = strong.registry.update_one(&id, frame.clone()).await {
                    for err in errors {
                        warn!("Strobe frame failed: {err}");
                    }
                }
            }

            drop(strong);
            runtime::sleep(interval).await;
        }
    }
}
