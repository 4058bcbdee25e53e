//! Light registry seam and the in-memory resource cache.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::light_state::LightState;
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

/// The last known description of one light.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightSnapshot {
    /// Bridge-assigned light id
    pub id: String,
    /// Display name, when the bridge reports one
    pub name: Option<String>,
    /// Whether the bridge can currently reach the light
    pub reachable: bool,
    /// Last reported state
    pub state: LightState,
}

impl LightSnapshot {
    /// Create a reachable snapshot with an empty state.
    pub fn new(id: &str, name: Option<&str>) -> Self {
        LightSnapshot {
            id: id.to_string(),
            name: name.map(String::from),
            reachable: true,
            state: LightState::new(),
        }
    }
}

/// What one wholesale refresh produced.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Fresh snapshots, replacing everything previously known
    pub lights: Vec<LightSnapshot>,
    /// Per-light errors that did not sink the refresh
    pub errors: Vec<Error>,
}

/// The light collection owned by a bridge session.
///
/// Implementations back this with the bridge's REST resources; the crate
/// ships [`BridgeResourceCache`] as the in-memory reference.
pub trait LightRegistry: Send + Sync {
    /// Replace every known light with `lights`.
    ///
    /// The replacement is wholesale: lights absent from `lights` disappear,
    /// and nothing is merged with previous contents. Readers must never see
    /// a half-replaced collection.
    fn replace_all(&self, lights: Vec<LightSnapshot>);

    /// Current snapshots, ordered by id.
    fn snapshot(&self) -> Vec<LightSnapshot>;

    /// Fetch fresh snapshots for every light.
    ///
    /// `Err` means the bridge itself is out of reach; trouble with single
    /// lights belongs in [`RefreshReport::errors`].
    fn fetch_all(&self) -> BoxFuture<'_, Result<RefreshReport>>;

    /// Send a desired state to one light.
    ///
    /// The bridge answers per attribute, so failure is a list: some
    /// attributes may have applied even when others were rejected.
    fn update_one(
        &self,
        id: &str,
        desired: LightState,
    ) -> BoxFuture<'_, std::result::Result<(), Vec<Error>>>;
}

/// In-memory [`LightRegistry`].
///
/// Holds whatever the last [`replace_all`] delivered and merges updates
/// into it. `fetch_all` answers from memory, so this is both the reference
/// implementation and the test double for anything driving a coordinator.
///
/// [`replace_all`]: LightRegistry::replace_all
#[derive(Default)]
pub struct BridgeResourceCache {
    lights: Mutex<HashMap<String, LightSnapshot>>,
}

impl BridgeResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(&self, id: &str, desired: &LightState) -> Vec<Error> {
        let lights = self.lights.lock().unwrap();
        match lights.get(id) {
            None => vec![Error::light_not_found(id)],
            Some(light) if !light.reachable => vec![Error::light_unreachable(id)],
            Some(_) if !desired.is_valid() => {
                vec![Error::light_update(id, "no attributes set")]
            }
            Some(_) => Vec::new(),
        }
    }
}

impl LightRegistry for BridgeResourceCache {
    fn replace_all(&self, lights: Vec<LightSnapshot>) {
        let rebuilt = lights
            .into_iter()
            .map(|light| (light.id.clone(), light))
            .collect();
        *self.lights.lock().unwrap() = rebuilt;
    }

    fn snapshot(&self) -> Vec<LightSnapshot> {
        let mut lights: Vec<_> = self.lights.lock().unwrap().values().cloned().collect();
        lights.sort_by(|a, b| a.id.cmp(&b.id));
        lights
    }

    fn fetch_all(&self) -> BoxFuture<'_, Result<RefreshReport>> {
        Box::pin(async move {
            Ok(RefreshReport {
                lights: self.snapshot(),
                errors: Vec::new(),
            })
        })
    }

    fn update_one(
        &self,
        id: &str,
        desired: LightState,
    ) -> BoxFuture<'_, std::result::Result<(), Vec<Error>>> {
        // Owned copy so the future only borrows `self`.
        let id = id.to_string();
        Box::pin(async move {
            let errors = self.validate(&id, &desired);
            if !errors.is_empty() {
                return Err(errors);
            }

            let mut lights = self.lights.lock().unwrap();
            if let Some(light) = lights.get_mut(&id) {
                light.state.apply(&desired);
                Ok(())
            } else {
                Err(vec![Error::light_not_found(&id)])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Brightness;

    fn cache_with(lights: Vec<LightSnapshot>) -> BridgeResourceCache {
        let cache = BridgeResourceCache::new();
        cache.replace_all(lights);
        cache
    }

    #[test]
    fn replace_all_is_wholesale() {
        let cache = cache_with(vec![
            LightSnapshot::new("1", Some("Desk")),
            LightSnapshot::new("2", Some("Shelf")),
        ]);

        cache.replace_all(vec![LightSnapshot::new("2", Some("Shelf"))]);

        let lights = cache.snapshot();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].id, "2");
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let cache = cache_with(vec![
            LightSnapshot::new("10", None),
            LightSnapshot::new("02", None),
            LightSnapshot::new("07", None),
        ]);

        let ids: Vec<_> = cache.snapshot().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, ["02", "07", "10"]);
    }

    #[tokio::test]
    async fn update_one_merges_into_cached_state() {
        let cache = cache_with(vec![LightSnapshot::new("1", None)]);

        let mut desired = LightState::new();
        desired.set_on(true);
        cache.update_one("1", desired).await.unwrap();

        let desired = LightState::from(&Brightness::create(80).unwrap());
        cache.update_one("1", desired).await.unwrap();

        let light = &cache.snapshot()[0];
        assert_eq!(light.state.is_on(), Some(true));
        assert_eq!(light.state.brightness().unwrap().value(), 80);
    }

    #[tokio::test]
    async fn update_one_refuses_unknown_light() {
        let cache = cache_with(vec![LightSnapshot::new("1", None)]);

        let desired = LightState::from(&Brightness::new());
        let errors = cache.update_one("9", desired).await.unwrap_err();
        assert_eq!(errors, vec![Error::light_not_found("9")]);
    }

    #[tokio::test]
    async fn update_one_refuses_unreachable_light() {
        let mut light = LightSnapshot::new("1", None);
        light.reachable = false;
        let cache = cache_with(vec![light]);

        let desired = LightState::from(&Brightness::new());
        let errors = cache.update_one("1", desired).await.unwrap_err();
        assert_eq!(errors, vec![Error::light_unreachable("1")]);
    }

    #[tokio::test]
    async fn update_one_refuses_empty_state() {
        let cache = cache_with(vec![LightSnapshot::new("1", None)]);

        let errors = cache.update_one("1", LightState::new()).await.unwrap_err();
        assert_eq!(errors, vec![Error::light_update("1", "no attributes set")]);
    }

    #[tokio::test]
    async fn fetch_all_answers_from_memory() {
        let cache = cache_with(vec![
            LightSnapshot::new("1", None),
            LightSnapshot::new("2", None),
        ]);

        let report = cache.fetch_all().await.unwrap();
        assert_eq!(report.lights.len(), 2);
        assert!(report.errors.is_empty());
    }
}
