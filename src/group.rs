//! Light grouping for batch operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Error;
use crate::light_state::LightState;
use crate::registry::LightRegistry;

type Result<T> = std::result::Result<T, Error>;

/// A named grouping of lights for batch operations.
///
/// Groups hold registry light ids and apply one desired state to every
/// member. These groupings are independent of whatever rooms or zones the
/// bridge itself has configured.
///
/// # Example
///
/// ```
/// use hue_bridge_rs::LightGroup;
///
/// let mut group = LightGroup::new("Living Room");
/// group.add_member("1").unwrap();
/// group.add_member("4").unwrap();
/// assert_eq!(group.members().len(), 2);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LightGroup {
    name: String,
    members: Vec<String>,
    #[serde(skip)]
    id: Uuid,
    #[serde(skip)]
    linked: bool,
}

impl LightGroup {
    /// Create a new group with the given name.
    pub fn new(name: &str) -> Self {
        LightGroup {
            name: String::from(name),
            members: Vec::new(),
            id: Uuid::new_v4(),
            linked: false,
        }
    }

    /// Link an external ID to this group.
    ///
    /// Can only be called once.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn link(&mut self, id: &Uuid) {
        assert!(!self.linked, "refusing to overwrite id!");
        self.id = *id;
        self.linked = true;
    }

    /// Get the ID of this group.
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Get the name of this group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the member light ids.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Whether the light is a member of this group.
    pub fn contains(&self, light_id: &str) -> bool {
        self.members.iter().any(|id| id == light_id)
    }

    /// Add a light to this group.
    ///
    /// # Example
    ///
    /// ```
    /// use hue_bridge_rs::LightGroup;
    ///
    /// let mut group = LightGroup::new("Office");
    /// group.add_member("7").unwrap();
    /// assert!(group.add_member("7").is_err());
    /// ```
    pub fn add_member(&mut self, light_id: &str) -> Result<()> {
        if self.contains(light_id) {
            return Err(Error::duplicate_member(&self.id, light_id));
        }
        self.members.push(light_id.to_string());
        Ok(())
    }

    /// Remove a light from this group.
    pub fn remove_member(&mut self, light_id: &str) -> Result<()> {
        let position = self
            .members
            .iter()
            .position(|id| id == light_id)
            .ok_or_else(|| Error::light_not_found(light_id))?;
        self.members.remove(position);
        Ok(())
    }

    /// Update this group's attributes from another group.
    ///
    /// # Example
    ///
    /// ```
    /// use hue_bridge_rs::LightGroup;
    ///
    /// let mut group = LightGroup::new("foo");
    /// let other = LightGroup::new("bar");
    /// assert!(group.update(&other));
    /// assert_eq!(group.name(), "bar");
    /// ```
    pub fn update(&mut self, other: &Self) -> bool {
        if self.name == other.name {
            return false;
        }
        self.name.clone_from(&other.name);
        true
    }

    /// Apply one desired state to every member.
    ///
    /// The batch keeps going past failing members; their errors come back
    /// collected once every member was attempted.
    pub async fn apply_state(
        &self,
        registry: &dyn LightRegistry,
        desired: &LightState,
    ) -> std::result::Result<(), Vec<Error>> {
        let mut errors = Vec::new();
        for id in &self.members {
            if let Err(mut member_errors) = registry.update_one(id, desired.clone()).await {
                errors.append(&mut member_errors);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BridgeResourceCache, LightSnapshot};
    use crate::types::Brightness;

    #[test]
    fn duplicate_members_are_refused() {
        let mut group = LightGroup::new("Office");
        group.add_member("1").unwrap();

        let err = group.add_member("1").unwrap_err();
        assert_eq!(err, Error::duplicate_member(group.id(), "1"));
        assert_eq!(group.members().len(), 1);
    }

    #[test]
    fn removing_a_non_member_fails() {
        let mut group = LightGroup::new("Office");
        group.add_member("1").unwrap();

        assert_eq!(
            group.remove_member("2").unwrap_err(),
            Error::light_not_found("2")
        );

        group.remove_member("1").unwrap();
        assert!(group.members().is_empty());
    }

    #[test]
    #[should_panic(expected = "refusing to overwrite id!")]
    fn linking_twice_panics() {
        let mut group = LightGroup::new("Office");
        group.link(&Uuid::new_v4());
        group.link(&Uuid::new_v4());
    }

    #[tokio::test]
    async fn apply_state_keeps_going_past_failures() {
        let cache = BridgeResourceCache::new();
        let mut unreachable = LightSnapshot::new("2", None);
        unreachable.reachable = false;
        cache.replace_all(vec![LightSnapshot::new("1", None), unreachable]);

        let mut group = LightGroup::new("Office");
        group.add_member("1").unwrap();
        group.add_member("2").unwrap();
        group.add_member("3").unwrap();

        let desired = LightState::from(&Brightness::create(40).unwrap());
        let errors = group.apply_state(&cache, &desired).await.unwrap_err();

        assert_eq!(
            errors,
            vec![Error::light_unreachable("2"), Error::light_not_found("3")]
        );
        // The reachable member still got its update.
        assert_eq!(
            cache.snapshot()[0].state.brightness().unwrap().value(),
            40
        );
    }
}
