//! Page lifecycle tracking
//!
//! A page starts once and is torn down once. The coordinator records which
//! resources (feed subscriptions, interval timers) are live so teardown can
//! verify everything it acquired was released.

use crate::{IntegrationError, Result};
use std::collections::BTreeSet;

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Running,
    ShuttingDown,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceType {
    Subscription,
    Timer,
}

/// Lifecycle coordinator for one page
#[derive(Debug)]
pub struct LifecycleCoordinator {
    state: LifecycleState,
    history: Vec<LifecycleState>,
    resources: BTreeSet<(ResourceType, String)>,
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleCoordinator {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            history: vec![LifecycleState::Uninitialized],
            resources: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: LifecycleState) -> Result<()> {
        if !Self::is_valid_transition(self.state, new_state) {
            return Err(IntegrationError::Lifecycle(format!(
                "Invalid transition from {:?} to {:?}",
                self.state, new_state
            )));
        }
        log::debug!("Lifecycle {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.history.push(new_state);
        Ok(())
    }

    fn is_valid_transition(from: LifecycleState, to: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (from, to),
            (Uninitialized, Running) | (Running, ShuttingDown) | (ShuttingDown, Terminated)
        )
    }

    pub fn start(&mut self) -> Result<()> {
        self.transition_to(LifecycleState::Running)
    }

    /// Enter shutdown. Resources must be released before [`Self::finish`].
    pub fn begin_shutdown(&mut self) -> Result<()> {
        self.transition_to(LifecycleState::ShuttingDown)
    }

    /// Complete shutdown, returning how many resources were still registered
    pub fn finish(&mut self) -> Result<usize> {
        let leaked = self.resources.len();
        if leaked > 0 {
            log::warn!("{leaked} resources still registered at teardown");
            self.resources.clear();
        }
        self.transition_to(LifecycleState::Terminated)?;
        Ok(leaked)
    }

    pub fn register_resource(&mut self, resource_type: ResourceType, id: impl Into<String>) {
        let id = id.into();
        log::debug!("Registered {resource_type:?} {id}");
        self.resources.insert((resource_type, id));
    }

    pub fn release_resource(&mut self, resource_type: ResourceType, id: &str) -> bool {
        let released = self
            .resources
            .remove(&(resource_type, id.to_string()));
        if released {
            log::debug!("Released {resource_type:?} {id}");
        }
        released
    }

    pub fn resource_count(&self, resource_type: ResourceType) -> usize {
        self.resources
            .iter()
            .filter(|(kind, _)| *kind == resource_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut lifecycle = LifecycleCoordinator::new();
        lifecycle.start().unwrap();
        assert!(lifecycle.is_running());

        lifecycle.register_resource(ResourceType::Subscription, "live_data");
        lifecycle.register_resource(ResourceType::Timer, "clock");
        assert_eq!(lifecycle.resource_count(ResourceType::Subscription), 1);

        lifecycle.begin_shutdown().unwrap();
        assert!(lifecycle.release_resource(ResourceType::Subscription, "live_data"));
        assert!(lifecycle.release_resource(ResourceType::Timer, "clock"));
        assert!(!lifecycle.release_resource(ResourceType::Timer, "clock"));
        assert_eq!(lifecycle.finish().unwrap(), 0);

        assert_eq!(
            lifecycle.history(),
            &[
                LifecycleState::Uninitialized,
                LifecycleState::Running,
                LifecycleState::ShuttingDown,
                LifecycleState::Terminated,
            ]
        );
    }

    #[test]
    fn test_invalid_transitions() {
        let mut lifecycle = LifecycleCoordinator::new();
        assert!(lifecycle.begin_shutdown().is_err());
        lifecycle.start().unwrap();
        assert!(lifecycle.start().is_err());
        assert_eq!(lifecycle.state(), LifecycleState::Running);
    }

    #[test]
    fn test_leaked_resources_reported() {
        let mut lifecycle = LifecycleCoordinator::new();
        lifecycle.start().unwrap();
        lifecycle.register_resource(ResourceType::Timer, "clock");
        lifecycle.begin_shutdown().unwrap();
        assert_eq!(lifecycle.finish().unwrap(), 1);
        assert_eq!(lifecycle.resource_count(ResourceType::Timer), 0);
    }
}
