//! GOAP action definitions
//!
//! An action is split in two halves: [`ActionBase`] holds the planning
//! contract (preconditions, effects, cost, target) and the [`Action`] trait
//! adds the runtime behaviour the executor drives each tick. Actions are
//! generic over the agent context `C` they read and mutate.

use std::fmt;

use goap_core::{Target, Vec3};

use crate::config::TravelConfig;
use crate::state::{Assertion, Fact, State};

/// Handle to an action registered in an [`ActionPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub usize);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Planning contract and per-attempt runtime fields shared by every action
#[derive(Debug, Clone)]
pub struct ActionBase {
    preconditions: State,
    effects: State,
    /// Cost of performing the action, before travel is added
    pub base_cost: f32,
    /// Seconds a timed action runs for
    pub duration: f32,
    /// Travel never adds cost (the action happens inside a zone the agent is already in)
    pub travel_exempt: bool,
    target: Option<Target>,
    in_range: bool,
    start_time: Option<f64>,
}

impl ActionBase {
    pub fn new(base_cost: f32) -> Self {
        Self {
            preconditions: State::new(),
            effects: State::new(),
            base_cost,
            duration: 3.0,
            travel_exempt: false,
            target: None,
            in_range: false,
            start_time: None,
        }
    }

    pub fn with_precondition(mut self, key: impl Into<String>, value: impl Into<Fact>) -> Self {
        self.add_precondition(key, value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<Fact>) -> Self {
        self.add_effect(key, value);
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn exempt_from_travel(mut self) -> Self {
        self.travel_exempt = true;
        self
    }

    pub fn preconditions(&self) -> &State {
        &self.preconditions
    }

    pub fn effects(&self) -> &State {
        &self.effects
    }

    pub fn add_precondition(&mut self, key: impl Into<String>, value: impl Into<Fact>) {
        self.preconditions.insert(Assertion::new(key, value));
    }

    pub fn remove_precondition(&mut self, key: &str) -> bool {
        self.preconditions.remove(key)
    }

    pub fn add_effect(&mut self, key: impl Into<String>, value: impl Into<Fact>) {
        self.effects.insert(Assertion::new(key, value));
    }

    pub fn remove_effect(&mut self, key: &str) -> bool {
        self.effects.remove(key)
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: Option<Target>) {
        self.target = target;
    }

    pub fn is_in_range(&self) -> bool {
        self.in_range
    }

    pub fn set_in_range(&mut self, in_range: bool) {
        self.in_range = in_range;
    }

    /// Record when the action started. Only the first call sticks.
    pub fn set_start_time(&mut self, now: f64) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Whether `duration` seconds have passed since the start time
    pub fn check_duration(&self, now: f64) -> bool {
        match self.start_time {
            Some(start) => now - start > self.duration as f64,
            None => false,
        }
    }

    /// Clear everything a previous planning attempt or run left behind
    pub fn reset(&mut self) {
        self.in_range = false;
        self.target = None;
        self.start_time = None;
    }

    /// Cost of walking from `from` to the target
    pub fn travel_cost(&self, from: Vec3, travel: &TravelConfig) -> f32 {
        if self.travel_exempt {
            return 0.0;
        }
        match &self.target {
            Some(target) => travel.travel_cost(target.distance_from(from)),
            None => 0.0,
        }
    }

    /// Base cost plus travel cost, never negative
    pub fn cost(&self, from: Vec3, travel: &TravelConfig) -> f32 {
        (self.base_cost + self.travel_cost(from, travel)).max(0.0)
    }
}

/// Runtime behaviour of an action, driven by the planner and the executor
pub trait Action<C> {
    fn name(&self) -> &str;

    fn base(&self) -> &ActionBase;

    fn base_mut(&mut self) -> &mut ActionBase;

    /// Reset action-specific fields before planning happens again
    fn reset(&mut self) {}

    /// Is the action done?
    fn is_done(&self) -> bool;

    /// Procedurally check if this action can run. May pick a target.
    fn check_procedural_precondition(&mut self, _ctx: &C) -> bool {
        true
    }

    /// Run one step of the action. Returns false if it can no longer
    /// perform, in which case the rest of the plan is abandoned.
    fn perform(&mut self, ctx: &mut C) -> bool;

    /// Does the agent have to be next to the target before performing?
    fn requires_in_range(&self) -> bool;

    fn do_reset(&mut self) {
        self.base_mut().reset();
        self.reset();
    }

    fn preconditions(&self) -> &State {
        self.base().preconditions()
    }

    fn effects(&self) -> &State {
        self.base().effects()
    }

    fn target(&self) -> Option<&Target> {
        self.base().target()
    }

    fn is_in_range(&self) -> bool {
        self.base().is_in_range()
    }

    fn set_in_range(&mut self, in_range: bool) {
        self.base_mut().set_in_range(in_range);
    }

    fn cost(&self, agent_position: Vec3, travel: &TravelConfig) -> f32 {
        self.base().cost(agent_position, travel)
    }
}

/// Data-only action: always runnable, finishes on its first step
#[derive(Debug, Clone)]
pub struct BasicAction {
    pub name: String,
    pub base: ActionBase,
    done: bool,
}

impl BasicAction {
    pub fn new(name: impl Into<String>, base: ActionBase) -> Self {
        Self {
            name: name.into(),
            base,
            done: false,
        }
    }
}

impl<C> Action<C> for BasicAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.done = false;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn perform(&mut self, _ctx: &mut C) -> bool {
        self.done = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        false
    }
}

/// Owns the actions an agent knows about. Ids stay valid after removals.
pub struct ActionPool<C> {
    actions: Vec<Option<Box<dyn Action<C>>>>,
}

impl<C> ActionPool<C> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register an action and return its handle
    pub fn register(&mut self, action: Box<dyn Action<C>>) -> ActionId {
        let id = ActionId(self.actions.len());
        self.actions.push(Some(action));
        id
    }

    pub fn remove(&mut self, id: ActionId) -> Option<Box<dyn Action<C>>> {
        self.actions.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: ActionId) -> Option<&dyn Action<C>> {
        self.actions.get(id.0).and_then(|slot| slot.as_deref())
    }

    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut Box<dyn Action<C>>> {
        self.actions.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Look an action up by name
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.iter()
            .find(|(_, action)| action.name() == name)
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &dyn Action<C>)> {
        self.actions
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_deref().map(|action| (ActionId(i), action)))
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for ActionPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goap_core::EntityId;

    fn eat() -> BasicAction {
        BasicAction::new(
            "eat",
            ActionBase::new(1.0)
                .with_precondition("has_food", true)
                .with_effect("hungry", false),
        )
    }

    #[test]
    fn test_cost_without_target_is_base_cost() {
        let action = eat();
        let cost = Action::<()>::cost(&action, Vec3::ZERO, &TravelConfig::default());
        assert_eq!(cost, 1.0);
    }

    #[test]
    fn test_cost_adds_travel() {
        let mut base = ActionBase::new(1.0);
        base.set_target(Some(Target::new(EntityId::new(), Vec3::new(2.0, 0.0, 0.0))));
        // 2 units at 0.5 units/s = 4 s, at 1 per second
        assert!((base.cost(Vec3::ZERO, &TravelConfig::default()) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_travel_exempt_ignores_distance() {
        let mut base = ActionBase::new(2.0).exempt_from_travel();
        base.set_target(Some(Target::new(EntityId::new(), Vec3::new(100.0, 0.0, 0.0))));
        assert_eq!(base.cost(Vec3::ZERO, &TravelConfig::default()), 2.0);
    }

    #[test]
    fn test_negative_cost_is_clamped() {
        let base = ActionBase::new(-3.0);
        assert_eq!(base.cost(Vec3::ZERO, &TravelConfig::default()), 0.0);
    }

    #[test]
    fn test_reset_clears_runtime_fields() {
        let mut action = eat();
        action.base.set_target(Some(Target::new(EntityId::new(), Vec3::ONE)));
        action.base.set_in_range(true);
        action.base.set_start_time(4.0);
        Action::<()>::perform(&mut action, &mut ());
        assert!(Action::<()>::is_done(&action));

        Action::<()>::do_reset(&mut action);
        assert!(action.base.target().is_none());
        assert!(!action.base.is_in_range());
        assert!(action.base.start_time().is_none());
        assert!(!Action::<()>::is_done(&action));
    }

    #[test]
    fn test_dynamic_contract() {
        let mut base = ActionBase::new(1.0).with_effect("has_wood", true);
        base.remove_effect("has_wood");
        base.add_effect("has_stone", true);
        base.add_precondition("has_pick", true);
        assert_eq!(base.effects().get_bool("has_stone"), Some(true));
        assert_eq!(base.effects().get_bool("has_wood"), None);
        assert!(base.remove_precondition("has_pick"));
        assert!(!base.remove_precondition("has_pick"));
    }

    #[test]
    fn test_duration() {
        let mut base = ActionBase::new(1.0).with_duration(2.0);
        assert!(!base.check_duration(10.0));
        base.set_start_time(1.0);
        base.set_start_time(5.0);
        assert_eq!(base.start_time(), Some(1.0));
        assert!(!base.check_duration(2.5));
        assert!(base.check_duration(3.5));
    }

    #[test]
    fn test_pool_ids_survive_removal() {
        let mut pool: ActionPool<()> = ActionPool::new();
        let a = pool.register(Box::new(eat()));
        let b = pool.register(Box::new(BasicAction::new("sleep", ActionBase::new(2.0))));

        assert!(pool.remove(a).is_some());
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b).map(|action| action.name()), Some("sleep"));
        assert_eq!(pool.find("sleep"), Some(b));
        assert_eq!(pool.len(), 1);
    }
}
