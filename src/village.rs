//! A single villager foraging, eating and sleeping under a GOAP agent

use goap_agent::{
    ExecutionError, GoapAgent, Locomotion, PlanOutcomeSink, WorldStateProvider,
};
use goap_core::{closest_target, EntityId, Positioned, SimTime, Target, Vec3};
use goap_planner::{
    Action, ActionBase, Goal, Plan, PlanError, PlannerConfig, State, TracingTrace,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::settings::SimSettings;

const HUNGER_PER_SECOND: f32 = 0.02;
const FATIGUE_PER_SECOND: f32 = 0.01;
const HUNGRY_AT: f32 = 0.6;
const TIRED_AT: f32 = 0.3;
const REACH: f32 = 0.5;

/// The villager and everything it can see
pub struct Village {
    pub time: SimTime,
    position: Vec3,
    speed: f32,
    pub hunger: f32,
    pub energy: f32,
    carrying_food: bool,
    food: Vec<Target>,
    pub stats: VillageStats,
    replan_requested: bool,
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VillageStats {
    pub plans_found: u32,
    pub plans_failed: u32,
    pub plans_aborted: u32,
    pub meals: u32,
    pub naps: u32,
}

impl Village {
    pub fn new(settings: &SimSettings) -> Self {
        let sim = &settings.simulation;
        let mut rng = StdRng::seed_from_u64(sim.seed);
        let food = (0..sim.food_count)
            .map(|_| {
                let x = rng.gen_range(-sim.area..=sim.area);
                let z = rng.gen_range(-sim.area..=sim.area);
                Target::new(EntityId::new(), Vec3::new(x, 0.0, z))
            })
            .collect();

        Self {
            time: SimTime::new(settings.time.clone()),
            position: Vec3::ZERO,
            speed: sim.villager_speed,
            hunger: HUNGRY_AT,
            energy: 1.0,
            carrying_food: false,
            food,
            stats: VillageStats::default(),
            replan_requested: false,
        }
    }

    pub fn food_left(&self) -> usize {
        self.food.len()
    }

    /// Advance needs by the tick's scaled delta
    pub fn update(&mut self, raw_delta: f32) {
        self.time.update(raw_delta);
        let delta = self.time.delta_time;
        let was_tired = self.energy <= TIRED_AT;
        self.hunger = (self.hunger + HUNGER_PER_SECOND * delta).min(1.0);
        self.energy = (self.energy - FATIGUE_PER_SECOND * delta).max(0.0);
        if !was_tired && self.energy <= TIRED_AT {
            // rest may now outrank the goal being worked on
            self.replan_requested = true;
        }
    }

    fn now(&self) -> f64 {
        self.time.total_time
    }

    fn take_food(&mut self, entity: EntityId) -> bool {
        let before = self.food.len();
        self.food.retain(|food| food.entity != entity);
        self.food.len() < before
    }
}

impl Positioned for Village {
    fn position(&self) -> Vec3 {
        self.position
    }
}

impl WorldStateProvider for Village {
    fn world_state(&self) -> State {
        State::new()
            .with("hungry", self.hunger >= HUNGRY_AT)
            .with("tired", self.energy <= TIRED_AT)
            .with("has_food", self.carrying_food)
    }

    fn create_goal_state(&self) -> Option<Goal> {
        let mut goals = Vec::new();
        if self.hunger >= HUNGRY_AT {
            goals.push(Goal::new("eat", State::from_bool("hungry", false)).with_priority(self.hunger));
        }
        if self.energy <= TIRED_AT {
            goals.push(Goal::new("rest", State::from_bool("tired", false)).with_priority(1.0 - self.energy));
        }
        goals
            .into_iter()
            .max_by(|a, b| a.priority.total_cmp(&b.priority))
    }
}

impl PlanOutcomeSink for Village {
    fn plan_found(&mut self, goal: &Goal, plan: &Plan) {
        self.stats.plans_found += 1;
        debug!(goal = %goal.name, steps = plan.len(), "villager has a plan");
    }

    fn plan_failed(&mut self, goal: &Goal, error: &PlanError) {
        self.stats.plans_failed += 1;
        debug!(goal = %goal.name, error = %error, "villager could not plan");
    }

    fn plan_aborted(&mut self, error: &ExecutionError) {
        self.stats.plans_aborted += 1;
        warn!(error = %error, "villager gave up on its plan");
    }

    fn actions_finished(&mut self) {
        debug!("villager finished its plan");
    }

    fn take_replan_request(&mut self) -> bool {
        std::mem::take(&mut self.replan_requested)
    }
}

impl Locomotion for Village {
    fn move_agent(&mut self, target: &Target) -> bool {
        let to_target = target.position - self.position;
        let distance = to_target.length();
        if distance <= REACH {
            return true;
        }
        let step = self.speed * self.time.delta_time;
        if step >= distance - REACH {
            self.position = target.position - to_target / distance * REACH;
            true
        } else {
            self.position += to_target / distance * step;
            false
        }
    }
}

/// Walk to the nearest food and pick it up
pub struct PickUpFood {
    base: ActionBase,
    picked_up: bool,
}

impl PickUpFood {
    pub fn new() -> Self {
        Self {
            base: ActionBase::new(1.0)
                .with_precondition("has_food", false)
                .with_effect("has_food", true),
            picked_up: false,
        }
    }
}

impl Default for PickUpFood {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<Village> for PickUpFood {
    fn name(&self) -> &str {
        "pick_up_food"
    }

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.picked_up = false;
    }

    fn is_done(&self) -> bool {
        self.picked_up
    }

    fn check_procedural_precondition(&mut self, ctx: &Village) -> bool {
        let target = closest_target(ctx.food.iter().copied(), ctx.position);
        self.base.set_target(target);
        target.is_some()
    }

    fn perform(&mut self, ctx: &mut Village) -> bool {
        let Some(target) = self.base.target().copied() else {
            return false;
        };
        // someone else may have taken it since planning
        if !ctx.take_food(target.entity) {
            return false;
        }
        ctx.carrying_food = true;
        self.picked_up = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        true
    }
}

/// Eat carried food over a few seconds
pub struct Eat {
    base: ActionBase,
    eaten: bool,
}

impl Eat {
    pub fn new() -> Self {
        Self {
            base: ActionBase::new(1.0)
                .with_precondition("has_food", true)
                .with_effect("has_food", false)
                .with_effect("hungry", false)
                .with_duration(2.0),
            eaten: false,
        }
    }
}

impl Default for Eat {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<Village> for Eat {
    fn name(&self) -> &str {
        "eat"
    }

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.eaten = false;
    }

    fn is_done(&self) -> bool {
        self.eaten
    }

    fn perform(&mut self, ctx: &mut Village) -> bool {
        if !ctx.carrying_food {
            return false;
        }
        self.base.set_start_time(ctx.now());
        if self.base.check_duration(ctx.now()) {
            ctx.carrying_food = false;
            ctx.hunger = 0.0;
            ctx.stats.meals += 1;
            self.eaten = true;
        }
        true
    }

    fn requires_in_range(&self) -> bool {
        false
    }
}

/// Nap wherever the villager stands
pub struct Sleep {
    base: ActionBase,
    rested: bool,
}

impl Sleep {
    pub fn new() -> Self {
        Self {
            base: ActionBase::new(2.0)
                .with_effect("tired", false)
                .with_duration(5.0),
            rested: false,
        }
    }
}

impl Default for Sleep {
    fn default() -> Self {
        Self::new()
    }
}

impl Action<Village> for Sleep {
    fn name(&self) -> &str {
        "sleep"
    }

    fn base(&self) -> &ActionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn reset(&mut self) {
        self.rested = false;
    }

    fn is_done(&self) -> bool {
        self.rested
    }

    fn perform(&mut self, ctx: &mut Village) -> bool {
        self.base.set_start_time(ctx.now());
        if self.base.check_duration(ctx.now()) {
            ctx.energy = 1.0;
            ctx.stats.naps += 1;
            self.rested = true;
        }
        true
    }

    fn requires_in_range(&self) -> bool {
        false
    }
}

/// An agent that knows how to feed and rest a villager
pub fn villager_agent(config: PlannerConfig) -> GoapAgent<Village> {
    let mut agent = GoapAgent::new(config).with_trace(Box::new(TracingTrace));
    let pick_up = agent.register_action(Box::new(PickUpFood::new()));
    let eat = agent.register_action(Box::new(Eat::new()));
    let sleep = agent.register_action(Box::new(Sleep::new()));
    agent.map_goal("eat", [pick_up, eat]);
    agent.map_goal("rest", [sleep]);
    agent
}

/// Run the village for the configured number of ticks
pub fn run(settings: &SimSettings) -> VillageStats {
    let mut village = Village::new(settings);
    let mut agent = villager_agent(settings.planner.clone());

    info!(
        ticks = settings.simulation.ticks,
        food = village.food_left(),
        "village starting"
    );
    for _ in 0..settings.simulation.ticks {
        village.update(settings.simulation.delta);
        agent.tick(&mut village);
    }
    info!(
        meals = village.stats.meals,
        naps = village.stats.naps,
        food_left = village.food_left(),
        elapsed = village.time.total_time,
        "village finished"
    );
    village.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use goap_agent::AgentState;

    fn settings() -> SimSettings {
        let mut settings = SimSettings::default();
        settings.planner.slice_budget_ms = 60_000;
        settings
    }

    #[test]
    fn test_food_placement_is_seeded() {
        let a = Village::new(&settings());
        let b = Village::new(&settings());
        let positions = |v: &Village| v.food.iter().map(|f| f.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.food_left(), 5);
    }

    #[test]
    fn test_hungry_villager_wants_to_eat() {
        let village = Village::new(&settings());
        let goal = village.create_goal_state().unwrap();
        assert_eq!(goal.name, "eat");
        assert_eq!(village.world_state().get_bool("hungry"), Some(true));
    }

    #[test]
    fn test_content_villager_has_no_goal() {
        let mut village = Village::new(&settings());
        village.hunger = 0.0;
        assert!(village.create_goal_state().is_none());
    }

    #[test]
    fn test_getting_tired_requests_replan_once() {
        let mut village = Village::new(&settings());
        village.energy = TIRED_AT + 0.0005;
        village.update(0.1);
        assert!(village.take_replan_request());
        assert!(!village.take_replan_request());

        village.update(0.1);
        assert!(!village.take_replan_request());
    }

    #[test]
    fn test_bad_area_does_not_panic() {
        let mut settings = settings();
        settings.simulation.area = -4.0;
        settings.simulation.sanitize();
        let village = Village::new(&settings);
        assert_eq!(village.food_left(), 5);
    }

    #[test]
    fn test_move_agent_stops_within_reach() {
        let mut village = Village::new(&settings());
        village.update(1.0);
        let target = Target::new(EntityId::new(), Vec3::new(3.0, 0.0, 0.0));

        // 2 units per second with a 0.25 s clamped delta
        assert!(!village.move_agent(&target));
        assert!((village.position.x - 0.5).abs() < 1e-5);
        for _ in 0..4 {
            village.move_agent(&target);
        }
        assert!(village.move_agent(&target));
        assert!(village.position.distance(target.position) <= REACH + 1e-5);
    }

    #[test]
    fn test_villager_plans_to_forage_then_eat() {
        let mut village = Village::new(&settings());
        let mut agent = villager_agent(settings().planner);

        agent.tick(&mut village);
        assert_eq!(agent.state(), AgentState::PerformAction);
        let names: Vec<&str> = agent.current_plan().map(|step| step.name.as_str()).collect();
        assert_eq!(names, ["pick_up_food", "eat"]);
    }

    #[test]
    fn test_villager_eats() {
        let settings = settings();
        let mut village = Village::new(&settings);
        let mut agent = villager_agent(settings.planner.clone());

        for _ in 0..400 {
            village.update(settings.simulation.delta);
            agent.tick(&mut village);
            if village.stats.meals > 0 {
                break;
            }
        }
        assert_eq!(village.stats.meals, 1);
        assert_eq!(village.food_left(), 4);
        assert!(village.hunger < HUNGRY_AT);
    }

    #[test]
    fn test_no_food_means_no_plan() {
        let mut settings = settings();
        settings.simulation.food_count = 0;
        let mut village = Village::new(&settings);
        let mut agent = villager_agent(settings.planner.clone());

        agent.tick(&mut village);
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(village.stats.plans_failed, 1);
    }
}
