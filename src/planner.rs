//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner ties a planning problem together:
//! - The starting [`WorldState`]
//! - The goal facts that must all hold at the end
//! - The actor whose allowed actions are searched
//! - A heuristic and the pass limits from [`PlannerConfig`]
//!
//! ## Overview
//!
//! Planning runs forward from the starting world:
//! 1. Every step the actor could take from its room is enumerated
//! 2. Steps whose preconditions, guard and uniqueness rule pass become children
//! 3. Children are expanded lowest score first, score being cost plus
//!    the weighted room distance to the first open goal
//! 4. The first child in which every goal holds ends the search
//!
//! [`Planner::plan_mixed`] runs this twice if it has to. A strict pass, where
//! no step may appear twice in one plan, finds short clean plans and always
//! terminates. Only when it fails does a relaxed pass run, which lets a step
//! recur as long as it does not immediately repeat itself. That pass is
//! capped, since nothing else stops it from walking in circles.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_rooms::action::ActionKind;
//! use goap_rooms::{reference, AttributeKey, Fact, Planner};
//!
//! let goal = Fact::new(reference::SHUTTLE_LAUNCH, AttributeKey::Activated, true);
//! let planner = Planner::new(reference::reference_world(), vec![goal], reference::AGENT);
//!
//! let plan = planner.plan_mixed().unwrap().expect("the shuttle can be launched");
//! assert_eq!(plan.last().unwrap().kind, ActionKind::ActivateLaunch);
//! ```

use crate::config::PlannerConfig;
use crate::fact::{Fact, SubjectId};
use crate::heuristic::{HeuristicStrategy, RoomDistanceHeuristic, RoomDistances};
use crate::search::{BestFirstSearch, SearchConfig, SearchOutcome};
use crate::{Plan, Result, WorldState};

/// A planning problem and the strategy used to solve it.
///
/// # Examples
///
/// Planning with an explicit distance table and a tighter fallback cap:
///
/// ```
/// use goap_rooms::{reference, AttributeKey, Fact, Planner, PlannerConfig, RoomDistanceHeuristic};
///
/// let config = PlannerConfig {
///     fallback_iteration_limit: 50,
///     ..PlannerConfig::default()
/// };
/// let goal = Fact::new(reference::SHUTTLE_GENERATOR, AttributeKey::Powered, true);
/// let planner = Planner::new(reference::reference_world(), vec![goal], reference::AGENT)
///     .with_config(config)
///     .with_heuristic(Box::new(RoomDistanceHeuristic::new(reference::reference_distances())));
///
/// let plan = planner.plan_mixed().unwrap().unwrap();
/// assert!(!plan.repeats_step());
/// ```
pub struct Planner {
    world: WorldState,
    goals: Vec<Fact>,
    actor: SubjectId,
    config: PlannerConfig,
    distances: RoomDistances,
    heuristic: Option<Box<dyn HeuristicStrategy>>,
}

impl Planner {
    /// Creates a planner with the default configuration.
    ///
    /// Unless replaced, the heuristic measures room distances derived from
    /// the world's doors.
    pub fn new(world: WorldState, goals: Vec<Fact>, actor: impl Into<SubjectId>) -> Self {
        let distances = RoomDistances::from_portals(&world);
        Self {
            world,
            goals,
            actor: actor.into(),
            config: PlannerConfig::default(),
            distances,
            heuristic: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the room-distance heuristic with a custom one. The configured
    /// heuristic weight no longer applies.
    pub fn with_heuristic(mut self, heuristic: Box<dyn HeuristicStrategy>) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    /// Replaces the distance table of the room-distance heuristic.
    pub fn with_distances(mut self, distances: RoomDistances) -> Self {
        self.distances = distances;
        self
    }

    /// The starting world.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// The goal facts.
    pub fn goals(&self) -> &[Fact] {
        &self.goals
    }

    /// The planning actor.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// The active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The distance table used by the room-distance heuristic.
    pub fn distances(&self) -> &RoomDistances {
        &self.distances
    }

    /// Runs a single search pass.
    ///
    /// # Errors
    ///
    /// Fails only on a malformed world. Failing to find a plan is reported
    /// through the returned [`SearchOutcome`].
    pub fn plan(&self, config: SearchConfig) -> Result<SearchOutcome> {
        let default_heuristic;
        let heuristic: &dyn HeuristicStrategy = match &self.heuristic {
            Some(heuristic) => heuristic.as_ref(),
            None => {
                default_heuristic = RoomDistanceHeuristic::with_weight(
                    self.distances.clone(),
                    self.config.heuristic_weight,
                );
                &default_heuristic
            }
        };
        let search = BestFirstSearch::new(config, heuristic);
        let outcome = search.search(&self.world, &self.goals, &self.actor)?;
        log_outcome(&config, &outcome);
        Ok(outcome)
    }

    /// Plans with a strict pass, falling back to a capped relaxed pass.
    ///
    /// Returns `Ok(None)` when neither pass finds a plan, and an empty plan
    /// when the goals already hold.
    ///
    /// # Errors
    ///
    /// Fails only on a malformed world.
    pub fn plan_mixed(&self) -> Result<Option<Plan>> {
        let strict = self.plan(self.config.strict_pass())?;
        if let SearchOutcome::Found { plan, .. } = strict {
            return Ok(Some(plan));
        }

        log::warn!(
            "No strict plan after {} expansions; retrying with repeats allowed (limit {})",
            strict.expansions(),
            self.config.fallback_iteration_limit
        );
        let relaxed = self.plan(self.config.fallback_pass())?;
        Ok(relaxed.into_plan())
    }
}

fn log_outcome(config: &SearchConfig, outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Found { plan, expansions } => {
            let per_action = if plan.is_empty() {
                0.0
            } else {
                *expansions as f64 / plan.len() as f64
            };
            log::info!(
                "Solution found ({:?}): {} steps, {} iterations, {:.2} iterations per action",
                config.uniqueness,
                plan.len(),
                expansions,
                per_action
            );
        }
        SearchOutcome::Exhausted { expansions } => {
            log::info!(
                "No solution ({:?}): open set exhausted after {} iterations",
                config.uniqueness,
                expansions
            );
        }
        SearchOutcome::BudgetExceeded { expansions } => {
            log::info!(
                "No solution ({:?}): stopped at the iteration limit after {} iterations",
                config.uniqueness,
                expansions
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::fact::AttributeKey;
    use crate::heuristic::ZeroHeuristic;
    use crate::reference::{self, AGENT};

    fn launch_goal() -> Vec<Fact> {
        vec![Fact::new(reference::SHUTTLE_LAUNCH, AttributeKey::Activated, true)]
    }

    #[test]
    fn test_strict_plan_launches_shuttle() {
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT);
        let plan = planner.plan(SearchConfig::strict()).unwrap().into_plan().unwrap();
        let end = plan.replay(planner.world()).unwrap();
        assert!(end.satisfies(planner.goals()));
        assert_eq!(plan.last().unwrap().kind, ActionKind::ActivateLaunch);
        assert_eq!(planner.actor(), AGENT);
        assert!(plan.steps().iter().all(|step| step.actor == planner.actor()));
    }

    #[test]
    fn test_mixed_returns_strict_plan_when_it_exists() {
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT);
        let mixed = planner.plan_mixed().unwrap().unwrap();
        let strict = planner.plan(SearchConfig::strict()).unwrap().into_plan().unwrap();
        assert_eq!(mixed, strict);
    }

    #[test]
    fn test_mixed_falls_back_for_round_trip() {
        let planner = Planner::new(reference::return_trip_world(), launch_goal(), AGENT);
        assert!(!planner.plan(SearchConfig::strict()).unwrap().is_found());

        let plan = planner.plan_mixed().unwrap().unwrap();
        assert!(plan.repeats_step());
        let end = plan.replay(planner.world()).unwrap();
        assert!(end.satisfies(planner.goals()));
    }

    #[test]
    fn test_mixed_gives_up_when_unreachable() {
        let goals = vec![Fact::new("Escape Pod", AttributeKey::Activated, true)];
        let planner = Planner::new(reference::reference_world(), goals, AGENT);
        assert_eq!(planner.plan_mixed().unwrap(), None);
    }

    #[test]
    fn test_satisfied_goal_gives_empty_plan() {
        let goals = vec![Fact::new(reference::RED_CARD, AttributeKey::Location, reference::ROOM_1)];
        let planner = Planner::new(reference::reference_world(), goals, AGENT);
        assert_eq!(planner.plan_mixed().unwrap(), Some(Plan::default()));
    }

    #[test]
    fn test_strict_limit_is_honoured() {
        let config = PlannerConfig {
            strict_iteration_limit: Some(1),
            ..PlannerConfig::default()
        };
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT)
            .with_config(config)
            .with_heuristic(Box::new(ZeroHeuristic));
        let outcome = planner.plan(planner.config().strict_pass()).unwrap();
        assert_eq!(outcome, SearchOutcome::BudgetExceeded { expansions: 1 });
    }

    #[test]
    fn test_default_distances_come_from_doors() {
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT);
        assert_eq!(planner.distances(), &reference::reference_distances());
    }

    #[test]
    fn test_with_distances_uses_table() {
        let mut distances = RoomDistances::new();
        distances.insert(reference::ROOM_1, reference::ROOM_3, 7);
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT)
            .with_distances(distances.clone());
        assert_eq!(planner.distances(), &distances);
        assert!(planner.plan_mixed().unwrap().is_some());
    }
}
