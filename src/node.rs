//! Plan nodes: the unit the search expands.
//!
//! Each node owns its own copy of the world, the goal facts still missing, and
//! the steps taken so far. A child is made by cloning its parent and applying
//! exactly one step; once inserted into the open set it is never touched again.

use serde::{Deserialize, Serialize};

use crate::action::{self, Step};
use crate::fact::Fact;
use crate::heuristic::HeuristicStrategy;
use crate::{Result, WorldState};

/// How strictly a node refuses to repeat steps already in its history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessMode {
    /// A step may appear at most once per history.
    #[default]
    Strict,
    /// A step may not immediately repeat the one before it.
    Relaxed,
}

/// A snapshot of the search: world, remaining goals, history and score.
#[derive(Debug, Clone)]
pub struct PlanNode {
    world: WorldState,
    goals: Vec<Fact>,
    history: Vec<Step>,
    cost: u32,
    score: u32,
}

impl PlanNode {
    /// Creates the root node of a search.
    ///
    /// Goals that already hold in `world` are dropped, so a root with no
    /// goals left means the problem is solved by the empty plan.
    pub fn root(
        world: WorldState,
        mut goals: Vec<Fact>,
        actor: &str,
        heuristic: &dyn HeuristicStrategy,
    ) -> Self {
        goals.retain(|goal| !world.holds(goal));
        let score = heuristic.calculate(&world, actor, &goals);
        Self {
            world,
            goals,
            history: Vec::new(),
            cost: 0,
            score,
        }
    }

    /// The node's world snapshot.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Goal facts that do not hold yet, in the order they were given.
    pub fn goals(&self) -> &[Fact] {
        &self.goals
    }

    /// Steps taken from the root to reach this node.
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Sum of the costs of every step in the history.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Accumulated cost plus the weighted heuristic estimate.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// True once every goal fact holds.
    pub fn is_goal(&self) -> bool {
        self.goals.is_empty()
    }

    /// Whether `step` may be applied to this node.
    ///
    /// The step's fact preconditions must all hold, its procedural guard must
    /// pass, and it must not break the uniqueness rule for `mode`.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors raised while resolving preconditions.
    pub fn can_apply(&self, step: &Step, mode: UniquenessMode) -> Result<bool> {
        let repeated = match mode {
            UniquenessMode::Strict => self.history.contains(step),
            UniquenessMode::Relaxed => self.history.last() == Some(step),
        };
        if repeated {
            return Ok(false);
        }
        if !action::preconditions(step, &self.world)?.is_empty() {
            return Ok(false);
        }
        Ok(action::passes_guard(step, &self.world))
    }

    /// Applies `step` in place: executes it, drops goals that now hold,
    /// records it in the history and rescores the node.
    pub fn apply(&mut self, step: Step, heuristic: &dyn HeuristicStrategy) -> Result<()> {
        self.world.apply_action(&step)?;
        let world = &self.world;
        self.goals.retain(|goal| !world.holds(goal));
        self.cost = self.cost.saturating_add(step.cost());
        self.score = self
            .cost
            .saturating_add(heuristic.calculate(&self.world, &step.actor, &self.goals));
        self.history.push(step);
        Ok(())
    }

    /// Clones this node and applies `step` to the clone.
    pub fn child(&self, step: Step, heuristic: &dyn HeuristicStrategy) -> Result<PlanNode> {
        let mut child = self.clone();
        child.apply(step, heuristic)?;
        Ok(child)
    }

    /// Consumes the node, returning its history.
    pub fn into_history(self) -> Vec<Step> {
        self.history
    }
}
