//! Plans: ordered sequences of steps produced by the search.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{self, Step};
use crate::{PlannerError, Result, WorldState};

/// An ordered sequence of `(actor, action, target)` steps.
///
/// An empty plan is a valid answer: it means the goals already held.
///
/// # Examples
///
/// ```
/// use goap_rooms::action::{ActionKind, Step};
/// use goap_rooms::Plan;
///
/// let plan = Plan::new(vec![
///     Step::new("Agent", ActionKind::ActivatePowerSource, "Shuttle Generator"),
///     Step::new("Agent", ActionKind::ActivateLaunch, "Shuttle Activator"),
/// ]);
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.cost(), 2);
/// assert!(!plan.repeats_step());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    /// Wraps a list of steps.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true for the empty plan.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Sum of the step costs.
    pub fn cost(&self) -> u32 {
        self.steps.iter().map(Step::cost).sum()
    }

    /// Whether any step appears more than once.
    pub fn repeats_step(&self) -> bool {
        let mut seen = HashSet::new();
        !self.steps.iter().all(|step| seen.insert(step))
    }

    /// Executes the plan against a copy of `world`, checking every step.
    ///
    /// Each step must have its fact preconditions met and its procedural
    /// guard passing at the moment it runs.
    ///
    /// # Errors
    ///
    /// `PreconditionNotMet` for the first step that could not run, or any
    /// configuration error raised while executing.
    pub fn replay(&self, world: &WorldState) -> Result<WorldState> {
        let mut world = world.clone();
        for (index, step) in self.steps.iter().enumerate() {
            let unmet = action::preconditions(step, &world)?;
            if !unmet.is_empty() {
                let unmet: Vec<_> = unmet.iter().map(ToString::to_string).collect();
                return Err(PlannerError::PreconditionNotMet(format!(
                    "step {} {} needs {}",
                    index + 1,
                    step,
                    unmet.join(", ")
                )));
            }
            if !action::passes_guard(step, &world) {
                return Err(PlannerError::PreconditionNotMet(format!(
                    "step {} {} failed its guard",
                    index + 1,
                    step
                )));
            }
            world.apply_action(step)?;
        }
        Ok(world)
    }
}

impl From<Vec<Step>> for Plan {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

impl IntoIterator for Plan {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return writeln!(f, "  - None");
        }
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {}. {}", index + 1, step)?;
        }
        Ok(())
    }
}
