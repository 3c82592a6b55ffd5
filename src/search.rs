use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::action;
use crate::fact::Fact;
use crate::heuristic::HeuristicStrategy;
use crate::node::{PlanNode, UniquenessMode};
use crate::{Plan, Result, WorldState};

/// Configuration recognised by a single search pass.
///
/// # Examples
///
/// ```
/// use goap_rooms::{SearchConfig, UniquenessMode};
///
/// let strict = SearchConfig::strict();
/// assert_eq!(strict.uniqueness, UniquenessMode::Strict);
/// assert_eq!(strict.iteration_limit, None);
///
/// let relaxed = SearchConfig::relaxed(100);
/// assert_eq!(relaxed.iteration_limit, Some(100));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Rule for repeating steps within one history
    pub uniqueness: UniquenessMode,
    /// Maximum number of node expansions; `None` is unbounded
    pub iteration_limit: Option<usize>,
}

impl SearchConfig {
    /// Strict uniqueness, no iteration limit.
    pub fn strict() -> Self {
        Self {
            uniqueness: UniquenessMode::Strict,
            iteration_limit: None,
        }
    }

    /// Relaxed uniqueness bounded by `limit` expansions.
    pub fn relaxed(limit: usize) -> Self {
        Self {
            uniqueness: UniquenessMode::Relaxed,
            iteration_limit: Some(limit),
        }
    }

    /// Returns the same configuration with a different iteration limit.
    pub fn with_iteration_limit(mut self, limit: Option<usize>) -> Self {
        self.iteration_limit = limit;
        self
    }
}

/// How a search pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A node with no remaining goals was reached
    Found {
        /// Steps from the initial world to the goal
        plan: Plan,
        /// Nodes expanded before the plan was found
        expansions: usize,
    },
    /// The open set ran dry: no plan exists under this configuration
    Exhausted {
        /// Nodes expanded before giving up
        expansions: usize,
    },
    /// The iteration limit was hit before a plan was found
    BudgetExceeded {
        /// Nodes expanded before giving up
        expansions: usize,
    },
}

impl SearchOutcome {
    /// Number of nodes expanded during the pass.
    pub fn expansions(&self) -> usize {
        match self {
            SearchOutcome::Found { expansions, .. }
            | SearchOutcome::Exhausted { expansions }
            | SearchOutcome::BudgetExceeded { expansions } => *expansions,
        }
    }

    /// The plan, if one was found.
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the plan if one was found.
    pub fn into_plan(self) -> Option<Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Returns true when a plan was found.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

/// An open-set entry. Ordered so the heap pops the lowest score first and,
/// among equal scores, the node inserted earliest.
struct OpenEntry {
    score: u32,
    seq: u64,
    node: PlanNode,
}

impl OpenEntry {
    fn key(&self) -> (u32, u64) {
        (self.score, self.seq)
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap behaves like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// The open set: a min-heap of nodes with insertion-order tie breaking.
struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    next_seq: u64,
}

impl OpenSet {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, node: PlanNode) {
        self.heap.push(OpenEntry {
            score: node.score(),
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<PlanNode> {
        self.heap.pop().map(|entry| entry.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Best-first forward search over plan nodes.
///
/// Nodes are expanded lowest score first. Because the heuristic is not
/// admissible the first plan found is not guaranteed to be the cheapest;
/// only that every goal holds at its end. Each child is goal-tested as soon
/// as it is generated, and the search stops at the first success.
pub struct BestFirstSearch<'h> {
    config: SearchConfig,
    heuristic: &'h dyn HeuristicStrategy,
}

impl<'h> BestFirstSearch<'h> {
    /// Creates a search pass with the given configuration and heuristic.
    pub fn new(config: SearchConfig, heuristic: &'h dyn HeuristicStrategy) -> Self {
        Self { config, heuristic }
    }

    /// The pass configuration.
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Searches for steps by `actor` that make every fact in `goals` hold.
    ///
    /// # Errors
    ///
    /// Only configuration errors in `world` (a missing portal, an activator
    /// without a target, an actor without a location) are errors. Running out
    /// of nodes or budget is reported through [`SearchOutcome`].
    pub fn search(&self, world: &WorldState, goals: &[Fact], actor: &str) -> Result<SearchOutcome> {
        let root = PlanNode::root(world.clone(), goals.to_vec(), actor, self.heuristic);
        if root.is_goal() {
            log::debug!("Goals already hold, nothing to plan");
            return Ok(SearchOutcome::Found {
                plan: Plan::default(),
                expansions: 0,
            });
        }

        let mut open = OpenSet::new();
        open.push(root);
        let mut expansions = 0;

        while let Some(node) = open.pop() {
            if let Some(limit) = self.config.iteration_limit {
                if expansions >= limit {
                    log::debug!("Iteration limit {} reached", limit);
                    return Ok(SearchOutcome::BudgetExceeded { expansions });
                }
            }
            expansions += 1;
            log::debug!(
                "Generating nodes [{}] (open list len = {}) score = {} history = {:?}",
                expansions,
                open.len() + 1,
                node.score(),
                node.history()
            );

            for step in action::valid_actions(actor, node.world())? {
                if !node.can_apply(&step, self.config.uniqueness)? {
                    continue;
                }
                let child = node.child(step, self.heuristic)?;
                if child.is_goal() {
                    return Ok(SearchOutcome::Found {
                        plan: Plan::new(child.into_history()),
                        expansions,
                    });
                }
                log::trace!(
                    " - child {:?} score = {}",
                    child.history().last(),
                    child.score()
                );
                open.push(child);
            }
        }

        Ok(SearchOutcome::Exhausted { expansions })
    }
}
