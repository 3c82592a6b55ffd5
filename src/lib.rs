pub mod action;
mod config;
mod error;
mod fact;
pub mod heuristic;
mod node;
mod plan;
mod planner;
pub mod reference;
mod search;
mod visualizer;
mod world_def;
mod world_state;

pub use action::{ActionKind, Step};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use fact::{AttributeKey, Fact, RoomId, SubjectId, SubjectKind, Value};
pub use heuristic::{HeuristicStrategy, RoomDistanceHeuristic, RoomDistances};
pub use node::{PlanNode, UniquenessMode};
pub use plan::Plan;
pub use planner::Planner;
pub use search::{BestFirstSearch, SearchConfig, SearchOutcome};
pub use visualizer::GoapVisualizer;
pub use world_def::{ActorDefinition, GameObject, WorldDefinition};
pub use world_state::WorldState;
