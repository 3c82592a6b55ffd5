//! Room-distance heuristic used to order the open set.
//!
//! The estimate is a greedy bias, not a lower bound: it is scaled by a weight
//! and added to the accumulated action cost, so plans found with it are not
//! guaranteed to be the cheapest. It never prunes nodes and never decides
//! whether a goal holds.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::fact::{AttributeKey, Fact, RoomId, Value};
use crate::WorldState;

/// Weight applied to the room distance in node scores.
pub const DEFAULT_HEURISTIC_WEIGHT: u32 = 5;

/// A trait for heuristic functions used to score plan nodes.
pub trait HeuristicStrategy: Send + Sync {
    /// Estimates the remaining effort for `actor` to reach `goals` in `world`.
    fn calculate(&self, world: &WorldState, actor: &str, goals: &[Fact]) -> u32;
}

/// Zero heuristic: the search degenerates to ordering by accumulated cost.
pub struct ZeroHeuristic;

impl HeuristicStrategy for ZeroHeuristic {
    fn calculate(&self, _world: &WorldState, _actor: &str, _goals: &[Fact]) -> u32 {
        0
    }
}

/// Symmetric table of travel costs between rooms.
///
/// The diagonal is always zero. Pairs that were never entered also read as
/// zero, which keeps the heuristic neutral for rooms it knows nothing about.
///
/// # Examples
///
/// ```
/// use goap_rooms::heuristic::RoomDistances;
///
/// let mut distances = RoomDistances::new();
/// distances.insert("Room 1", "Room 3", 2);
/// assert_eq!(distances.distance("Room 3", "Room 1"), 2);
/// assert_eq!(distances.distance("Room 2", "Room 2"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDistances {
    table: BTreeMap<(RoomId, RoomId), u32>,
}

impl RoomDistances {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Records the distance between two rooms, in both directions.
    pub fn insert(&mut self, a: impl Into<RoomId>, b: impl Into<RoomId>, distance: u32) {
        let key = ordered(a.into(), b.into());
        if key.0 != key.1 {
            self.table.insert(key, distance);
        }
    }

    /// Distance between two rooms.
    pub fn distance(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        let key = ordered(a.to_string(), b.to_string());
        self.table.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct room pairs recorded.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if no pair has been recorded.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Derives hop counts from the portals in a world.
    ///
    /// Every room named by a location or a portal endpoint becomes a node,
    /// every portal an edge, and each pair of connected rooms gets its
    /// breadth-first hop count. Rooms with no path between them are left out.
    pub fn from_portals(world: &WorldState) -> Self {
        let mut rooms = BTreeSet::new();
        let mut adjacency: BTreeMap<RoomId, BTreeSet<RoomId>> = BTreeMap::new();
        for subject in world.subjects() {
            if let Some(room) = world.location(subject) {
                rooms.insert(room.to_string());
            }
            if let Some(Value::Pair(a, b)) = world.get(subject, AttributeKey::Portal) {
                rooms.insert(a.clone());
                rooms.insert(b.clone());
                adjacency.entry(a.clone()).or_default().insert(b.clone());
                adjacency.entry(b.clone()).or_default().insert(a.clone());
            }
        }

        let mut distances = RoomDistances::new();
        for start in &rooms {
            let mut hops: BTreeMap<&str, u32> = BTreeMap::new();
            let mut queue = VecDeque::new();
            hops.insert(start.as_str(), 0);
            queue.push_back(start.as_str());
            while let Some(room) = queue.pop_front() {
                let next_hop = hops.get(room).copied().unwrap_or(0) + 1;
                if let Some(neighbours) = adjacency.get(room) {
                    for neighbour in neighbours {
                        if !hops.contains_key(neighbour.as_str()) {
                            hops.insert(neighbour.as_str(), next_hop);
                            queue.push_back(neighbour.as_str());
                        }
                    }
                }
            }
            for (room, hop) in hops {
                distances.insert(start.clone(), room, hop);
            }
        }
        distances
    }
}

fn ordered(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Scores a node by how far the actor stands from the first remaining goal.
///
/// The goal's room is the subject's location; for a carried subject, its
/// carrier's location; for a portal, whichever endpoint is nearer. Subjects
/// that cannot be placed contribute nothing.
pub struct RoomDistanceHeuristic {
    distances: RoomDistances,
    weight: u32,
}

impl RoomDistanceHeuristic {
    /// Creates the heuristic with the default weight.
    pub fn new(distances: RoomDistances) -> Self {
        Self::with_weight(distances, DEFAULT_HEURISTIC_WEIGHT)
    }

    /// Creates the heuristic with a custom weight.
    pub fn with_weight(distances: RoomDistances, weight: u32) -> Self {
        Self { distances, weight }
    }

    /// The underlying distance table.
    pub fn distances(&self) -> &RoomDistances {
        &self.distances
    }

    fn distance_to(&self, world: &WorldState, here: &str, subject: &str) -> u32 {
        if let Some(room) = world.location(subject) {
            return self.distances.distance(here, room);
        }
        if let Some(Value::Symbol(carrier)) = world.get(subject, AttributeKey::CarriedBy) {
            return world
                .location(carrier)
                .map_or(0, |room| self.distances.distance(here, room));
        }
        if let Some(Value::Pair(a, b)) = world.get(subject, AttributeKey::Portal) {
            return self
                .distances
                .distance(here, a)
                .min(self.distances.distance(here, b));
        }
        0
    }
}

impl HeuristicStrategy for RoomDistanceHeuristic {
    fn calculate(&self, world: &WorldState, actor: &str, goals: &[Fact]) -> u32 {
        let (Some(goal), Some(here)) = (goals.first(), world.location(actor)) else {
            return 0;
        };
        self.distance_to(world, here, &goal.subject)
            .saturating_mul(self.weight)
    }
}
