//! World state representation for GOAP (Goal-Oriented Action Planning).
//!
//! This module provides the [`WorldState`] structure, the fact store every other
//! part of the planner reads and writes. It is used for:
//! - Holding a snapshot of every subject's facts
//! - Testing whether goal facts hold
//! - Deciding which subjects an actor can reach from its room
//! - Executing an action's effects in place
//!
//! Facts are grouped per subject, with at most one value per key:
//!
//! ```
//! use goap_rooms::{AttributeKey, SubjectKind, Value, WorldState};
//!
//! let mut world = WorldState::new();
//! world.set("Agent", AttributeKey::Location, "Room 1");
//! world.set("Agent", AttributeKey::Kind, SubjectKind::Agent);
//! world.set("Red Card", AttributeKey::Location, "Room 1");
//! world.set("Red Card", AttributeKey::Kind, SubjectKind::RestrictedKey);
//!
//! assert_eq!(world.location("Red Card"), Some("Room 1"));
//! assert_eq!(world.objects_visible_to("Agent").unwrap(), vec!["Red Card".to_string()]);
//!
//! world.remove("Red Card", AttributeKey::Location);
//! assert!(world.get("Red Card", AttributeKey::Location).is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{self, ActionKind, Step};
use crate::fact::{AttributeKey, Fact, SubjectId, SubjectKind, Value};
use crate::{PlannerError, Result};

/// Facts known about a single subject.
pub type SubjectFacts = BTreeMap<AttributeKey, Value>;

/// `WorldState` maps every subject id to that subject's facts.
///
/// Subjects are kept in id order, which makes every enumeration over the
/// world (visibility, dumps, hashing) deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldState {
    subjects: BTreeMap<SubjectId, SubjectFacts>,
}

impl WorldState {
    /// Creates a new empty WorldState.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_rooms::WorldState;
    ///
    /// let world = WorldState::new();
    /// assert_eq!(world.subjects().count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            subjects: BTreeMap::new(),
        }
    }

    /// Gets the value of `key` for `subject`, if both exist.
    pub fn get(&self, subject: &str, key: AttributeKey) -> Option<&Value> {
        self.subjects.get(subject).and_then(|facts| facts.get(&key))
    }

    /// Sets `key` on `subject`, creating the subject if needed.
    pub fn set(&mut self, subject: impl Into<SubjectId>, key: AttributeKey, value: impl Into<Value>) {
        self.subjects
            .entry(subject.into())
            .or_default()
            .insert(key, value.into());
    }

    /// Removes `key` from `subject`, returning the previous value.
    pub fn remove(&mut self, subject: &str, key: AttributeKey) -> Option<Value> {
        self.subjects
            .get_mut(subject)
            .and_then(|facts| facts.remove(&key))
    }

    /// Stores a fact, overwriting any previous value for its key.
    pub fn insert_fact(&mut self, fact: Fact) {
        self.set(fact.subject, fact.key, fact.value);
    }

    /// Returns true if the subject has at least been declared.
    pub fn contains_subject(&self, subject: &str) -> bool {
        self.subjects.contains_key(subject)
    }

    /// Iterates subject ids in sorted order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.subjects.keys()
    }

    /// All facts of one subject.
    pub fn facts_of(&self, subject: &str) -> Option<&SubjectFacts> {
        self.subjects.get(subject)
    }

    /// Iterates every fact in the world, subjects in id order.
    pub fn facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.subjects.iter().flat_map(|(subject, facts)| {
            facts
                .iter()
                .map(move |(key, value)| Fact::new(subject.clone(), *key, value.clone()))
        })
    }

    /// Checks whether a single fact holds. Absent subjects or keys never hold.
    pub fn holds(&self, fact: &Fact) -> bool {
        self.get(&fact.subject, fact.key) == Some(&fact.value)
    }

    /// Checks whether every fact in `goals` holds.
    pub fn satisfies(&self, goals: &[Fact]) -> bool {
        goals.iter().all(|goal| self.holds(goal))
    }

    /// Gets a fact the caller relies on, failing with a configuration error when absent.
    ///
    /// # Errors
    ///
    /// `UnknownSubject` if the subject does not exist, `MissingFact` if it lacks the key.
    pub fn require(&self, subject: &str, key: AttributeKey) -> Result<&Value> {
        let facts = self
            .subjects
            .get(subject)
            .ok_or_else(|| PlannerError::UnknownSubject(subject.to_string()))?;
        facts.get(&key).ok_or_else(|| PlannerError::MissingFact {
            subject: subject.to_string(),
            key,
        })
    }

    /// Kind of a subject, if declared.
    pub fn kind(&self, subject: &str) -> Option<SubjectKind> {
        match self.get(subject, AttributeKey::Kind) {
            Some(Value::Kind(kind)) => Some(*kind),
            _ => None,
        }
    }

    /// Room a subject stands in. Carried subjects and portals have none.
    pub fn location(&self, subject: &str) -> Option<&str> {
        match self.get(subject, AttributeKey::Location) {
            Some(Value::Symbol(room)) => Some(room.as_str()),
            _ => None,
        }
    }

    /// Boolean flag such as closed or powered.
    pub fn flag(&self, subject: &str, key: AttributeKey) -> Option<bool> {
        match self.get(subject, key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Location of an actor, which must be standing in a room.
    pub fn require_location(&self, subject: &str) -> Result<&str> {
        match self.require(subject, AttributeKey::Location)? {
            Value::Symbol(room) => Ok(room.as_str()),
            _ => Err(unexpected(subject, AttributeKey::Location, "a room")),
        }
    }

    /// The two rooms a portal connects.
    pub fn portal(&self, subject: &str) -> Result<(&str, &str)> {
        match self.require(subject, AttributeKey::Portal)? {
            Value::Pair(a, b) => Ok((a.as_str(), b.as_str())),
            _ => Err(unexpected(subject, AttributeKey::Portal, "a pair of rooms")),
        }
    }

    /// Resolves an activator's target. The target must exist in this world.
    pub fn activator_target(&self, subject: &str) -> Result<&str> {
        let target = match self.require(subject, AttributeKey::ActivatorTarget)? {
            Value::Symbol(target) => target.as_str(),
            _ => {
                return Err(unexpected(
                    subject,
                    AttributeKey::ActivatorTarget,
                    "a subject reference",
                ))
            }
        };
        if !self.contains_subject(target) {
            return Err(PlannerError::UnknownSubject(target.to_string()));
        }
        Ok(target)
    }

    /// Subjects an actor carries. Empty when the actor carries nothing.
    pub fn carrying(&self, subject: &str) -> &[SubjectId] {
        match self.get(subject, AttributeKey::Carrying) {
            Some(Value::Ids(ids)) => ids,
            _ => &[],
        }
    }

    /// Actions an actor may perform, in declared order.
    pub fn allowed_actions(&self, subject: &str) -> Result<&[ActionKind]> {
        match self.require(subject, AttributeKey::AllowedActions)? {
            Value::Actions(actions) => Ok(actions),
            _ => Err(unexpected(
                subject,
                AttributeKey::AllowedActions,
                "a list of actions",
            )),
        }
    }

    /// Every subject the actor can interact with, sorted by id.
    ///
    /// A subject is visible when it stands in the actor's room, or when it is a
    /// portal with either endpoint in that room. The actor never sees itself.
    ///
    /// # Errors
    ///
    /// Fails when the actor has no location.
    pub fn objects_visible_to(&self, actor: &str) -> Result<Vec<SubjectId>> {
        let room = self.require_location(actor)?;
        let visible = self
            .subjects
            .iter()
            .filter(|(id, _)| id.as_str() != actor)
            .filter(|(_, facts)| match facts.get(&AttributeKey::Location) {
                Some(Value::Symbol(location)) => location == room,
                Some(_) => false,
                None => matches!(
                    facts.get(&AttributeKey::Portal),
                    Some(Value::Pair(a, b)) if a == room || b == room
                ),
            })
            .map(|(id, _)| id.clone())
            .collect();
        Ok(visible)
    }

    /// Executes an action against this world, in place.
    ///
    /// Every catalogue effect is written whether or not it already holds.
    /// Picking something up additionally moves it out of its room and into
    /// the actor's carry list, so a subject is never both located and carried.
    pub fn apply_action(&mut self, step: &Step) -> Result<()> {
        for fact in action::all_effects(step, self)? {
            self.insert_fact(fact);
        }
        if step.kind == ActionKind::PickUp {
            self.remove(&step.target, AttributeKey::Location);
            let mut carried = self.carrying(&step.actor).to_vec();
            if !carried.contains(&step.target) {
                carried.push(step.target.clone());
            }
            self.set(step.actor.clone(), AttributeKey::Carrying, Value::Ids(carried));
        }
        Ok(())
    }
}

fn unexpected(subject: &str, key: AttributeKey, expected: &'static str) -> PlannerError {
    PlannerError::UnexpectedValue {
        subject: subject.to_string(),
        key,
        expected,
    }
}

impl FromIterator<Fact> for WorldState {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut world = WorldState::new();
        for fact in iter {
            world.insert_fact(fact);
        }
        world
    }
}

impl fmt::Display for WorldState {
    /// Dumps every subject and its facts, sorted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (subject, facts) in &self.subjects {
            writeln!(f, "Subject ID: {}", subject)?;
            for (key, value) in facts {
                writeln!(f, " - ({}, {})", key, value)?;
            }
        }
        Ok(())
    }
}
