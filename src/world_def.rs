//! # World definitions
//!
//! A [`WorldDefinition`] is the table of game objects, clustered by kind,
//! that map tooling hands to the planner. Seeding turns it into the facts a
//! [`WorldState`] holds plus the room-distance table the heuristic reads.
//!
//! Definitions are plain JSON:
//!
//! ```
//! use goap_rooms::{AttributeKey, WorldDefinition};
//!
//! let definition = WorldDefinition::from_json_str(r#"{
//!     "actors": [{ "id": "Agent", "room": "Bridge", "actions": ["traverse_portal"] }],
//!     "objects": {
//!         "door": [{ "id": "Hatch", "connects": ["Bridge", "Hold"] }]
//!     }
//! }"#).unwrap();
//!
//! let (world, distances) = definition.into_world().unwrap();
//! assert_eq!(world.flag("Hatch", AttributeKey::Closed), Some(true));
//! assert_eq!(distances.distance("Bridge", "Hold"), 1);
//! ```
//!
//! Cell coordinates are carried along for map tooling and never read by the
//! planner.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::fact::{AttributeKey, RoomId, SubjectId, SubjectKind, Value};
use crate::heuristic::RoomDistances;
use crate::{PlannerError, Result, WorldState};

/// An actor and the actions it may plan with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDefinition {
    pub id: SubjectId,
    pub room: RoomId,
    /// Allowed actions, in the order the search tries them
    pub actions: Vec<ActionKind>,
    #[serde(default)]
    pub restricted_access: bool,
}

/// One placed game object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: SubjectId,
    /// Room the object stands in. Doors have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomId>,
    /// Map cells the object covers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<(u32, u32)>,
    /// The two rooms a door connects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connects: Option<(RoomId, RoomId)>,
    /// What an activator operates on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated: Option<bool>,
}

/// The full object table of a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDefinition {
    #[serde(default)]
    pub actors: Vec<ActorDefinition>,
    /// Objects clustered by kind name. Names the catalogue does not know
    /// seed subjects of kind [`SubjectKind::Unknown`].
    #[serde(default)]
    pub objects: BTreeMap<String, Vec<GameObject>>,
    /// Explicit room distances. Derived from the doors when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<(RoomId, RoomId, u32)>>,
}

impl WorldDefinition {
    /// Parses a definition from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Seeds a world and its distance table from the definition.
    ///
    /// # Errors
    ///
    /// `InvalidWorld` for duplicate ids, doors without `connects` or placed in
    /// a room, non-doors with `connects`, and activators without a target.
    /// `UnknownSubject` when an activator targets an id nobody defined.
    pub fn into_world(&self) -> Result<(WorldState, RoomDistances)> {
        let mut world = WorldState::new();
        let mut seen = BTreeSet::new();
        let mut activators = Vec::new();

        for actor in &self.actors {
            claim(&mut seen, &actor.id)?;
            world.set(actor.id.clone(), AttributeKey::Kind, SubjectKind::Agent);
            world.set(actor.id.clone(), AttributeKey::Location, actor.room.clone());
            world.set(
                actor.id.clone(),
                AttributeKey::AllowedActions,
                Value::Actions(actor.actions.clone()),
            );
            world.set(actor.id.clone(), AttributeKey::Carrying, Value::Ids(Vec::new()));
            world.set(actor.id.clone(), AttributeKey::RestrictedAccess, actor.restricted_access);
        }

        for (name, objects) in &self.objects {
            let kind = SubjectKind::from_name(name);
            if kind == SubjectKind::Unknown {
                log::debug!("Unrecognised object kind '{}'", name);
            }
            for object in objects {
                claim(&mut seen, &object.id)?;
                seed_object(&mut world, kind, object)?;
                if is_activator(kind) {
                    activators.push(object.id.as_str());
                }
            }
        }

        for id in activators {
            world.activator_target(id)?;
        }

        let distances = match &self.distances {
            Some(entries) => {
                let mut distances = RoomDistances::new();
                for (a, b, cost) in entries {
                    distances.insert(a.clone(), b.clone(), *cost);
                }
                distances
            }
            None => RoomDistances::from_portals(&world),
        };

        log::debug!(
            "Seeded world with {} subjects and {} room pairs",
            seen.len(),
            distances.len()
        );
        Ok((world, distances))
    }
}

fn claim<'a>(seen: &mut BTreeSet<&'a str>, id: &'a str) -> Result<()> {
    if !seen.insert(id) {
        return Err(PlannerError::InvalidWorld(format!("duplicate subject id '{}'", id)));
    }
    Ok(())
}

fn is_activator(kind: SubjectKind) -> bool {
    matches!(
        kind,
        SubjectKind::DoorActivator | SubjectKind::RestrictedDoorActivator | SubjectKind::LaunchActivator
    )
}

fn seed_object(world: &mut WorldState, kind: SubjectKind, object: &GameObject) -> Result<()> {
    let id = object.id.as_str();
    world.set(id, AttributeKey::Kind, kind);

    if kind.is_portal() {
        let (a, b) = object.connects.clone().ok_or_else(|| {
            PlannerError::InvalidWorld(format!("door '{}' does not say which rooms it connects", id))
        })?;
        if object.room.is_some() {
            return Err(PlannerError::InvalidWorld(format!(
                "door '{}' connects rooms and cannot stand in one",
                id
            )));
        }
        world.set(id, AttributeKey::Portal, Value::Pair(a, b));
        world.set(id, AttributeKey::Closed, object.closed.unwrap_or(true));
        return Ok(());
    }

    if object.connects.is_some() {
        return Err(PlannerError::InvalidWorld(format!(
            "'{}' is a {} and cannot connect rooms",
            id, kind
        )));
    }
    if let Some(room) = &object.room {
        world.set(id, AttributeKey::Location, room.clone());
    }

    if is_activator(kind) {
        let target = object.target.clone().ok_or_else(|| {
            PlannerError::InvalidWorld(format!("activator '{}' has no target", id))
        })?;
        world.set(id, AttributeKey::ActivatorTarget, target);
    }
    match kind {
        SubjectKind::PowerSource => {
            world.set(id, AttributeKey::Powered, object.powered.unwrap_or(false));
        }
        SubjectKind::LaunchActivator => {
            world.set(id, AttributeKey::Activated, object.activated.unwrap_or(false));
        }
        _ => {}
    }
    Ok(())
}
