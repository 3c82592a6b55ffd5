//! The three-room shuttle world.
//!
//! An agent must open a plain door, collect a red key card, pass a restricted
//! door, power a generator and fire the shuttle launch activator. Used by the
//! demo and throughout the tests.
//!
//! ```text
//!   Room 1 --[Access Door]-- Room 2 --[Red Access Door]-- Room 3
//!   Red Card                                              Shuttle Generator
//!   Access Door Activator 1  Access Door Activator 2      Shuttle Activator
//!                            Red Access Door Activator 1  Red Access Door Activator 2
//! ```

use crate::action::ActionKind;
use crate::fact::{AttributeKey, SubjectKind, Value};
use crate::heuristic::RoomDistances;
use crate::WorldState;

/// The planning actor.
pub const AGENT: &str = "Agent";
/// Key card that grants restricted access.
pub const RED_CARD: &str = "Red Card";
/// Plain door between Room 1 and Room 2.
pub const ACCESS_DOOR: &str = "Access Door";
/// Access door activator in Room 1.
pub const ACCESS_DOOR_ACTIVATOR_1: &str = "Access Door Activator 1";
/// Access door activator in Room 2.
pub const ACCESS_DOOR_ACTIVATOR_2: &str = "Access Door Activator 2";
/// Restricted door between Room 2 and Room 3.
pub const RED_ACCESS_DOOR: &str = "Red Access Door";
/// Red access door activator in Room 2.
pub const RED_ACCESS_DOOR_ACTIVATOR_1: &str = "Red Access Door Activator 1";
/// Red access door activator in Room 3.
pub const RED_ACCESS_DOOR_ACTIVATOR_2: &str = "Red Access Door Activator 2";
/// Power source the shuttle launch draws on.
pub const SHUTTLE_GENERATOR: &str = "Shuttle Generator";
/// Launch activator; firing it is the usual goal.
pub const SHUTTLE_LAUNCH: &str = "Shuttle Activator";

/// Starting room, holding the red card.
pub const ROOM_1: &str = "Room 1";
/// Middle room, between the two doors.
pub const ROOM_2: &str = "Room 2";
/// Shuttle bay.
pub const ROOM_3: &str = "Room 3";

/// Builds the starting world: agent and card in Room 1, both doors closed,
/// generator off, shuttle not launched.
pub fn reference_world() -> WorldState {
    let mut world = WorldState::new();

    world.set(AGENT, AttributeKey::Kind, SubjectKind::Agent);
    world.set(AGENT, AttributeKey::Location, ROOM_1);
    world.set(AGENT, AttributeKey::RestrictedAccess, false);
    world.set(AGENT, AttributeKey::Carrying, Value::Ids(Vec::new()));
    world.set(AGENT, AttributeKey::AllowedActions, Value::Actions(ActionKind::ALL.to_vec()));

    world.set(RED_CARD, AttributeKey::Kind, SubjectKind::RestrictedKey);
    world.set(RED_CARD, AttributeKey::Location, ROOM_1);

    add_door(&mut world, ACCESS_DOOR, SubjectKind::Door, ROOM_1, ROOM_2);
    add_activator(&mut world, ACCESS_DOOR_ACTIVATOR_1, SubjectKind::DoorActivator, ROOM_1, ACCESS_DOOR);
    add_activator(&mut world, ACCESS_DOOR_ACTIVATOR_2, SubjectKind::DoorActivator, ROOM_2, ACCESS_DOOR);

    add_door(&mut world, RED_ACCESS_DOOR, SubjectKind::RestrictedDoor, ROOM_2, ROOM_3);
    add_activator(
        &mut world,
        RED_ACCESS_DOOR_ACTIVATOR_1,
        SubjectKind::RestrictedDoorActivator,
        ROOM_2,
        RED_ACCESS_DOOR,
    );
    add_activator(
        &mut world,
        RED_ACCESS_DOOR_ACTIVATOR_2,
        SubjectKind::RestrictedDoorActivator,
        ROOM_3,
        RED_ACCESS_DOOR,
    );

    world.set(SHUTTLE_GENERATOR, AttributeKey::Kind, SubjectKind::PowerSource);
    world.set(SHUTTLE_GENERATOR, AttributeKey::Location, ROOM_3);
    world.set(SHUTTLE_GENERATOR, AttributeKey::Powered, false);

    add_activator(&mut world, SHUTTLE_LAUNCH, SubjectKind::LaunchActivator, ROOM_3, SHUTTLE_GENERATOR);
    world.set(SHUTTLE_LAUNCH, AttributeKey::Activated, false);

    world
}

/// The reference world with the agent starting in Room 2, so the card in
/// Room 1 can only be fetched by crossing the access door twice.
pub fn return_trip_world() -> WorldState {
    let mut world = reference_world();
    world.set(AGENT, AttributeKey::Location, ROOM_2);
    world
}

/// Hop counts between the three rooms.
pub fn reference_distances() -> RoomDistances {
    let mut distances = RoomDistances::new();
    distances.insert(ROOM_1, ROOM_2, 1);
    distances.insert(ROOM_1, ROOM_3, 2);
    distances.insert(ROOM_2, ROOM_3, 1);
    distances
}

fn add_door(world: &mut WorldState, id: &str, kind: SubjectKind, a: &str, b: &str) {
    world.set(id, AttributeKey::Kind, kind);
    world.set(id, AttributeKey::Portal, Value::Pair(a.to_string(), b.to_string()));
    world.set(id, AttributeKey::Closed, true);
}

fn add_activator(world: &mut WorldState, id: &str, kind: SubjectKind, room: &str, target: &str) {
    world.set(id, AttributeKey::Kind, kind);
    world.set(id, AttributeKey::Location, room);
    world.set(id, AttributeKey::ActivatorTarget, target);
}
