//! # Facts for Goal-Oriented Action Planning (GOAP)
//!
//! A fact is an atomic `(subject, attribute, value)` statement about the world.
//! Subjects are identified by string ids, attributes come from the closed
//! [`AttributeKey`] set, and each key carries a [`Value`] of a fixed shape.
//!
//! ```
//! use goap_rooms::{AttributeKey, Fact, Value};
//!
//! let goal = Fact::new("Shuttle Activator", AttributeKey::Activated, true);
//! assert_eq!(goal.value, Value::Bool(true));
//! assert_eq!(goal.to_string(), "(Shuttle Activator, activated, true)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;

/// Identifier of a subject (agent, door, activator, item...).
pub type SubjectId = String;

/// Identifier of a room.
pub type RoomId = String;

/// The closed set of attributes a subject may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    /// Room the subject stands in (`Value::Symbol`)
    Location,
    /// Whether a door is closed (`Value::Bool`)
    Closed,
    /// Whether a power source is running (`Value::Bool`)
    Powered,
    /// Whether a launch activator has fired (`Value::Bool`)
    Activated,
    /// Whether an actor holds restricted access (`Value::Bool`)
    RestrictedAccess,
    /// The two rooms a door connects (`Value::Pair`)
    Portal,
    /// Subject an activator operates on (`Value::Symbol`)
    ActivatorTarget,
    /// What kind of thing the subject is (`Value::Kind`)
    Kind,
    /// Carrier of a picked up subject (`Value::Symbol`)
    CarriedBy,
    /// Subjects an actor carries (`Value::Ids`)
    Carrying,
    /// Actions an actor may perform, in preference order (`Value::Actions`)
    AllowedActions,
}

impl AttributeKey {
    /// Stable snake_case name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::Location => "location",
            AttributeKey::Closed => "closed",
            AttributeKey::Powered => "powered",
            AttributeKey::Activated => "activated",
            AttributeKey::RestrictedAccess => "restricted_access",
            AttributeKey::Portal => "portal",
            AttributeKey::ActivatorTarget => "activator_target",
            AttributeKey::Kind => "kind",
            AttributeKey::CarriedBy => "carried_by",
            AttributeKey::Carrying => "carrying",
            AttributeKey::AllowedActions => "allowed_actions",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of subjects the action catalogue knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A planning actor
    Agent,
    /// A door anyone may pass once open
    Door,
    /// Activator that opens a [`SubjectKind::Door`]
    DoorActivator,
    /// A door whose activator requires restricted access
    RestrictedDoor,
    /// Activator that opens a [`SubjectKind::RestrictedDoor`]
    RestrictedDoorActivator,
    /// The key card granting restricted access
    RestrictedKey,
    /// Any other carriable object
    Item,
    /// Generator that powers a launch activator
    PowerSource,
    /// Activator that launches, drawing on a power source
    LaunchActivator,
    /// A kind this catalogue does not recognise
    #[serde(other)]
    Unknown,
}

impl SubjectKind {
    /// Kinds that connect two rooms instead of standing in one.
    pub fn is_portal(&self) -> bool {
        matches!(self, SubjectKind::Door | SubjectKind::RestrictedDoor)
    }

    /// Every kind the catalogue recognises.
    pub const KNOWN: [SubjectKind; 9] = [
        SubjectKind::Agent,
        SubjectKind::Door,
        SubjectKind::DoorActivator,
        SubjectKind::RestrictedDoor,
        SubjectKind::RestrictedDoorActivator,
        SubjectKind::RestrictedKey,
        SubjectKind::Item,
        SubjectKind::PowerSource,
        SubjectKind::LaunchActivator,
    ];

    /// Stable snake_case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Agent => "agent",
            SubjectKind::Door => "door",
            SubjectKind::DoorActivator => "door_activator",
            SubjectKind::RestrictedDoor => "restricted_door",
            SubjectKind::RestrictedDoorActivator => "restricted_door_activator",
            SubjectKind::RestrictedKey => "restricted_key",
            SubjectKind::Item => "item",
            SubjectKind::PowerSource => "power_source",
            SubjectKind::LaunchActivator => "launch_activator",
            SubjectKind::Unknown => "unknown",
        }
    }

    /// Looks a kind up by its snake_case name. Unrecognised names map to
    /// [`SubjectKind::Unknown`].
    ///
    /// ```
    /// use goap_rooms::SubjectKind;
    ///
    /// assert_eq!(SubjectKind::from_name("power_source"), SubjectKind::PowerSource);
    /// assert_eq!(SubjectKind::from_name("hover_bike"), SubjectKind::Unknown);
    /// ```
    pub fn from_name(name: &str) -> SubjectKind {
        SubjectKind::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .unwrap_or(SubjectKind::Unknown)
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value held by a fact. The shape depends on the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Flags such as closed, powered or activated
    Bool(bool),
    /// Room names and subject references
    Symbol(String),
    /// Portal endpoints
    Pair(RoomId, RoomId),
    /// Lists of subject ids
    Ids(Vec<SubjectId>),
    /// A subject kind
    Kind(SubjectKind),
    /// An ordered list of allowed actions
    Actions(Vec<ActionKind>),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Symbol(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Symbol(value)
    }
}

impl From<SubjectKind> for Value {
    fn from(kind: SubjectKind) -> Self {
        Value::Kind(kind)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Symbol(s) => f.write_str(s),
            Value::Pair(a, b) => write!(f, "({}, {})", a, b),
            Value::Ids(ids) => write!(f, "[{}]", ids.join(", ")),
            Value::Kind(kind) => write!(f, "{}", kind),
            Value::Actions(actions) => {
                let names: Vec<_> = actions.iter().map(|a| a.to_string()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

/// An atomic `(subject, key, value)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// Subject the fact is about
    pub subject: SubjectId,
    /// Attribute of the subject
    pub key: AttributeKey,
    /// Value of the attribute
    pub value: Value,
}

impl Fact {
    /// Creates a new fact.
    pub fn new(subject: impl Into<SubjectId>, key: AttributeKey, value: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            key,
            value: value.into(),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("Room 1"), Value::Symbol("Room 1".to_string()));
        assert_eq!(Value::from(SubjectKind::Door), Value::Kind(SubjectKind::Door));
    }

    #[test]
    fn test_fact_display() {
        let fact = Fact::new("Access Door", AttributeKey::Portal, Value::Pair("Room 1".into(), "Room 2".into()));
        assert_eq!(fact.to_string(), "(Access Door, portal, (Room 1, Room 2))");
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let kind: SubjectKind = serde_json::from_str("\"hover_bike\"").unwrap();
        assert_eq!(kind, SubjectKind::Unknown);
        let kind: SubjectKind = serde_json::from_str("\"power_source\"").unwrap();
        assert_eq!(kind, SubjectKind::PowerSource);
    }

    #[test]
    fn test_value_serde_shape() {
        let value: Value = serde_json::from_str(r#"{"bool": true}"#).unwrap();
        assert_eq!(value, Value::Bool(true));
        let value: Value = serde_json::from_str(r#"{"pair": ["Room 2", "Room 3"]}"#).unwrap();
        assert_eq!(value, Value::Pair("Room 2".into(), "Room 3".into()));
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in SubjectKind::KNOWN {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(SubjectKind::from_name(kind.as_str()), kind);
        }
        assert_eq!(SubjectKind::from_name("jetpack"), SubjectKind::Unknown);
    }

    #[test]
    fn test_portal_kinds() {
        assert!(SubjectKind::Door.is_portal());
        assert!(SubjectKind::RestrictedDoor.is_portal());
        assert!(!SubjectKind::DoorActivator.is_portal());
    }
}
