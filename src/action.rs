//! # Action Catalogue for Goal-Oriented Action Planning (GOAP)
//!
//! Actions here are not free-standing precondition/effect bundles. Each
//! [`ActionKind`] is a template that becomes concrete once it is bound to an
//! actor and a target subject, forming a [`Step`]. The catalogue functions are
//! pure: they inspect a [`WorldState`] and report what a step needs and what it
//! would change, without mutating anything.
//!
//! ## Key Components
//!
//! * [`ActionKind`]: the closed set of action templates, with their costs and
//!   target compatibility
//! * [`Step`]: an `(actor, action, target)` triple, the unit of a plan
//! * [`valid_actions`]: every step the actor could attempt from where it stands
//! * [`preconditions`] / [`effects`]: unmet requirements and pending changes
//!
//! ## Basic Usage
//!
//! ```
//! use goap_rooms::action::{self, ActionKind, Step};
//! use goap_rooms::reference;
//!
//! let world = reference::reference_world();
//!
//! // The agent starts next to the red card and a closed door.
//! let steps = action::valid_actions(reference::AGENT, &world).unwrap();
//! let pick_up = Step::new(reference::AGENT, ActionKind::PickUp, reference::RED_CARD);
//! assert!(steps.contains(&pick_up));
//!
//! // Nothing stands in the way of picking the card up...
//! assert!(action::preconditions(&pick_up, &world).unwrap().is_empty());
//!
//! // ...but the door cannot be walked through until it is opened.
//! let traverse = Step::new(reference::AGENT, ActionKind::TraversePortal, reference::ACCESS_DOOR);
//! assert_eq!(action::preconditions(&traverse, &world).unwrap().len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fact::{AttributeKey, Fact, SubjectId, SubjectKind};
use crate::{Result, WorldState};

/// Cost of every action the catalogue recognises.
pub const ACTION_COST: u32 = 1;

/// Cost charged for an action the catalogue does not recognise.
pub const UNRECOGNIZED_ACTION_COST: u32 = 25;

/// The action templates an actor may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Walk through an open door into the room on its other side
    TraversePortal,
    /// Pick up a carriable subject
    PickUp,
    /// Open a door through one of its activators
    ActivateSimpleDoor,
    /// Open a restricted door; needs the restricted key
    ActivateRestrictedDoor,
    /// Switch on a power source
    ActivatePowerSource,
    /// Fire a launch activator; needs its power source running
    ActivateLaunch,
    /// An action named by a world definition that this catalogue lacks.
    /// It costs [`UNRECOGNIZED_ACTION_COST`] and never applies.
    #[serde(other)]
    Unrecognized,
}

impl ActionKind {
    /// Every action the catalogue recognises, in declaration order.
    pub const ALL: [ActionKind; 6] = [
        ActionKind::TraversePortal,
        ActionKind::PickUp,
        ActionKind::ActivateSimpleDoor,
        ActionKind::ActivateRestrictedDoor,
        ActionKind::ActivatePowerSource,
        ActionKind::ActivateLaunch,
    ];

    /// Fixed cost of performing this action.
    ///
    /// ```
    /// use goap_rooms::action::{ActionKind, UNRECOGNIZED_ACTION_COST};
    ///
    /// assert_eq!(ActionKind::PickUp.cost(), 1);
    /// assert_eq!(ActionKind::Unrecognized.cost(), UNRECOGNIZED_ACTION_COST);
    /// ```
    pub fn cost(&self) -> u32 {
        match self {
            ActionKind::TraversePortal
            | ActionKind::PickUp
            | ActionKind::ActivateSimpleDoor
            | ActionKind::ActivateRestrictedDoor
            | ActionKind::ActivatePowerSource
            | ActionKind::ActivateLaunch => ACTION_COST,
            ActionKind::Unrecognized => UNRECOGNIZED_ACTION_COST,
        }
    }

    /// Whether this action may target a subject of the given kind.
    pub fn is_compatible(&self, kind: SubjectKind) -> bool {
        match self {
            ActionKind::TraversePortal => kind.is_portal(),
            ActionKind::PickUp => matches!(kind, SubjectKind::RestrictedKey | SubjectKind::Item),
            ActionKind::ActivateSimpleDoor => kind == SubjectKind::DoorActivator,
            ActionKind::ActivateRestrictedDoor => kind == SubjectKind::RestrictedDoorActivator,
            ActionKind::ActivatePowerSource => kind == SubjectKind::PowerSource,
            ActionKind::ActivateLaunch => kind == SubjectKind::LaunchActivator,
            ActionKind::Unrecognized => false,
        }
    }

    /// Stable snake_case name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::TraversePortal => "traverse_portal",
            ActionKind::PickUp => "pick_up",
            ActionKind::ActivateSimpleDoor => "activate_simple_door",
            ActionKind::ActivateRestrictedDoor => "activate_restricted_door",
            ActionKind::ActivatePowerSource => "activate_power_source",
            ActionKind::ActivateLaunch => "activate_launch",
            ActionKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete action: who does what to which subject.
///
/// # Examples
///
/// ```
/// use goap_rooms::action::{ActionKind, Step};
///
/// let step = Step::new("Agent", ActionKind::ActivatePowerSource, "Shuttle Generator");
/// assert_eq!(step.to_string(), "(Agent, activate_power_source, Shuttle Generator)");
/// assert_eq!(step.cost(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    /// The actor performing the action
    pub actor: SubjectId,
    /// The action template
    pub kind: ActionKind,
    /// The subject acted upon
    pub target: SubjectId,
}

impl Step {
    /// Creates a new step.
    pub fn new(actor: impl Into<SubjectId>, kind: ActionKind, target: impl Into<SubjectId>) -> Self {
        Self {
            actor: actor.into(),
            kind,
            target: target.into(),
        }
    }

    /// Cost of the step's action.
    pub fn cost(&self) -> u32 {
        self.kind.cost()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.actor, self.kind, self.target)
    }
}

/// Every step the actor could attempt from its current room.
///
/// The outer loop walks the actor's allowed actions in their declared order,
/// the inner loop walks visible subjects sorted by id. Only pairs whose
/// target kind the action accepts are returned; whether their preconditions
/// hold is a separate question.
///
/// # Errors
///
/// Fails when the actor has no location or no allowed-action list.
pub fn valid_actions(actor: &str, world: &WorldState) -> Result<Vec<Step>> {
    let allowed = world.allowed_actions(actor)?;
    let visible = world.objects_visible_to(actor)?;
    let mut steps = Vec::new();
    for kind in allowed {
        for subject in &visible {
            let compatible = world
                .kind(subject)
                .map_or(false, |subject_kind| kind.is_compatible(subject_kind));
            if compatible {
                steps.push(Step::new(actor, *kind, subject.clone()));
            }
        }
    }
    Ok(steps)
}

/// Facts that must hold before the step may run, whether or not they already do.
fn required_facts(step: &Step, world: &WorldState) -> Result<Vec<Fact>> {
    let facts = match step.kind {
        ActionKind::TraversePortal => {
            vec![Fact::new(step.target.clone(), AttributeKey::Closed, false)]
        }
        ActionKind::ActivateSimpleDoor => {
            let door = world.activator_target(&step.target)?;
            vec![Fact::new(door, AttributeKey::Closed, true)]
        }
        ActionKind::ActivateRestrictedDoor => {
            let door = world.activator_target(&step.target)?;
            vec![
                Fact::new(door, AttributeKey::Closed, true),
                Fact::new(step.actor.clone(), AttributeKey::RestrictedAccess, true),
            ]
        }
        ActionKind::PickUp => {
            if world.kind(&step.target) == Some(SubjectKind::RestrictedKey) {
                vec![Fact::new(step.actor.clone(), AttributeKey::RestrictedAccess, false)]
            } else {
                Vec::new()
            }
        }
        ActionKind::ActivatePowerSource => {
            vec![Fact::new(step.target.clone(), AttributeKey::Powered, false)]
        }
        ActionKind::ActivateLaunch => {
            let power = world.activator_target(&step.target)?;
            vec![
                Fact::new(step.target.clone(), AttributeKey::Activated, false),
                Fact::new(power, AttributeKey::Powered, true),
            ]
        }
        ActionKind::Unrecognized => Vec::new(),
    };
    Ok(facts)
}

/// The step's preconditions that do not hold yet.
///
/// Requirements already satisfied by `world` are dropped, so an empty result
/// means every fact-level precondition is met. A missing fact counts as unmet.
///
/// # Errors
///
/// Fails with a configuration error when an activator has no resolvable target.
pub fn preconditions(step: &Step, world: &WorldState) -> Result<Vec<Fact>> {
    let mut facts = required_facts(step, world)?;
    facts.retain(|fact| !world.holds(fact));
    Ok(facts)
}

/// Procedural checks that cannot be written as flat facts.
///
/// A restricted door only opens for an actor that actually carries a subject
/// of the restricted key kind. Unrecognised actions never pass.
pub fn passes_guard(step: &Step, world: &WorldState) -> bool {
    match step.kind {
        ActionKind::ActivateRestrictedDoor => world
            .carrying(&step.actor)
            .iter()
            .any(|carried| world.kind(carried) == Some(SubjectKind::RestrictedKey)),
        ActionKind::Unrecognized => false,
        _ => true,
    }
}

/// Every fact the step writes when executed, including ones that already hold.
pub(crate) fn all_effects(step: &Step, world: &WorldState) -> Result<Vec<Fact>> {
    let facts = match step.kind {
        ActionKind::TraversePortal => {
            let room = world.require_location(&step.actor)?;
            let (a, b) = world.portal(&step.target)?;
            let other = if a == room { b } else { a };
            vec![Fact::new(step.actor.clone(), AttributeKey::Location, other)]
        }
        ActionKind::ActivateSimpleDoor | ActionKind::ActivateRestrictedDoor => {
            let door = world.activator_target(&step.target)?;
            vec![Fact::new(door, AttributeKey::Closed, false)]
        }
        ActionKind::PickUp => {
            let mut facts = vec![Fact::new(
                step.target.clone(),
                AttributeKey::CarriedBy,
                step.actor.clone(),
            )];
            if world.kind(&step.target) == Some(SubjectKind::RestrictedKey) {
                facts.push(Fact::new(step.actor.clone(), AttributeKey::RestrictedAccess, true));
            }
            facts
        }
        ActionKind::ActivatePowerSource => {
            vec![Fact::new(step.target.clone(), AttributeKey::Powered, true)]
        }
        ActionKind::ActivateLaunch => {
            vec![Fact::new(step.target.clone(), AttributeKey::Activated, true)]
        }
        ActionKind::Unrecognized => Vec::new(),
    };
    Ok(facts)
}

/// The changes the step would make, leaving out facts that already hold.
///
/// Used for tracing. Execution through [`WorldState::apply_action`] writes
/// every effect regardless.
pub fn effects(step: &Step, world: &WorldState) -> Result<Vec<Fact>> {
    let mut facts = all_effects(step, world)?;
    facts.retain(|fact| !world.holds(fact));
    Ok(facts)
}
