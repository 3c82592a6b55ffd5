use goap_rooms::action::{self, ActionKind};
use goap_rooms::reference::{self, AGENT};
use goap_rooms::{AttributeKey, Fact, Planner, SearchConfig, Value, WorldState};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Variation {
    room: &'static str,
    access_closed: bool,
    red_closed: bool,
    powered: bool,
    restricted_access: bool,
    allowed: Vec<ActionKind>,
}

fn variation() -> impl Strategy<Value = Variation> {
    (
        prop::sample::select(vec![reference::ROOM_1, reference::ROOM_2, reference::ROOM_3]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::subsequence(ActionKind::ALL.to_vec(), 0..=ActionKind::ALL.len()),
    )
        .prop_map(
            |(room, access_closed, red_closed, powered, restricted_access, allowed)| Variation {
                room,
                access_closed,
                red_closed,
                powered,
                restricted_access,
                allowed,
            },
        )
}

fn build(variation: &Variation) -> WorldState {
    let mut world = reference::reference_world();
    world.set(AGENT, AttributeKey::Location, variation.room);
    world.set(reference::ACCESS_DOOR, AttributeKey::Closed, variation.access_closed);
    world.set(reference::RED_ACCESS_DOOR, AttributeKey::Closed, variation.red_closed);
    world.set(reference::SHUTTLE_GENERATOR, AttributeKey::Powered, variation.powered);
    world.set(AGENT, AttributeKey::RestrictedAccess, variation.restricted_access);
    world.set(AGENT, AttributeKey::AllowedActions, Value::Actions(variation.allowed.clone()));
    world
}

proptest! {
    #[test]
    fn valid_actions_are_allowed_and_compatible(variation in variation()) {
        let world = build(&variation);
        for step in action::valid_actions(AGENT, &world).unwrap() {
            prop_assert!(variation.allowed.contains(&step.kind));
            prop_assert_ne!(step.target.as_str(), AGENT);
            let kind = world.kind(&step.target).unwrap();
            prop_assert!(step.kind.is_compatible(kind));
        }
    }

    #[test]
    fn preconditions_never_list_facts_that_hold(variation in variation()) {
        let world = build(&variation);
        for step in action::valid_actions(AGENT, &world).unwrap() {
            for fact in action::preconditions(&step, &world).unwrap() {
                prop_assert!(!world.holds(&fact), "{} already holds", fact);
            }
            for fact in action::effects(&step, &world).unwrap() {
                prop_assert!(!world.holds(&fact), "{} already holds", fact);
            }
        }
    }

    #[test]
    fn strict_plans_are_unique_and_reach_the_goal(variation in variation()) {
        let world = build(&variation);
        let goals = vec![Fact::new(reference::SHUTTLE_LAUNCH, AttributeKey::Activated, true)];
        let planner = Planner::new(world.clone(), goals.clone(), AGENT);
        if let Some(plan) = planner.plan(SearchConfig::strict()).unwrap().into_plan() {
            prop_assert!(!plan.repeats_step());
            let end = plan.replay(&world).unwrap();
            prop_assert!(end.satisfies(&goals));
        }
    }
}
