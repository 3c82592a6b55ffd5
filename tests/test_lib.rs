use goap_rooms::action::{self, ActionKind};
use goap_rooms::reference::{self, AGENT};
use goap_rooms::{
    AttributeKey, Fact, GoapVisualizer, Plan, Planner, PlannerConfig, PlannerError, SearchConfig,
    SearchOutcome, Step, WorldDefinition,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_goal() -> Vec<Fact> {
        vec![Fact::new(reference::SHUTTLE_LAUNCH, AttributeKey::Activated, true)]
    }

    #[test]
    fn test_shuttle_launch_needs_power_first() {
        let planner = Planner::new(reference::reference_world(), launch_goal(), AGENT);
        let plan = planner.plan_mixed().unwrap().unwrap();

        assert!(!plan.is_empty());
        assert_eq!(plan.last().unwrap().kind, ActionKind::ActivateLaunch);
        let powers: Vec<_> = plan
            .steps()
            .iter()
            .filter(|step| step.kind == ActionKind::ActivatePowerSource)
            .collect();
        assert_eq!(powers.len(), 1);
        assert_eq!(powers[0].target, reference::SHUTTLE_GENERATOR);
    }

    #[test]
    fn test_satisfied_goal_needs_no_steps() {
        let goals = vec![Fact::new(reference::ACCESS_DOOR, AttributeKey::Closed, true)];
        let planner = Planner::new(reference::reference_world(), goals, AGENT);

        let outcome = planner.plan(SearchConfig::strict()).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                plan: Plan::default(),
                expansions: 0
            }
        );
        assert_eq!(planner.plan_mixed().unwrap(), Some(Plan::default()));
    }

    #[test]
    fn test_absent_goal_subject_is_no_plan() {
        let goals = vec![Fact::new("Escape Pod", AttributeKey::Activated, true)];
        let planner = Planner::new(reference::reference_world(), goals, AGENT);

        let outcome = planner.plan(SearchConfig::strict()).unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted { .. }));
        assert!(planner.plan_mixed().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_needs_relaxed_fallback() {
        let planner = Planner::new(reference::return_trip_world(), launch_goal(), AGENT);

        let strict = planner.plan(SearchConfig::strict()).unwrap();
        assert!(matches!(strict, SearchOutcome::Exhausted { .. }));

        let plan = planner.plan_mixed().unwrap().unwrap();
        assert!(plan.repeats_step());
        let crossings = plan
            .steps()
            .iter()
            .filter(|step| step.kind == ActionKind::TraversePortal && step.target == reference::ACCESS_DOOR)
            .count();
        assert_eq!(crossings, 2);
        // never the same step twice in a row
        for pair in plan.steps().windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_round_trip_gives_up_under_tiny_fallback_limit() {
        let config = PlannerConfig {
            fallback_iteration_limit: 2,
            ..PlannerConfig::default()
        };
        let planner =
            Planner::new(reference::return_trip_world(), launch_goal(), AGENT).with_config(config);
        assert!(planner.plan_mixed().unwrap().is_none());
    }

    #[test]
    fn test_strict_plan_replays_to_goal() {
        let world = reference::reference_world();
        let planner = Planner::new(world.clone(), launch_goal(), AGENT);
        let plan = planner.plan(SearchConfig::strict()).unwrap().into_plan().unwrap();

        assert!(!plan.repeats_step());
        let end = plan.replay(&world).unwrap();
        assert!(end.satisfies(&launch_goal()));
        assert_eq!(end.location(AGENT), Some(reference::ROOM_3));
        assert_eq!(end.carrying(AGENT), [reference::RED_CARD.to_string()]);
        assert_eq!(end.location(reference::RED_CARD), None);
    }

    #[test]
    fn test_each_step_effects_hold_after_it_runs() {
        let world = reference::reference_world();
        let planner = Planner::new(world.clone(), launch_goal(), AGENT);
        let plan = planner.plan_mixed().unwrap().unwrap();

        let mut state = world;
        for step in &plan {
            assert!(action::preconditions(step, &state).unwrap().is_empty());
            let effects = action::effects(step, &state).unwrap();
            state.apply_action(step).unwrap();
            assert!(state.satisfies(&effects), "{} did not take effect", step);
        }
    }

    #[test]
    fn test_preconditions_recomputed_after_each_step() {
        let mut world = reference::reference_world();
        let open = Step::new(AGENT, ActionKind::ActivateSimpleDoor, reference::ACCESS_DOOR_ACTIVATOR_1);
        let traverse = Step::new(AGENT, ActionKind::TraversePortal, reference::ACCESS_DOOR);
        let closed = Fact::new(reference::ACCESS_DOOR, AttributeKey::Closed, true);

        assert_eq!(action::preconditions(&traverse, &world).unwrap().len(), 1);
        world.apply_action(&open).unwrap();
        assert_eq!(action::preconditions(&open, &world).unwrap(), vec![closed]);
        assert!(action::preconditions(&traverse, &world).unwrap().is_empty());

        world.apply_action(&traverse).unwrap();
        assert_eq!(world.location(AGENT), Some(reference::ROOM_2));
        assert_eq!(world.flag(reference::ACCESS_DOOR, AttributeKey::Closed), Some(false));
        assert!(action::preconditions(&traverse, &world).unwrap().is_empty());
        assert_eq!(
            action::effects(&traverse, &world).unwrap(),
            vec![Fact::new(AGENT, AttributeKey::Location, reference::ROOM_1)]
        );
    }

    #[test]
    fn test_multiple_goals_all_hold() {
        let goals = vec![
            Fact::new(reference::SHUTTLE_GENERATOR, AttributeKey::Powered, true),
            Fact::new(reference::ACCESS_DOOR, AttributeKey::Closed, false),
        ];
        let world = reference::reference_world();
        let planner = Planner::new(world.clone(), goals.clone(), AGENT);
        let plan = planner.plan_mixed().unwrap().unwrap();
        assert!(plan.replay(&world).unwrap().satisfies(&goals));
    }

    #[test]
    fn test_broken_world_is_fatal() {
        let mut world = reference::reference_world();
        world.set(reference::ACCESS_DOOR_ACTIVATOR_1, AttributeKey::ActivatorTarget, "Ghost Door");
        let planner = Planner::new(world, launch_goal(), AGENT);
        let err = planner.plan_mixed().unwrap_err();
        assert!(matches!(err, PlannerError::UnknownSubject(id) if id == "Ghost Door"));
    }

    #[test]
    fn test_plan_from_definition_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship.json");
        std::fs::write(&path, include_str!("../demos/spaceship.json")).unwrap();

        let (world, distances) = WorldDefinition::from_path(&path).unwrap().into_world().unwrap();
        let planner = Planner::new(world.clone(), launch_goal(), AGENT).with_distances(distances);
        let plan = planner.plan_mixed().unwrap().unwrap();
        assert!(plan.replay(&world).unwrap().satisfies(&launch_goal()));
    }

    #[test]
    fn test_visualize_found_plan() {
        let world = reference::reference_world();
        let planner = Planner::new(world.clone(), launch_goal(), AGENT);
        let plan = planner.plan_mixed().unwrap().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shuttle.dot");
        GoapVisualizer::new()
            .visualize_plan(&world, &launch_goal(), &plan, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("digraph GOAP"));
        assert!(content.contains("activate_launch"));
        assert!(content.contains("Shuttle Activator.activated: true"));
    }
}
