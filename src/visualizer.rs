use crate::action::{self, Step};
use crate::fact::{Fact, SubjectKind};
use crate::{Plan, Result, WorldState};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A visualizer for GOAP plans that generates Graphviz DOT files
pub struct GoapVisualizer;

impl Default for GoapVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GoapVisualizer {
    /// Create a new GOAP visualizer
    pub fn new() -> Self {
        Self
    }

    /// Render a plan as a DOT graph: initial rooms, each step with the facts
    /// it changes, and the goal facts.
    ///
    /// The plan is replayed against `world` to work out each step's effects.
    pub fn render_plan(&self, world: &WorldState, goals: &[Fact], plan: &Plan) -> Result<String> {
        let mut out = Vec::new();
        self.write_dot(&mut out, world, goals, plan)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Generate a DOT file visualization of a plan
    pub fn visualize_plan(
        &self,
        world: &WorldState,
        goals: &[Fact],
        plan: &Plan,
        filename: impl AsRef<Path>,
    ) -> Result<()> {
        let mut file = File::create(filename)?;
        self.write_dot(&mut file, world, goals, plan)
    }

    fn write_dot<W: Write>(
        &self,
        out: &mut W,
        world: &WorldState,
        goals: &[Fact],
        plan: &Plan,
    ) -> Result<()> {
        writeln!(out, "digraph GOAP {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(
            out,
            "    node [shape=box, style=filled, fillcolor=lightblue];"
        )?;
        writeln!(out, "    edge [fontsize=10];")?;

        writeln!(
            out,
            "    initial [label=\"Initial State\\n{}\", fillcolor=lightgreen];",
            Self::actors_to_string(world)
        )?;
        writeln!(
            out,
            "    goal [label=\"Goal State\\n{}\", fillcolor=lightpink];",
            Self::facts_to_string(goals)
        )?;

        let mut state = world.clone();
        for (i, step) in plan.steps().iter().enumerate() {
            let effects = action::effects(step, &state)?;
            writeln!(
                out,
                "    step_{} [label=\"{}\\nCost: {}\\nEff: {}\"];",
                i,
                Self::step_to_string(step),
                step.cost(),
                Self::facts_to_string(&effects)
            )?;
            state.apply_action(step)?;
        }

        // Highlight the chosen plan path
        writeln!(out, "    edge [color=red, penwidth=2.0];")?;
        let mut previous = "initial".to_string();
        for i in 0..plan.len() {
            let current = format!("step_{}", i);
            writeln!(out, "    {} -> {};", previous, current)?;
            previous = current;
        }
        writeln!(out, "    {} -> goal [label=\"achieves\"];", previous)?;

        writeln!(out, "}}")?;
        Ok(())
    }

    fn actors_to_string(world: &WorldState) -> String {
        world
            .subjects()
            .filter(|subject| world.kind(subject) == Some(SubjectKind::Agent))
            .map(|subject| {
                format!(
                    "{}: {}",
                    escape(subject),
                    escape(world.location(subject).unwrap_or("nowhere"))
                )
            })
            .collect::<Vec<_>>()
            .join("\\n")
    }

    fn step_to_string(step: &Step) -> String {
        format!("{}\\n{}", step.kind, escape(&step.target))
    }

    fn facts_to_string(facts: &[Fact]) -> String {
        facts
            .iter()
            .map(|fact| format!("{}.{}: {}", escape(&fact.subject), fact.key, escape(&fact.value.to_string())))
            .collect::<Vec<_>>()
            .join("\\n")
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::fact::AttributeKey;
    use crate::reference::{self, AGENT};

    fn door_plan() -> (Vec<Fact>, Plan) {
        let goals = vec![Fact::new(AGENT, AttributeKey::Location, reference::ROOM_2)];
        let plan = Plan::new(vec![
            Step::new(AGENT, ActionKind::ActivateSimpleDoor, reference::ACCESS_DOOR_ACTIVATOR_1),
            Step::new(AGENT, ActionKind::TraversePortal, reference::ACCESS_DOOR),
        ]);
        (goals, plan)
    }

    #[test]
    fn test_render_plan() {
        let world = reference::reference_world();
        let (goals, plan) = door_plan();
        let dot = GoapVisualizer::new().render_plan(&world, &goals, &plan).unwrap();

        assert!(dot.starts_with("digraph GOAP {"));
        assert!(dot.contains("Initial State\\nAgent: Room 1"));
        assert!(dot.contains("Goal State\\nAgent.location: Room 2"));
        assert!(dot.contains("activate_simple_door\\nAccess Door Activator 1"));
        assert!(dot.contains("Access Door.closed: false"));
        assert!(dot.contains("initial -> step_0;"));
        assert!(dot.contains("step_0 -> step_1;"));
        assert!(dot.contains("step_1 -> goal [label=\"achieves\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_empty_plan() {
        let world = reference::reference_world();
        let dot = GoapVisualizer::default()
            .render_plan(&world, &[], &Plan::default())
            .unwrap();
        assert!(dot.contains("initial -> goal"));
        assert!(!dot.contains("step_0"));
    }

    #[test]
    fn test_visualize_plan_writes_file() {
        let world = reference::reference_world();
        let (goals, plan) = door_plan();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.dot");

        GoapVisualizer::new()
            .visualize_plan(&world, &goals, &plan, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("digraph GOAP"));
        assert!(content.contains("traverse_portal\\nAccess Door"));
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
    }
}
