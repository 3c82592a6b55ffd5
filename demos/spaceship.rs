//! Plans the shuttle launch in the three-room spaceship.
//!
//! Run with `RUST_LOG=debug cargo run --example spaceship [world.json] [config.json]`.
//! Without arguments the built-in reference world is used.

use std::error::Error;

use goap_rooms::reference::{self, AGENT};
use goap_rooms::{AttributeKey, Fact, GoapVisualizer, Planner, PlannerConfig, WorldDefinition};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (world, distances) = match args.next() {
        Some(path) => WorldDefinition::from_path(path)?.into_world()?,
        None => (reference::reference_world(), reference::reference_distances()),
    };
    let config = match args.next() {
        Some(path) => PlannerConfig::from_path(path)?,
        None => PlannerConfig::default(),
    };

    println!("Initial world:\n{}", world);

    let goals = vec![Fact::new(reference::SHUTTLE_LAUNCH, AttributeKey::Activated, true)];
    let planner = Planner::new(world.clone(), goals.clone(), AGENT)
        .with_config(config)
        .with_distances(distances);

    match planner.plan_mixed()? {
        Some(plan) => {
            println!("Plan ({} steps, cost {}):", plan.len(), plan.cost());
            print!("{}", plan);

            let end = plan.replay(&world)?;
            println!("\nFinal world:\n{}", end);

            GoapVisualizer::new().visualize_plan(&world, &goals, &plan, "spaceship_plan.dot")?;
            println!("Plan graph written to spaceship_plan.dot");
        }
        None => println!("No plan found"),
    }

    Ok(())
}
