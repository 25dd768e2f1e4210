use strips_rs::{library, search, PlanVisualizer, Result, SearchMode};

fn main() -> Result<()> {
    env_logger::init();

    let domain = library::domain()?;
    let (initial, goal) = library::sample_problem();

    println!("Initial state: {}", initial);
    println!("Goal: {}", goal);

    for mode in [SearchMode::BreadthFirst, SearchMode::AStar] {
        let outcome = search(&initial, &goal, &domain, mode, None)?;

        println!();
        println!("== {} ==", mode);
        match &outcome.plan {
            Some(plan) => {
                println!("Plan found:");
                for (i, step) in plan.iter().enumerate() {
                    println!("{}. {}", i + 1, step);
                }
            }
            None => println!("No plan found"),
        }
        println!("States explored: {}", outcome.states_expanded);

        if let (SearchMode::AStar, Some(plan)) = (mode, &outcome.plan) {
            PlanVisualizer::new().visualize_plan(
                &domain,
                &initial,
                &goal,
                plan,
                "library_plan.dot",
            )?;
            println!("Plan graph written to library_plan.dot");
        }
    }

    Ok(())
}
