use strips_rs::{
    search, Action, AStarSearch, BreadthFirstSearch, Domain, Fact, FnSchema, Goal, PlanError,
    PlanVisualizer, Planner, SearchAlgorithm, SearchMode, State,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// gather_wood needs an axe, build_house needs wood.
    fn house_domain() -> Domain {
        let gather_wood = FnSchema::new("gather_wood", 0)
            .with_precondition(|state, _| {
                state.contains("Has", &Fact::from("axe")) && !state.contains("Has", &Fact::from("wood"))
            })
            .with_effect(|state, _| {
                let mut next = state.clone();
                next.insert_fact("Has", "wood");
                Ok(next)
            });
        let build_house = FnSchema::new("build_house", 0)
            .with_precondition(|state, _| state.contains("Has", &Fact::from("wood")))
            .with_effect(|state, _| {
                let mut next = state.clone();
                next.remove_fact("Has", &Fact::from("wood"));
                next.insert_fact("Built", "house");
                Ok(next)
            });

        let mut domain = Domain::new();
        domain.add(gather_wood).unwrap();
        domain.add(build_house).unwrap();
        domain
    }

    #[test]
    fn test_basic_workflow() {
        let planner = Planner::new(house_domain());
        let current_state = State::new().with_facts("Has", ["axe"]);
        let goal = Goal::new().require("Built", ["house"]);

        let plan = planner.plan(&current_state, &goal).unwrap();
        assert_eq!(
            plan,
            vec![
                Action::new("gather_wood", Vec::<String>::new()),
                Action::new("build_house", Vec::<String>::new()),
            ]
        );
    }

    #[test]
    fn test_impossible_goal() {
        let planner = Planner::new(house_domain());
        let goal = Goal::new().require("Built", ["house"]);

        let result = planner.plan(&State::new(), &goal);
        assert!(matches!(
            result,
            Err(PlanError::NoPlanFound { states_expanded: 1 })
        ));
    }

    #[test]
    fn test_search_entry_point_modes_agree() {
        let domain = house_domain();
        let initial = State::new().with_facts("Has", ["axe"]);
        let goal = Goal::new().require("Built", ["house"]);

        let bfs = search(&initial, &goal, &domain, SearchMode::BreadthFirst, None).unwrap();
        let astar = search(&initial, &goal, &domain, SearchMode::AStar, None).unwrap();
        assert_eq!(bfs.plan, astar.plan);
        assert_eq!(bfs.states_expanded, 3);
    }

    #[test]
    fn test_searches_run_on_separate_threads() {
        let domain = house_domain();
        let initial = State::new().with_facts("Has", ["axe"]);
        let goal = Goal::new().require("Built", ["house"]);

        let (bfs, astar) = std::thread::scope(|scope| {
            let bfs = scope.spawn(|| BreadthFirstSearch::new().search(&domain, &initial, &goal));
            let astar = scope.spawn(|| AStarSearch::default().search(&domain, &initial, &goal));
            (bfs.join().unwrap(), astar.join().unwrap())
        });
        assert_eq!(bfs.unwrap().plan, astar.unwrap().plan);
    }

    #[test]
    fn test_visualize_planning() {
        let domain = house_domain();
        let planner = Planner::new(domain.clone());
        let current_state = State::new().with_facts("Has", ["axe"]);
        let goal = Goal::new().require("Built", ["house"]);
        let plan = planner.plan(&current_state, &goal).unwrap();

        let path = std::env::temp_dir().join("strips_rs_planning_visualization.dot");
        PlanVisualizer::new()
            .visualize_plan(&domain, &current_state, &goal, &plan, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("gather_wood()"));
        assert!(content.contains("build_house()"));
        std::fs::remove_file(&path).unwrap();
    }
}
