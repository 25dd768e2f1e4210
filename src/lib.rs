pub mod action;
mod domain;
mod error;
mod goal;
pub mod heuristic;
pub mod library;
mod planner;
pub mod search;
mod state;
mod visualizer;

pub use action::{Action, ActionSchema, FnSchema};
pub use domain::Domain;
pub use error::{PlanError, Result};
pub use goal::Goal;
pub use heuristic::{HeuristicStrategy, UnsatisfiedGoalFacts, ZeroHeuristic};
pub use planner::{Planner, PlannerConfig};
pub use search::{
    search, AStarSearch, BreadthFirstSearch, DijkstraSearch, SearchAlgorithm, SearchMode,
    SearchOutcome,
};
pub use state::{Fact, Relation, State};
pub use visualizer::PlanVisualizer;
