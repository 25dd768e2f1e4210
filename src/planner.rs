//! # Planner Module
//!
//! The [`Planner`] ties a [`Domain`] to a search strategy and is the usual
//! entry point for callers who just want a plan.
//!
//! ## Basic Usage
//!
//! ```
//! use strips_rs::{library, Planner, PlannerConfig, SearchMode};
//!
//! let (initial, goal) = library::sample_problem();
//!
//! // A* with the default heuristic
//! let planner = Planner::new(library::domain()?);
//! let plan = planner.plan(&initial, &goal)?;
//! assert_eq!(plan.len(), 6);
//!
//! // Breadth-first with a node budget
//! let config = PlannerConfig {
//!     mode: SearchMode::BreadthFirst,
//!     max_expansions: Some(10_000),
//! };
//! let planner = Planner::with_config(library::domain()?, config);
//! let outcome = planner.search(&initial, &goal)?;
//! assert_eq!(outcome.plan.map(|p| p.len()), Some(6));
//! # Ok::<(), strips_rs::PlanError>(())
//! ```

use std::sync::Arc;

use crate::search::{AStarSearch, BreadthFirstSearch, SearchAlgorithm, SearchMode, SearchOutcome};
use crate::{Action, Domain, Goal, Result, State};

/// Search settings for [`Planner::with_config`].
///
/// The default is A* with [`UnsatisfiedGoalFacts`](crate::heuristic::UnsatisfiedGoalFacts)
/// and no expansion budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlannerConfig {
    pub mode: SearchMode,
    /// Maximum number of states to expand before giving up
    pub max_expansions: Option<usize>,
}

impl PlannerConfig {
    fn into_algorithm(self) -> Arc<dyn SearchAlgorithm> {
        match (self.mode, self.max_expansions) {
            (SearchMode::BreadthFirst, None) => Arc::new(BreadthFirstSearch::new()),
            (SearchMode::BreadthFirst, Some(limit)) => {
                Arc::new(BreadthFirstSearch::new().with_max_expansions(limit))
            }
            (SearchMode::AStar, None) => Arc::new(AStarSearch::default()),
            (SearchMode::AStar, Some(limit)) => {
                Arc::new(AStarSearch::default().with_max_expansions(limit))
            }
        }
    }
}

/// Finds action sequences that transform a state into one satisfying a goal.
///
/// Clones share the search strategy of the planner they were cloned from.
#[derive(Clone)]
pub struct Planner {
    domain: Domain,
    search_algorithm: Arc<dyn SearchAlgorithm>,
}

impl Planner {
    /// Creates a planner using A* with the default heuristic.
    pub fn new(domain: Domain) -> Self {
        Self::with_config(domain, PlannerConfig::default())
    }

    pub fn with_config(domain: Domain, config: PlannerConfig) -> Self {
        Self {
            domain,
            search_algorithm: config.into_algorithm(),
        }
    }

    /// Creates a planner with a custom search strategy.
    pub fn with_search_algorithm(domain: Domain, search_algorithm: Box<dyn SearchAlgorithm>) -> Self {
        Self {
            domain,
            search_algorithm: Arc::from(search_algorithm),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Runs the search and reports the outcome, plan or not.
    pub fn search(&self, current_state: &State, goal: &Goal) -> Result<SearchOutcome> {
        let outcome = self
            .search_algorithm
            .search(&self.domain, current_state, goal)?;
        match &outcome.plan {
            Some(plan) => {
                log::info!(
                    "Generated plan with {} actions ({} states expanded)",
                    plan.len(),
                    outcome.states_expanded
                );
                for (i, action) in plan.iter().enumerate() {
                    log::info!("  Step {}: {}", i + 1, action);
                }
            }
            None => log::info!(
                "No plan found ({} states expanded)",
                outcome.states_expanded
            ),
        }
        Ok(outcome)
    }

    /// Returns a plan, or [`PlanError::NoPlanFound`](crate::PlanError::NoPlanFound).
    pub fn plan(&self, current_state: &State, goal: &Goal) -> Result<Vec<Action>> {
        self.search(current_state, goal)?.into_plan()
    }
}
