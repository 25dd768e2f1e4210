//! # Search Module
//!
//! Forward state-space search over the implicit graph a [`Domain`] induces:
//! nodes are states, edges are grounded actions whose precondition holds in
//! the source state, and every edge costs 1.
//!
//! Engines:
//!
//! * [`BreadthFirstSearch`]: FIFO frontier, returns a plan with the fewest
//!   actions
//! * [`AStarSearch`]: frontier ordered by `(f = g + h, g, insertion order)`,
//!   optimal with an admissible and consistent heuristic
//! * [`DijkstraSearch`]: A* with [`ZeroHeuristic`]
//!
//! All engines share one expansion policy. A popped node whose state is
//! already closed is discarded; otherwise the state is closed and then goal
//! tested, so a returned `states_expanded` includes the goal state itself.
//! Successors whose state is already closed are never pushed.
//!
//! ## Basic Usage
//!
//! ```
//! use strips_rs::search::{search, SearchMode};
//! use strips_rs::{Domain, FnSchema, Goal, State};
//!
//! let domain = Domain::new().with_schema(
//!     FnSchema::new("boil_water", 0)
//!         .with_precondition(|state, _| state.flag("HasKettle"))
//!         .with_effect(|state, _| {
//!             let mut next = state.clone();
//!             next.insert_fact("Ready", "water");
//!             Ok(next)
//!         }),
//! )?;
//!
//! let initial = State::new().with_flag("HasKettle", true);
//! let goal = Goal::new().require("Ready", ["water"]);
//!
//! let outcome = search(&initial, &goal, &domain, SearchMode::BreadthFirst, None)?;
//! assert_eq!(outcome.plan.map(|p| p.len()), Some(1));
//! assert_eq!(outcome.states_expanded, 2);
//! # Ok::<(), strips_rs::PlanError>(())
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;

use crate::heuristic::{HeuristicStrategy, UnsatisfiedGoalFacts, ZeroHeuristic};
use crate::{Action, Domain, Goal, PlanError, Result, State};

/// A search strategy over the state graph of a domain.
pub trait SearchAlgorithm: Send + Sync {
    /// Searches for a plan from `initial` to a state satisfying `goal`.
    ///
    /// An unreachable goal is `Ok` with no plan. Errors come from the domain
    /// (a schema effect failing) or from an exhausted expansion budget.
    fn search(&self, domain: &Domain, initial: &State, goal: &Goal) -> Result<SearchOutcome>;
}

/// Result of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The actions leading to the goal, `None` when the frontier ran dry
    pub plan: Option<Vec<Action>>,
    /// Number of distinct states placed in the closed set
    pub states_expanded: usize,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }

    /// Returns the plan, or [`PlanError::NoPlanFound`] when there is none.
    pub fn into_plan(self) -> Result<Vec<Action>> {
        self.plan.ok_or(PlanError::NoPlanFound {
            states_expanded: self.states_expanded,
        })
    }
}

/// Which engine [`search`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    BreadthFirst,
    #[default]
    AStar,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::BreadthFirst => write!(f, "breadth-first"),
            SearchMode::AStar => write!(f, "A*"),
        }
    }
}

/// Runs one search with explicit inputs.
///
/// `heuristic` is only used by A*, which falls back to
/// [`UnsatisfiedGoalFacts`] when it is `None`.
pub fn search(
    initial: &State,
    goal: &Goal,
    domain: &Domain,
    mode: SearchMode,
    heuristic: Option<&dyn HeuristicStrategy>,
) -> Result<SearchOutcome> {
    match mode {
        SearchMode::BreadthFirst => breadth_first(domain, initial, goal, None),
        SearchMode::AStar => match heuristic {
            Some(heuristic) => astar(domain, initial, goal, heuristic, None),
            None => astar(domain, initial, goal, &UnsatisfiedGoalFacts::new(), None),
        },
    }
}

#[derive(Debug, Clone)]
struct Node {
    state: State,
    parent: Option<usize>,
    action: Option<Action>,
    g_cost: u32,
}

/// Priority of an A* frontier entry, smallest first once wrapped in `Reverse`.
///
/// Field order is the comparison order: f, then g, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    f_cost: u32,
    g_cost: u32,
    seq: u64,
    idx: usize,
}

struct SearchContext {
    nodes: Vec<Node>,
    closed_set: HashSet<State>,
    max_expansions: Option<usize>,
}

impl SearchContext {
    fn new(initial_state: &State, max_expansions: Option<usize>) -> Self {
        Self {
            nodes: vec![Node {
                state: initial_state.clone(),
                parent: None,
                action: None,
                g_cost: 0,
            }],
            closed_set: HashSet::new(),
            max_expansions,
        }
    }

    /// Moves the node's state into the closed set.
    ///
    /// Returns `false` when the state was already closed.
    fn close(&mut self, idx: usize) -> Result<bool> {
        let state = &self.nodes[idx].state;
        if self.closed_set.contains(state) {
            return Ok(false);
        }
        if let Some(limit) = self.max_expansions {
            if self.closed_set.len() >= limit {
                log::debug!("Expansion limit of {} states reached", limit);
                return Err(PlanError::ExpansionLimitReached { limit });
            }
        }
        log::trace!(
            "Expanding node {} at depth {}: {}",
            idx,
            self.nodes[idx].g_cost,
            state
        );
        self.closed_set.insert(state.clone());
        Ok(true)
    }

    /// Generates the successors of a node and returns their arena indices.
    fn generate_successors(&mut self, domain: &Domain, parent_idx: usize) -> Result<Vec<usize>> {
        let parent = &self.nodes[parent_idx];
        let g_cost = parent.g_cost + 1;
        let successors = domain.successors(&parent.state)?;

        let mut indices = Vec::with_capacity(successors.len());
        for (action, state) in successors {
            if self.closed_set.contains(&state) {
                continue;
            }
            indices.push(self.nodes.len());
            self.nodes.push(Node {
                state,
                parent: Some(parent_idx),
                action: Some(action),
                g_cost,
            });
        }
        Ok(indices)
    }

    fn reconstruct_path(&self, node_idx: usize) -> Vec<Action> {
        let mut path = Vec::new();
        let mut current_idx = Some(node_idx);

        while let Some(node) = current_idx.and_then(|idx| self.nodes.get(idx)) {
            if let Some(action) = &node.action {
                path.push(action.clone());
            }
            current_idx = node.parent;
        }

        path.reverse();
        path
    }

    fn found(&self, node_idx: usize) -> SearchOutcome {
        let plan = self.reconstruct_path(node_idx);
        log::debug!(
            "Goal reached with a {}-action plan after expanding {} states",
            plan.len(),
            self.closed_set.len()
        );
        SearchOutcome {
            plan: Some(plan),
            states_expanded: self.closed_set.len(),
        }
    }

    fn exhausted(&self) -> SearchOutcome {
        log::debug!(
            "Frontier exhausted after expanding {} states",
            self.closed_set.len()
        );
        SearchOutcome {
            plan: None,
            states_expanded: self.closed_set.len(),
        }
    }
}

fn breadth_first(
    domain: &Domain,
    initial: &State,
    goal: &Goal,
    max_expansions: Option<usize>,
) -> Result<SearchOutcome> {
    log::debug!("Starting breadth-first search towards {}", goal);
    let mut context = SearchContext::new(initial, max_expansions);
    let mut frontier = VecDeque::from([0]);

    while let Some(current_idx) = frontier.pop_front() {
        if !context.close(current_idx)? {
            continue;
        }
        if goal.is_satisfied_by(&context.nodes[current_idx].state) {
            return Ok(context.found(current_idx));
        }
        frontier.extend(context.generate_successors(domain, current_idx)?);
    }

    Ok(context.exhausted())
}

fn astar(
    domain: &Domain,
    initial: &State,
    goal: &Goal,
    heuristic: &dyn HeuristicStrategy,
    max_expansions: Option<usize>,
) -> Result<SearchOutcome> {
    log::debug!("Starting A* search towards {}", goal);
    let mut context = SearchContext::new(initial, max_expansions);
    let mut open_set = BinaryHeap::new();
    let mut seq: u64 = 0;

    open_set.push(Reverse(FrontierEntry {
        f_cost: heuristic.calculate(initial, goal),
        g_cost: 0,
        seq,
        idx: 0,
    }));

    while let Some(Reverse(entry)) = open_set.pop() {
        if !context.close(entry.idx)? {
            continue;
        }
        if goal.is_satisfied_by(&context.nodes[entry.idx].state) {
            return Ok(context.found(entry.idx));
        }

        for successor_idx in context.generate_successors(domain, entry.idx)? {
            let node = &context.nodes[successor_idx];
            let h_cost = heuristic.calculate(&node.state, goal);
            seq += 1;
            open_set.push(Reverse(FrontierEntry {
                f_cost: node.g_cost.saturating_add(h_cost),
                g_cost: node.g_cost,
                seq,
                idx: successor_idx,
            }));
        }
    }

    Ok(context.exhausted())
}

/// Uninformed breadth-first search; returns a plan with the fewest actions.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirstSearch {
    max_expansions: Option<usize>,
}

impl BreadthFirstSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops with [`PlanError::ExpansionLimitReached`] after `limit` expansions.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

impl SearchAlgorithm for BreadthFirstSearch {
    fn search(&self, domain: &Domain, initial: &State, goal: &Goal) -> Result<SearchOutcome> {
        breadth_first(domain, initial, goal, self.max_expansions)
    }
}

/// Heuristic-guided A* search.
pub struct AStarSearch {
    heuristic: Box<dyn HeuristicStrategy>,
    max_expansions: Option<usize>,
}

impl AStarSearch {
    pub fn new(heuristic: Box<dyn HeuristicStrategy>) -> Self {
        Self {
            heuristic,
            max_expansions: None,
        }
    }

    /// A* guided by [`UnsatisfiedGoalFacts`].
    pub fn with_default_heuristic() -> Self {
        Self::new(Box::new(UnsatisfiedGoalFacts::new()))
    }

    /// Stops with [`PlanError::ExpansionLimitReached`] after `limit` expansions.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::with_default_heuristic()
    }
}

impl SearchAlgorithm for AStarSearch {
    fn search(&self, domain: &Domain, initial: &State, goal: &Goal) -> Result<SearchOutcome> {
        astar(
            domain,
            initial,
            goal,
            self.heuristic.as_ref(),
            self.max_expansions,
        )
    }
}

/// Uniform-cost search: A* without an estimate.
#[derive(Debug, Clone, Default)]
pub struct DijkstraSearch {
    max_expansions: Option<usize>,
}

impl DijkstraSearch {
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

impl SearchAlgorithm for DijkstraSearch {
    fn search(&self, domain: &Domain, initial: &State, goal: &Goal) -> Result<SearchOutcome> {
        astar(domain, initial, goal, &ZeroHeuristic, self.max_expansions)
    }
}
