//! Cost-to-go estimators for A* search.

use std::collections::BTreeSet;

use crate::{Goal, State};

/// Estimates how many actions remain between `state` and `goal`.
///
/// A* only returns shortest plans when the estimate never exceeds the true
/// remaining cost (admissible). The closed-set policy of the search engines
/// additionally assumes it is consistent: `h(s) <= 1 + h(s')` for every
/// action leading from `s` to `s'`.
pub trait HeuristicStrategy: Send + Sync {
    fn calculate(&self, state: &State, goal: &Goal) -> u32;
}

impl<F> HeuristicStrategy for F
where
    F: Fn(&State, &Goal) -> u32 + Send + Sync,
{
    fn calculate(&self, state: &State, goal: &Goal) -> u32 {
        self(state, goal)
    }
}

/// Counts the required goal facts missing from the state.
///
/// Admissible as long as no single action establishes two goal facts at once,
/// which holds for domains where each action adds at most one fact to any goal
/// relation. Domains that break that assumption must use another estimator.
///
/// # Examples
///
/// ```
/// use strips_rs::heuristic::{HeuristicStrategy, UnsatisfiedGoalFacts};
/// use strips_rs::{Goal, State};
///
/// let goal = Goal::new()
///     .require("At", [("b1", "s1"), ("b2", "s2")])
///     .require("Delivered", [("b3", "u1")]);
/// let state = State::new().with_facts("At", [("b1", "s1")]);
///
/// assert_eq!(UnsatisfiedGoalFacts::default().calculate(&state, &goal), 2);
/// assert_eq!(UnsatisfiedGoalFacts::only(["Delivered"]).calculate(&state, &goal), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnsatisfiedGoalFacts {
    relations: Option<BTreeSet<String>>,
}

impl UnsatisfiedGoalFacts {
    /// Counts missing facts over every goal relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts missing facts over the named relations only.
    pub fn only<I, S>(relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relations: Some(relations.into_iter().map(Into::into).collect()),
        }
    }
}

impl HeuristicStrategy for UnsatisfiedGoalFacts {
    fn calculate(&self, state: &State, goal: &Goal) -> u32 {
        let missing = goal
            .missing(state)
            .filter(|(name, _)| {
                self.relations
                    .as_ref()
                    .map_or(true, |only| only.contains(*name))
            })
            .count();
        u32::try_from(missing).unwrap_or(u32::MAX)
    }
}

/// Always zero; turns A* into uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl HeuristicStrategy for ZeroHeuristic {
    fn calculate(&self, _state: &State, _goal: &Goal) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        Goal::new()
            .require("At", [("b1", "s1"), ("b2", "s2")])
            .require("Delivered", [("b3", "u1")])
    }

    #[test]
    fn test_counts_all_missing_facts() {
        let h = UnsatisfiedGoalFacts::new();
        assert_eq!(h.calculate(&State::new(), &goal()), 3);

        let done = State::new()
            .with_facts("At", [("b1", "s1"), ("b2", "s2")])
            .with_facts("Delivered", [("b3", "u1")]);
        assert_eq!(h.calculate(&done, &goal()), 0);
    }

    #[test]
    fn test_extra_facts_do_not_count() {
        let state = State::new().with_facts("At", [("b1", "s1"), ("b9", "s9")]);
        assert_eq!(UnsatisfiedGoalFacts::new().calculate(&state, &goal()), 2);
    }

    #[test]
    fn test_restricted_relations() {
        let h = UnsatisfiedGoalFacts::only(["At"]);
        assert_eq!(h.calculate(&State::new(), &goal()), 2);
        let h = UnsatisfiedGoalFacts::only(["Held"]);
        assert_eq!(h.calculate(&State::new(), &goal()), 0);
    }

    #[test]
    fn test_empty_goal_is_zero() {
        let state = State::new().with_facts("At", [("b1", "s1")]);
        assert_eq!(UnsatisfiedGoalFacts::new().calculate(&state, &Goal::new()), 0);
    }

    #[test]
    fn test_zero_heuristic() {
        assert_eq!(ZeroHeuristic.calculate(&State::new(), &goal()), 0);
    }

    #[test]
    fn test_closure_heuristic() {
        let h = |state: &State, _: &Goal| state.facts("Held").len() as u32;
        let state = State::new().with_facts("Held", ["b1", "b2"]);
        assert_eq!(h.calculate(&state, &goal()), 2);
    }
}
