//! Goals and the goal test.
//!
//! A [`Goal`] is a partial state: for each relation it names, the facts that
//! must be present. Relations the goal does not name are unconstrained, and
//! flags never take part in goal matching.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{Fact, State};

/// Required facts, keyed by relation name.
///
/// # Examples
///
/// ```
/// use strips_rs::{Goal, State};
///
/// let goal = Goal::new()
///     .require("At", [("b1", "s1")])
///     .require("Delivered", [("b3", "u1")]);
///
/// let state = State::new()
///     .with_facts("At", [("b1", "s1"), ("b2", "cart")])
///     .with_facts("Delivered", [("b3", "u1")]);
///
/// assert!(goal.is_satisfied_by(&state));
/// assert!(state.satisfies(&goal));
/// assert!(Goal::new().is_satisfied_by(&State::new()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Goal {
    required: BTreeMap<String, BTreeSet<Fact>>,
}

impl Goal {
    pub fn new() -> Self {
        Self {
            required: BTreeMap::new(),
        }
    }

    /// Requires every fact in `facts` to be present in relation `name`.
    ///
    /// Calling it twice for the same relation accumulates the requirements.
    pub fn require<I, F>(mut self, name: impl Into<String>, facts: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        self.required
            .entry(name.into())
            .or_default()
            .extend(facts.into_iter().map(Into::into));
        self
    }

    /// Returns the facts required in relation `name`, `None` when unconstrained.
    pub fn facts(&self, name: &str) -> Option<&BTreeSet<Fact>> {
        self.required.get(name)
    }

    /// Iterates the constrained relations in name order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &BTreeSet<Fact>)> {
        self.required.iter().map(|(name, facts)| (name.as_str(), facts))
    }

    /// Total number of required facts across all relations.
    pub fn len(&self) -> usize {
        self.required.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The goal test: every required set is a subset of the state's relation.
    pub fn is_satisfied_by(&self, state: &State) -> bool {
        self.required
            .iter()
            .all(|(name, facts)| facts.is_subset(state.facts(name)))
    }

    /// Iterates the required `(relation, fact)` pairs that `state` lacks.
    pub fn missing<'a>(&'a self, state: &'a State) -> impl Iterator<Item = (&'a str, &'a Fact)> {
        self.required.iter().flat_map(move |(name, facts)| {
            let present = state.facts(name);
            facts
                .iter()
                .filter(move |fact| !present.contains(*fact))
                .map(move |fact| (name.as_str(), fact))
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, facts)) in self.required.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let facts: Vec<String> = facts.iter().map(ToString::to_string).collect();
            write!(f, "{} ⊇ {{{}}}", name, facts.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_goal() -> Goal {
        Goal::new()
            .require("At", [("b1", "s1"), ("b2", "s2")])
            .require("Delivered", [("b3", "u1")])
    }

    #[test]
    fn test_empty_goal_always_satisfied() {
        let goal = Goal::new();
        assert!(goal.is_empty());
        assert!(goal.is_satisfied_by(&State::new()));
        assert!(goal.is_satisfied_by(&State::new().with_flag("RobotEmpty", false)));
    }

    #[test]
    fn test_partial_satisfaction_fails() {
        let state = State::new()
            .with_facts("At", [("b1", "s1"), ("b2", "s2")])
            .with_facts("Delivered", Vec::<(&str, &str)>::new());
        assert!(!library_goal().is_satisfied_by(&state));
    }

    #[test]
    fn test_superset_satisfies() {
        let state = State::new()
            .with_facts("At", [("b1", "s1"), ("b2", "s2"), ("b4", "cart")])
            .with_facts("Delivered", [("b3", "u1"), ("b5", "u2")])
            .with_flag("RobotEmpty", true);
        assert!(state.satisfies(&library_goal()));
    }

    #[test]
    fn test_missing_relation_reads_as_empty() {
        let state = State::new().with_facts("At", [("b1", "s1"), ("b2", "s2")]);
        let goal = library_goal();
        let missing: Vec<_> = goal.missing(&state).collect();
        assert_eq!(missing, vec![("Delivered", &Fact::from(("b3", "u1")))]);
    }

    #[test]
    fn test_require_accumulates() {
        let goal = Goal::new()
            .require("At", [("b1", "s1")])
            .require("At", [("b2", "s2")]);
        assert_eq!(goal.len(), 2);
        assert_eq!(goal.facts("At").map(BTreeSet::len), Some(2));
        assert_eq!(goal.facts("Held"), None);
    }

    #[test]
    fn test_goal_test_does_not_mutate() {
        let state = State::new().with_facts("At", [("b1", "s1")]);
        let before = state.clone();
        let _ = library_goal().is_satisfied_by(&state);
        let _ = library_goal().missing(&state).count();
        assert_eq!(state, before);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            library_goal().to_string(),
            "At ⊇ {(b1, s1), (b2, s2)}; Delivered ⊇ {(b3, u1)}"
        );
    }
}
