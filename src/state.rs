//! # State Module
//!
//! This module provides the [`State`] structure, the snapshot of the world the
//! planner searches over, together with its building blocks [`Fact`] and
//! [`Relation`].
//!
//! ## Model
//!
//! A state maps relation names to either:
//! - a set of fact tuples (`At = {(b1, s1), (b2, cart)}`), or
//! - a boolean scalar flag (`RobotEmpty = true`).
//!
//! The engine never interprets relation names. Conventions such as "a book is
//! in at most one place" belong to the domain that defines the actions.
//!
//! ## Value semantics
//!
//! States compare and hash by content. Relation names and facts live in
//! ordered containers, so the derived `Hash` is a canonical serialization of
//! the whole state and a `HashSet<State>` deduplicates visited states.
//!
//! Fact sets are reference counted and copied on first write. Cloning a state
//! is cheap; a successor only pays for the relations its effect touches, and
//! a write through one state is never visible in another.
//!
//! ## Basic Usage
//!
//! ```
//! use strips_rs::{Fact, State};
//!
//! let state = State::new()
//!     .with_facts("At", [("b1", "cart"), ("b2", "s1")])
//!     .with_flag("RobotEmpty", true);
//!
//! assert!(state.contains("At", &Fact::from(("b1", "cart"))));
//! assert!(state.flag("RobotEmpty"));
//!
//! // Absent relations read as empty
//! assert!(state.facts("Held").is_empty());
//! assert!(!state.flag("Charging"));
//!
//! // Successors are independent values
//! let mut next = state.clone();
//! next.remove_fact("At", &Fact::from(("b1", "cart")));
//! next.insert_fact("Held", "b1");
//! next.set_flag("RobotEmpty", false);
//!
//! assert!(state.contains("At", &Fact::from(("b1", "cart"))));
//! assert_ne!(state, next);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::Goal;

static EMPTY_FACTS: BTreeSet<Fact> = BTreeSet::new();

/// An ordered tuple of atoms, e.g. `(b1, s1)` or the unary `s1`.
///
/// Facts are ordered lexicographically by their terms, which gives every fact
/// set one canonical iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fact(Vec<String>);

impl Fact {
    /// Builds a fact from its terms, in order.
    ///
    /// ```
    /// use strips_rs::Fact;
    ///
    /// let fact = Fact::new(["b3", "u1"]);
    /// assert_eq!(fact.arity(), 2);
    /// assert_eq!(fact.term(1), Some("u1"));
    /// assert_eq!(fact.to_string(), "(b3, u1)");
    /// ```
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(terms.into_iter().map(Into::into).collect())
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl From<&str> for Fact {
    fn from(atom: &str) -> Self {
        Self(vec![atom.to_string()])
    }
}

impl From<String> for Fact {
    fn from(atom: String) -> Self {
        Self(vec![atom])
    }
}

impl<A, B> From<(A, B)> for Fact
where
    A: Into<String>,
    B: Into<String>,
{
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [atom] => write!(f, "{}", atom),
            terms => write!(f, "({})", terms.join(", ")),
        }
    }
}

/// The value stored under a relation name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// A set of fact tuples, shared between states until written
    Facts(Arc<BTreeSet<Fact>>),
    /// A boolean scalar flag
    Flag(bool),
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Flag(value) => write!(f, "{}", value),
            Relation::Facts(facts) => {
                write!(f, "{{")?;
                for (i, fact) in facts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", fact)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A snapshot of the world: named relations of facts and scalar flags.
///
/// `State` is a value object. Two states holding the same relations are equal
/// and hash identically no matter how they were produced.
///
/// Only content is stored: an emptied fact set is dropped and a flag set to
/// `false` is removed, so a relation that reads empty is always absent.
///
/// # Examples
///
/// ```
/// use strips_rs::{Fact, State};
///
/// let a = State::new().with_facts("ShelfAvailable", ["s1", "s2"]);
/// let b = State::new().with_facts("ShelfAvailable", ["s2", "s1"]);
/// assert_eq!(a, b);
///
/// let mut c = State::new();
/// c.insert_fact("Held", "b1");
/// c.remove_fact("Held", &Fact::from("b1"));
/// assert_eq!(c, State::new().with_flag("RobotEmpty", false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    facts: BTreeMap<String, Arc<BTreeSet<Fact>>>,
    flags: BTreeSet<String>,
}

impl State {
    /// Creates a state with no relations.
    pub fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
            flags: BTreeSet::new(),
        }
    }

    /// Adds `facts` to the relation `name`, creating it if needed.
    ///
    /// An empty `facts` leaves the state unchanged.
    pub fn with_facts<I, F>(mut self, name: impl Into<String>, facts: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        let mut facts = facts.into_iter().map(Into::into).peekable();
        if facts.peek().is_some() {
            self.facts_mut(name.into()).extend(facts);
        }
        self
    }

    /// Sets the flag `name` to `value`.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set_flag(name, value);
        self
    }

    /// Returns the fact set stored under `name`.
    ///
    /// Absent relations and flags both read as the empty set.
    pub fn facts(&self, name: &str) -> &BTreeSet<Fact> {
        match self.facts.get(name) {
            Some(facts) => facts,
            None => &EMPTY_FACTS,
        }
    }

    pub fn contains(&self, name: &str, fact: &Fact) -> bool {
        self.facts(name).contains(fact)
    }

    /// Returns the flag stored under `name`, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn relation(&self, name: &str) -> Option<Relation> {
        match self.facts.get(name) {
            Some(facts) => Some(Relation::Facts(Arc::clone(facts))),
            None if self.flags.contains(name) => Some(Relation::Flag(true)),
            None => None,
        }
    }

    /// Iterates the stored relations in name order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, Relation)> {
        let mut relations: Vec<_> = self
            .facts
            .iter()
            .map(|(name, facts)| (name.as_str(), Relation::Facts(Arc::clone(facts))))
            .chain(self.flags.iter().map(|name| (name.as_str(), Relation::Flag(true))))
            .collect();
        relations.sort_by(|a, b| a.0.cmp(b.0));
        relations.into_iter()
    }

    /// Inserts a fact, returning `true` if it was not already present.
    ///
    /// Only this relation is copied if it is shared with another state. A flag
    /// stored under the same name is replaced by a fact set.
    pub fn insert_fact(&mut self, name: impl Into<String>, fact: impl Into<Fact>) -> bool {
        self.facts_mut(name.into()).insert(fact.into())
    }

    /// Removes a fact, returning `true` if it was present.
    ///
    /// The relation is dropped once its last fact is removed.
    pub fn remove_fact(&mut self, name: &str, fact: &Fact) -> bool {
        let Some(facts) = self.facts.get_mut(name) else {
            return false;
        };
        // Check first so an unchanged relation is never copied
        if !facts.contains(fact) {
            return false;
        }
        if facts.len() == 1 {
            self.facts.remove(name);
        } else {
            Arc::make_mut(facts).remove(fact);
        }
        true
    }

    /// Sets or clears the flag `name`, replacing any fact set of that name.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        self.facts.remove(&name);
        if value {
            self.flags.insert(name);
        } else {
            self.flags.remove(&name);
        }
    }

    /// Checks whether this state satisfies every requirement of `goal`.
    ///
    /// Shorthand for [`Goal::is_satisfied_by`].
    pub fn satisfies(&self, goal: &Goal) -> bool {
        goal.is_satisfied_by(self)
    }

    fn facts_mut(&mut self, name: String) -> &mut BTreeSet<Fact> {
        self.flags.remove(&name);
        Arc::make_mut(self.facts.entry(name).or_default())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, relation)) in self.relations().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", name, relation)?;
        }
        Ok(())
    }
}
