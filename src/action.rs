//! # Action Module
//!
//! This module provides the two faces of an action:
//!
//! * [`ActionSchema`]: a named operation with a precondition over a state and
//!   an effect producing a new state, both parameterized by a binding
//! * [`Action`]: a grounded action, i.e. a schema name plus concrete
//!   parameter values, which is what plans are made of
//!
//! [`FnSchema`] builds a schema from closures, which is handy for small or
//! ad-hoc domains.
//!
//! ## Basic Usage
//!
//! ```
//! use strips_rs::{ActionSchema, Fact, FnSchema, State};
//!
//! // switch_on(lamp): requires the lamp to be off, turns it on
//! let switch_on = FnSchema::new("switch_on", 1)
//!     .with_candidates(|state| {
//!         state.facts("Off").iter().map(|f| f.terms().to_vec()).collect()
//!     })
//!     .with_precondition(|state, params| state.contains("Off", &Fact::new(params)))
//!     .with_effect(|state, params| {
//!         let mut next = state.clone();
//!         next.remove_fact("Off", &Fact::new(params));
//!         next.insert_fact("On", Fact::new(params));
//!         Ok(next)
//!     });
//!
//! let state = State::new().with_facts("Off", ["desk_lamp"]);
//! let params = vec!["desk_lamp".to_string()];
//!
//! assert!(switch_on.precondition(&state, &params));
//! let next = switch_on.effect(&state, &params).unwrap();
//! assert!(next.contains("On", &Fact::from("desk_lamp")));
//! // The input state is untouched
//! assert!(state.contains("Off", &Fact::from("desk_lamp")));
//! ```

use std::fmt;

use crate::{PlanError, Result, State};

/// A named operation over states.
///
/// Implementations must be pure: `precondition` and `effect` read the given
/// state and never mutate it, and `candidates` must return the same bindings
/// in the same order for equal states.
///
/// `effect` is only called after `precondition` returned `true` for the same
/// state and parameters.
pub trait ActionSchema: Send + Sync {
    /// Unique name of the operation inside a domain
    fn name(&self) -> &str;

    /// Number of parameters a grounded action carries
    fn arity(&self) -> usize;

    /// Parameter bindings worth testing in `state`, drawn from its relations.
    fn candidates(&self, state: &State) -> Vec<Vec<String>>;

    fn precondition(&self, state: &State, params: &[String]) -> bool;

    /// Produces the successor of `state`.
    fn effect(&self, state: &State, params: &[String]) -> Result<State>;
}

/// Destructures `params` into exactly `N` parameters.
///
/// Schema implementations use this to turn a malformed binding into
/// [`PlanError::ArityMismatch`] instead of indexing out of bounds.
///
/// ```
/// use strips_rs::action::bind;
///
/// let params = vec!["b1".to_string(), "s1".to_string()];
/// let [book, shelf] = bind::<2>("place_on_shelf", &params).unwrap();
/// assert_eq!((book, shelf), ("b1", "s1"));
/// assert!(bind::<1>("pick", &params).is_err());
/// ```
pub fn bind<'a, const N: usize>(action: &str, params: &'a [String]) -> Result<[&'a str; N]> {
    if params.len() != N {
        return Err(PlanError::ArityMismatch {
            action: action.to_string(),
            expected: N,
            found: params.len(),
        });
    }
    Ok(std::array::from_fn(|i| params[i].as_str()))
}

/// A grounded action: schema name plus concrete parameters.
///
/// # Examples
///
/// ```
/// use strips_rs::Action;
///
/// let action = Action::new("pick", ["b1", "returned_cart"]);
/// assert_eq!(action.param(0), Some("b1"));
/// assert_eq!(action.to_string(), "pick(b1, returned_cart)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    pub name: String,
    pub params: Vec<String>,
}

impl Action {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

type CandidatesFn = Box<dyn Fn(&State) -> Vec<Vec<String>> + Send + Sync>;
type PreconditionFn = Box<dyn Fn(&State, &[String]) -> bool + Send + Sync>;
type EffectFn = Box<dyn Fn(&State, &[String]) -> Result<State> + Send + Sync>;

/// An [`ActionSchema`] assembled from closures.
///
/// Defaults: no candidates (a single empty binding for zero-arity schemas), a
/// precondition that always holds, and an effect that returns the state
/// unchanged.
pub struct FnSchema {
    name: String,
    arity: usize,
    candidates: Option<CandidatesFn>,
    precondition: Option<PreconditionFn>,
    effect: Option<EffectFn>,
}

impl FnSchema {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            candidates: None,
            precondition: None,
            effect: None,
        }
    }

    pub fn with_candidates<F>(mut self, func: F) -> Self
    where
        F: Fn(&State) -> Vec<Vec<String>> + Send + Sync + 'static,
    {
        self.candidates = Some(Box::new(func));
        self
    }

    pub fn with_precondition<F>(mut self, func: F) -> Self
    where
        F: Fn(&State, &[String]) -> bool + Send + Sync + 'static,
    {
        self.precondition = Some(Box::new(func));
        self
    }

    pub fn with_effect<F>(mut self, func: F) -> Self
    where
        F: Fn(&State, &[String]) -> Result<State> + Send + Sync + 'static,
    {
        self.effect = Some(Box::new(func));
        self
    }
}

impl fmt::Debug for FnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl ActionSchema for FnSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn candidates(&self, state: &State) -> Vec<Vec<String>> {
        match &self.candidates {
            Some(func) => func(state),
            None if self.arity == 0 => vec![Vec::new()],
            None => Vec::new(),
        }
    }

    fn precondition(&self, state: &State, params: &[String]) -> bool {
        self.precondition
            .as_ref()
            .map_or(true, |func| func(state, params))
    }

    fn effect(&self, state: &State, params: &[String]) -> Result<State> {
        match &self.effect {
            Some(func) => func(state, params),
            None => Ok(state.clone()),
        }
    }
}
