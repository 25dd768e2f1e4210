//! The action enumerator.
//!
//! A [`Domain`] is the ordered collection of action schemas a planner may use.
//! It derives every applicable grounded action from a state and applies
//! grounded actions with their precondition checked.

use std::fmt;
use std::sync::Arc;

use crate::{Action, ActionSchema, PlanError, Result, State};

/// An ordered set of uniquely named action schemas.
///
/// # Examples
///
/// ```
/// use strips_rs::{Action, Domain, FnSchema, State};
///
/// let domain = Domain::new().with_schema(
///     FnSchema::new("switch_on", 0)
///         .with_precondition(|state, _| !state.flag("On"))
///         .with_effect(|state, _| Ok(state.clone().with_flag("On", true))),
/// )?;
///
/// let state = State::new();
/// let actions = domain.applicable_actions(&state);
/// assert_eq!(actions, vec![Action::new("switch_on", Vec::<String>::new())]);
///
/// let next = domain.apply(&actions[0], &state)?;
/// assert!(next.flag("On"));
/// assert!(domain.applicable_actions(&next).is_empty());
/// # Ok::<(), strips_rs::PlanError>(())
/// ```
#[derive(Clone, Default)]
pub struct Domain {
    schemas: Vec<Arc<dyn ActionSchema>>,
}

impl Domain {
    pub fn new() -> Self {
        Self {
            schemas: Vec::new(),
        }
    }

    /// Adds a schema, failing if one with the same name is already present.
    pub fn add(&mut self, schema: impl ActionSchema + 'static) -> Result<()> {
        if self.schema(schema.name()).is_some() {
            return Err(PlanError::DuplicateSchema(schema.name().to_string()));
        }
        self.schemas.push(Arc::new(schema));
        Ok(())
    }

    /// Builder form of [`Domain::add`].
    pub fn with_schema(mut self, schema: impl ActionSchema + 'static) -> Result<Self> {
        self.add(schema)?;
        Ok(self)
    }

    pub fn schema(&self, name: &str) -> Option<&dyn ActionSchema> {
        self.schemas
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn schemas(&self) -> impl Iterator<Item = &dyn ActionSchema> {
        self.schemas.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Every grounded action whose precondition holds in `state`.
    ///
    /// Ordered by schema insertion order, then by the order each schema yields
    /// its candidate bindings. Returns an empty vector when nothing applies.
    pub fn applicable_actions(&self, state: &State) -> Vec<Action> {
        self.applicable(state).map(|(_, action)| action).collect()
    }

    fn applicable<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = (&'a dyn ActionSchema, Action)> + 'a {
        self.schemas.iter().flat_map(move |schema| {
            schema
                .candidates(state)
                .into_iter()
                .filter(move |params| {
                    if params.len() != schema.arity() {
                        log::warn!(
                            "Skipping binding {:?} for {}: expected {} parameters",
                            params,
                            schema.name(),
                            schema.arity()
                        );
                        return false;
                    }
                    schema.precondition(state, params)
                })
                .map(move |params| {
                    let action = Action {
                        name: schema.name().to_string(),
                        params,
                    };
                    (&**schema, action)
                })
        })
    }

    /// Applies a grounded action to `state`, returning the successor.
    ///
    /// The effect only runs when the precondition holds.
    pub fn apply(&self, action: &Action, state: &State) -> Result<State> {
        let schema = self
            .schema(&action.name)
            .ok_or_else(|| PlanError::UnknownAction(action.name.clone()))?;
        if action.params.len() != schema.arity() {
            return Err(PlanError::ArityMismatch {
                action: action.name.clone(),
                expected: schema.arity(),
                found: action.params.len(),
            });
        }
        if !schema.precondition(state, &action.params) {
            return Err(PlanError::PreconditionNotMet(action.to_string()));
        }
        schema.effect(state, &action.params)
    }

    /// All `(action, successor)` pairs reachable from `state` in one step.
    ///
    /// Same order as [`Domain::applicable_actions`]. Each precondition is
    /// evaluated once; the effect runs directly on the enumerated binding.
    pub fn successors(&self, state: &State) -> Result<Vec<(Action, State)>> {
        self.applicable(state)
            .map(|(schema, action)| {
                let next = schema.effect(state, &action.params)?;
                Ok((action, next))
            })
            .collect()
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.schemas.iter().map(|s| s.name()))
            .finish()
    }
}
