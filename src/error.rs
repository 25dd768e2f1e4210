use thiserror::Error;

/// Errors raised by the planner.
///
/// An unreachable goal is not an error for the search engines themselves: they
/// report it as a [`SearchOutcome`](crate::SearchOutcome) without a plan. Only
/// the convenience paths that promise a plan turn it into [`PlanError::NoPlanFound`].
///
/// # Examples
///
/// ```
/// use strips_rs::PlanError;
///
/// let err = PlanError::UnknownAction("fly".to_string());
/// assert_eq!(format!("{}", err), "Unknown action: fly");
/// ```
#[derive(Error, Debug)]
pub enum PlanError {
    /// The frontier was exhausted without reaching a goal-satisfying state
    #[error("No valid plan found to achieve the goal ({states_expanded} states expanded)")]
    NoPlanFound { states_expanded: usize },

    /// An action was applied to a state in which its precondition does not hold
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),

    /// A grounded action names a schema the domain does not know
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A grounded action carries the wrong number of parameters for its schema
    #[error("Action {action} expects {expected} parameters, got {found}")]
    ArityMismatch {
        action: String,
        expected: usize,
        found: usize,
    },

    /// Two schemas with the same name were added to one domain
    #[error("Action schema already in domain: {0}")]
    DuplicateSchema(String),

    /// The search expanded as many states as it was allowed to
    #[error("Expansion limit of {limit} states reached")]
    ExpansionLimitReached { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlanError>;
