//! # Library Robot Domain
//!
//! An example domain: a robot that shelves returned books and hands requested
//! books to users. It only uses the public planner API.
//!
//! Relations:
//!
//! | Name | Kind | Meaning |
//! |---|---|---|
//! | `At` | `(book, location)` | where a book lies |
//! | `Held` | `book` | the book in the gripper |
//! | `ShelfAvailable` | `shelf` | shelves that can still take a book |
//! | `Request` | `(book, user)` | outstanding requests |
//! | `Delivered` | `(book, user)` | completed requests |
//! | `RobotEmpty` | flag | the gripper is free |
//!
//! A shelf holds one book: placing a book consumes the shelf, and nothing
//! makes it available again.

use crate::action::bind;
use crate::{ActionSchema, Domain, Fact, Goal, Result, State};

pub const AT: &str = "At";
pub const HELD: &str = "Held";
pub const SHELF_AVAILABLE: &str = "ShelfAvailable";
pub const REQUEST: &str = "Request";
pub const DELIVERED: &str = "Delivered";
pub const ROBOT_EMPTY: &str = "RobotEmpty";

/// Location of returned books before they are shelved
pub const RETURNED_CART: &str = "returned_cart";

/// Builds the domain: `pick`, `place_on_shelf`, `fetch_for_user`, `deliver`,
/// enumerated in that order.
pub fn domain() -> Result<Domain> {
    Domain::new()
        .with_schema(Pick)?
        .with_schema(PlaceOnShelf)?
        .with_schema(FetchForUser::default())?
        .with_schema(Deliver)
}

/// Two books on the returns cart go to shelves `s1` and `s2`, and book `b3`,
/// already on `s1`, is requested by user `u1`.
pub fn sample_problem() -> (State, Goal) {
    let initial = State::new()
        .with_facts(
            AT,
            [("b1", RETURNED_CART), ("b2", RETURNED_CART), ("b3", "s1")],
        )
        .with_facts(HELD, Vec::<&str>::new())
        .with_facts(SHELF_AVAILABLE, ["s1", "s2"])
        .with_facts(REQUEST, [("b3", "u1")])
        .with_facts(DELIVERED, Vec::<(&str, &str)>::new())
        .with_flag(ROBOT_EMPTY, true);

    let goal = Goal::new()
        .require(AT, [("b1", "s1"), ("b2", "s2")])
        .require(DELIVERED, [("b3", "u1")]);

    (initial, goal)
}

fn pairs(state: &State, relation: &str) -> Vec<Vec<String>> {
    state
        .facts(relation)
        .iter()
        .filter(|fact| fact.arity() == 2)
        .map(|fact| fact.terms().to_vec())
        .collect()
}

/// `pick(book, location)`: take a book from wherever it lies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pick;

impl ActionSchema for Pick {
    fn name(&self) -> &str {
        "pick"
    }

    fn arity(&self) -> usize {
        2
    }

    fn candidates(&self, state: &State) -> Vec<Vec<String>> {
        pairs(state, AT)
    }

    fn precondition(&self, state: &State, params: &[String]) -> bool {
        let Ok([book, location]) = bind::<2>(self.name(), params) else {
            return false;
        };
        state.flag(ROBOT_EMPTY) && state.contains(AT, &Fact::from((book, location)))
    }

    fn effect(&self, state: &State, params: &[String]) -> Result<State> {
        let [book, location] = bind::<2>(self.name(), params)?;
        let mut next = state.clone();
        next.remove_fact(AT, &Fact::from((book, location)));
        next.insert_fact(HELD, book);
        next.set_flag(ROBOT_EMPTY, false);
        Ok(next)
    }
}

/// `place_on_shelf(book, shelf)`: put the held book on a free shelf.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceOnShelf;

impl ActionSchema for PlaceOnShelf {
    fn name(&self) -> &str {
        "place_on_shelf"
    }

    fn arity(&self) -> usize {
        2
    }

    fn candidates(&self, state: &State) -> Vec<Vec<String>> {
        let shelves = state.facts(SHELF_AVAILABLE);
        state
            .facts(HELD)
            .iter()
            .filter_map(|book| book.term(0))
            .flat_map(|book| {
                shelves
                    .iter()
                    .filter_map(|shelf| shelf.term(0))
                    .map(move |shelf| vec![book.to_string(), shelf.to_string()])
            })
            .collect()
    }

    fn precondition(&self, state: &State, params: &[String]) -> bool {
        let Ok([book, shelf]) = bind::<2>(self.name(), params) else {
            return false;
        };
        state.contains(HELD, &Fact::from(book)) && state.contains(SHELF_AVAILABLE, &Fact::from(shelf))
    }

    fn effect(&self, state: &State, params: &[String]) -> Result<State> {
        let [book, shelf] = bind::<2>(self.name(), params)?;
        let mut next = state.clone();
        next.remove_fact(HELD, &Fact::from(book));
        next.insert_fact(AT, (book, shelf));
        next.remove_fact(SHELF_AVAILABLE, &Fact::from(shelf));
        next.set_flag(ROBOT_EMPTY, true);
        Ok(next)
    }
}

/// `fetch_for_user(book, user)`: take a requested book from the pickup shelf.
///
/// Requires a free gripper, the book on the pickup shelf and an outstanding
/// request for it by `user`.
#[derive(Debug, Clone)]
pub struct FetchForUser {
    pickup_shelf: String,
}

impl FetchForUser {
    pub fn from_shelf(shelf: impl Into<String>) -> Self {
        Self {
            pickup_shelf: shelf.into(),
        }
    }
}

impl Default for FetchForUser {
    fn default() -> Self {
        Self::from_shelf("s1")
    }
}

impl ActionSchema for FetchForUser {
    fn name(&self) -> &str {
        "fetch_for_user"
    }

    fn arity(&self) -> usize {
        2
    }

    fn candidates(&self, state: &State) -> Vec<Vec<String>> {
        pairs(state, REQUEST)
    }

    fn precondition(&self, state: &State, params: &[String]) -> bool {
        let Ok([book, user]) = bind::<2>(self.name(), params) else {
            return false;
        };
        state.flag(ROBOT_EMPTY)
            && state.contains(AT, &Fact::from((book, self.pickup_shelf.as_str())))
            && state.contains(REQUEST, &Fact::from((book, user)))
    }

    fn effect(&self, state: &State, params: &[String]) -> Result<State> {
        let [book, _user] = bind::<2>(self.name(), params)?;
        let mut next = state.clone();
        next.remove_fact(AT, &Fact::from((book, self.pickup_shelf.as_str())));
        next.insert_fact(HELD, book);
        next.set_flag(ROBOT_EMPTY, false);
        Ok(next)
    }
}

/// `deliver(book, user)`: hand the held book to the user who requested it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deliver;

impl ActionSchema for Deliver {
    fn name(&self) -> &str {
        "deliver"
    }

    fn arity(&self) -> usize {
        2
    }

    fn candidates(&self, state: &State) -> Vec<Vec<String>> {
        let held = state.facts(HELD);
        pairs(state, REQUEST)
            .into_iter()
            .filter(|params| held.contains(&Fact::from(params[0].as_str())))
            .collect()
    }

    fn precondition(&self, state: &State, params: &[String]) -> bool {
        let Ok([book, user]) = bind::<2>(self.name(), params) else {
            return false;
        };
        state.contains(HELD, &Fact::from(book)) && state.contains(REQUEST, &Fact::from((book, user)))
    }

    fn effect(&self, state: &State, params: &[String]) -> Result<State> {
        let [book, user] = bind::<2>(self.name(), params)?;
        let mut next = state.clone();
        next.remove_fact(HELD, &Fact::from(book));
        next.insert_fact(DELIVERED, (book, user));
        next.remove_fact(REQUEST, &Fact::from((book, user)));
        next.set_flag(ROBOT_EMPTY, true);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, PlanError};

    fn params(values: [&str; 2]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_domain_order() {
        let names: Vec<_> = domain().unwrap().schemas().map(|s| s.name().to_string()).collect();
        assert_eq!(names, ["pick", "place_on_shelf", "fetch_for_user", "deliver"]);
    }

    #[test]
    fn test_initial_applicable_actions() {
        let (initial, _) = sample_problem();
        let actions = domain().unwrap().applicable_actions(&initial);
        assert_eq!(
            actions,
            vec![
                Action::new("pick", ["b1", RETURNED_CART]),
                Action::new("pick", ["b2", RETURNED_CART]),
                Action::new("pick", ["b3", "s1"]),
                Action::new("fetch_for_user", ["b3", "u1"]),
            ]
        );
    }

    #[test]
    fn test_pick_then_place() {
        let (initial, _) = sample_problem();
        let picked = Pick.effect(&initial, &params(["b1", RETURNED_CART])).unwrap();
        assert!(picked.contains(HELD, &Fact::from("b1")));
        assert!(!picked.flag(ROBOT_EMPTY));
        assert!(!Pick.precondition(&picked, &params(["b2", RETURNED_CART])));

        let placed = PlaceOnShelf.effect(&picked, &params(["b1", "s2"])).unwrap();
        assert!(placed.contains(AT, &Fact::from(("b1", "s2"))));
        assert!(!placed.contains(SHELF_AVAILABLE, &Fact::from("s2")));
        assert!(placed.facts(HELD).is_empty());
        assert!(placed.flag(ROBOT_EMPTY));
    }

    #[test]
    fn test_fetch_requires_empty_gripper() {
        let (initial, _) = sample_problem();
        let fetch = FetchForUser::default();
        let args = params(["b3", "u1"]);
        assert!(fetch.precondition(&initial, &args));

        let busy = initial.clone().with_flag(ROBOT_EMPTY, false);
        assert!(!fetch.precondition(&busy, &args));
    }

    #[test]
    fn test_fetch_requires_book_on_pickup_shelf() {
        let (initial, _) = sample_problem();
        let args = params(["b3", "u1"]);
        assert!(!FetchForUser::from_shelf("s2").precondition(&initial, &args));
    }

    #[test]
    fn test_fetch_and_deliver() {
        let (initial, goal) = sample_problem();
        let domain = domain().unwrap();
        let fetched = domain
            .apply(&Action::new("fetch_for_user", ["b3", "u1"]), &initial)
            .unwrap();
        assert_eq!(
            domain.applicable_actions(&fetched),
            vec![
                Action::new("place_on_shelf", ["b3", "s1"]),
                Action::new("place_on_shelf", ["b3", "s2"]),
                Action::new("deliver", ["b3", "u1"]),
            ]
        );
        let delivered = domain
            .apply(&Action::new("deliver", ["b3", "u1"]), &fetched)
            .unwrap();
        assert!(delivered.contains(DELIVERED, &Fact::from(("b3", "u1"))));
        assert!(delivered.facts(REQUEST).is_empty());
        assert!(!delivered.satisfies(&goal));
    }

    #[test]
    fn test_deliver_without_request_fails() {
        let state = State::new().with_facts(HELD, ["b1"]);
        let err = domain()
            .unwrap()
            .apply(&Action::new("deliver", ["b1", "u1"]), &state)
            .unwrap_err();
        assert!(matches!(err, PlanError::PreconditionNotMet(_)));
    }

    #[test]
    fn test_malformed_params() {
        let state = State::new().with_flag(ROBOT_EMPTY, true);
        assert!(!Pick.precondition(&state, &["b1".to_string()]));
        assert!(matches!(
            Pick.effect(&state, &["b1".to_string()]),
            Err(PlanError::ArityMismatch { .. })
        ));
    }
}
