use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Action, Domain, Goal, Result, State};

/// Renders a plan as a Graphviz DOT digraph.
///
/// The plan is replayed through the domain, so every intermediate state is
/// drawn as a node and every action as a labelled edge. Replaying an
/// inapplicable plan fails with the same error [`Domain::apply`] reports.
#[derive(Debug, Default)]
pub struct PlanVisualizer;

impl PlanVisualizer {
    pub fn new() -> Self {
        Self
    }

    /// Writes the DOT graph of `plan` to `filename`.
    pub fn visualize_plan(
        &self,
        domain: &Domain,
        initial_state: &State,
        goal: &Goal,
        plan: &[Action],
        filename: impl AsRef<Path>,
    ) -> Result<()> {
        let mut file = BufWriter::new(File::create(filename)?);
        self.write_dot(domain, initial_state, goal, plan, &mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn write_dot<W: Write>(
        &self,
        domain: &Domain,
        initial_state: &State,
        goal: &Goal,
        plan: &[Action],
        out: &mut W,
    ) -> Result<()> {
        // Replay first so a broken plan writes nothing
        let mut states = vec![initial_state.clone()];
        for action in plan {
            let next = domain.apply(action, &states[states.len() - 1])?;
            states.push(next);
        }

        writeln!(out, "digraph PLAN {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=box, style=filled, fillcolor=lightblue];")?;
        writeln!(out, "    edge [fontsize=10];")?;

        writeln!(
            out,
            "    goal [label=\"Goal\\n{}\", fillcolor=lightpink];",
            Self::escape(&goal.to_string())
        )?;

        for (i, state) in states.iter().enumerate() {
            let fill = if i == 0 {
                ", fillcolor=lightgreen"
            } else if state.satisfies(goal) {
                ", fillcolor=lightcoral"
            } else {
                ""
            };
            writeln!(
                out,
                "    state_{} [label=\"{}\\n{}\"{}];",
                i,
                if i == 0 { "Initial" } else { "Step" },
                Self::state_to_label(state),
                fill
            )?;
        }

        for (i, action) in plan.iter().enumerate() {
            writeln!(
                out,
                "    state_{} -> state_{} [label=\"{}\"];",
                i,
                i + 1,
                Self::escape(&action.to_string())
            )?;
        }

        if states.last().map_or(false, |s| s.satisfies(goal)) {
            writeln!(
                out,
                "    state_{} -> goal [style=dashed, label=\"satisfies\"];",
                states.len() - 1
            )?;
        }

        writeln!(out, "}}")?;
        Ok(())
    }

    fn state_to_label(state: &State) -> String {
        state
            .relations()
            .map(|(name, relation)| Self::escape(&format!("{}: {}", name, relation)))
            .collect::<Vec<_>>()
            .join("\\n")
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{library, PlanError};

    #[test]
    fn test_write_dot() {
        let domain = library::domain().unwrap();
        let (initial, _) = library::sample_problem();
        let goal = Goal::new().require(library::HELD, ["b1"]);
        let plan = vec![Action::new("pick", ["b1", library::RETURNED_CART])];

        let mut out = Vec::new();
        PlanVisualizer::new()
            .write_dot(&domain, &initial, &goal, &plan, &mut out)
            .unwrap();
        let content = String::from_utf8(out).unwrap();

        assert!(content.starts_with("digraph PLAN {"));
        assert!(content.contains("state_0 -> state_1 [label=\"pick(b1, returned_cart)\"];"));
        assert!(content.contains("Held: {b1}"));
        assert!(content.contains("state_1 -> goal"));
        assert!(content.trim_end().ends_with('}'));
    }

    #[test]
    fn test_unsatisfied_plan_has_no_goal_edge() {
        let domain = library::domain().unwrap();
        let (initial, goal) = library::sample_problem();
        let mut out = Vec::new();
        PlanVisualizer::new()
            .write_dot(&domain, &initial, &goal, &[], &mut out)
            .unwrap();
        let content = String::from_utf8(out).unwrap();
        assert!(content.contains("state_0"));
        assert!(!content.contains("-> goal"));
    }

    #[test]
    fn test_inapplicable_plan_writes_nothing() {
        let domain = library::domain().unwrap();
        let (initial, goal) = library::sample_problem();
        let plan = vec![Action::new("deliver", ["b1", "u1"])];
        let mut out = Vec::new();
        let err = PlanVisualizer::new()
            .write_dot(&domain, &initial, &goal, &plan, &mut out)
            .unwrap_err();
        assert!(matches!(err, PlanError::PreconditionNotMet(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_visualize_plan_to_file() {
        let domain = library::domain().unwrap();
        let (initial, goal) = library::sample_problem();
        let path = std::env::temp_dir().join("strips_rs_test_plan.dot");

        PlanVisualizer::new()
            .visualize_plan(&domain, &initial, &goal, &[], &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("digraph PLAN"));
        std::fs::remove_file(&path).unwrap();
    }
}
