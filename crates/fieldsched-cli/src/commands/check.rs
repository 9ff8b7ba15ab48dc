use crate::cli::CheckArgs;
use crate::commands::solve::load_problem;
use crate::error::Result;
use fieldsched::core::models::problem::Problem;
use fieldsched::core::models::slot::Kind;
use fieldsched::workflows::schedule;
use tracing::info;

/// Counts gathered for the `check` report.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProblemSummary {
    name: Option<String>,
    game_slots: usize,
    practice_slots: usize,
    game_capacity: usize,
    practice_capacity: usize,
    games: usize,
    practices: usize,
    fixed: usize,
}

impl ProblemSummary {
    fn of(problem: &Problem, fixed: usize) -> Self {
        let capacity = |kind| -> usize {
            problem
                .slots_of_kind(kind)
                .iter()
                .filter_map(|&id| problem.slot(id))
                .map(|slot| slot.max())
                .sum()
        };
        Self {
            name: problem.name().map(str::to_string),
            game_slots: problem.slots_of_kind(Kind::Game).len(),
            practice_slots: problem.slots_of_kind(Kind::Practice).len(),
            game_capacity: capacity(Kind::Game),
            practice_capacity: capacity(Kind::Practice),
            games: problem.num_items_of_kind(Kind::Game),
            practices: problem.num_items_of_kind(Kind::Practice),
            fixed,
        }
    }

    fn render(&self) -> String {
        let mut lines = vec![format!(
            "Problem: {}",
            self.name.as_deref().unwrap_or("(unnamed)")
        )];
        lines.push(format!(
            "  Games:     {:>4} items, {:>4} slots, capacity {}",
            self.games, self.game_slots, self.game_capacity
        ));
        lines.push(format!(
            "  Practices: {:>4} items, {:>4} slots, capacity {}",
            self.practices, self.practice_slots, self.practice_capacity
        ));
        lines.push(format!("  Partial assignments applied: {}", self.fixed));
        if self.games > self.game_capacity || self.practices > self.practice_capacity {
            lines.push("  Warning: more items than slot capacity; no schedule can exist.".into());
        }
        lines.join("\n")
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    let problem = load_problem(&args.input)?;
    let root = schedule::build_root_state(&problem)?;
    info!(
        fixed = root.num_placed(),
        remaining = root.remaining().len(),
        "Partial assignments are consistent."
    );
    println!("{}", ProblemSummary::of(&problem, root.num_placed()).render());
    Ok(())
}
