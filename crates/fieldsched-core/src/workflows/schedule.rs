use crate::core::models::ids::{ItemId, SlotId};
use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;
use crate::core::models::slot::Slot;
use crate::engine::config::SearchConfig;
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::frontier::{Frontier, Node};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{SharedSolutionPool, Solution};
use crate::engine::tasks::{branching, hard_constraints, selection, soft_constraints};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Termination {
    /// The frontier ran empty; the retained solutions are provably the best.
    #[default]
    Exhausted,
    NodeLimit,
    TimeLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Termination::Exhausted => "search space exhausted",
                Termination::NodeLimit => "node limit",
                Termination::TimeLimit => "time limit",
            }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    pub dead_ends: u64,
    pub pruned: u64,
    pub complete_schedules: u64,
    pub rounds: u64,
    pub elapsed: Duration,
    pub termination: Termination,
}

#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// Retained solutions, best first.
    pub solutions: Vec<Solution>,
    pub stats: SearchStats,
}

impl ScheduleResult {
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

/// The children produced by expanding one node.
struct Expansion {
    open: Vec<Node>,
    completed: u64,
    dead_end: bool,
}

#[instrument(skip_all, name = "schedule_workflow")]
pub fn run(
    problem: &Problem,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<ScheduleResult, EngineError> {
    let context = SearchContext::new(problem, config, reporter);

    // === Phase 1: Apply partial assignments ===
    let root = prepare_root(&context)?;

    // === Phase 2: Explore the assignment space ===
    let (pool, stats) = search(&context, root)?;

    // === Phase 3: Rank and return ===
    finalize_results(pool, stats)
}

/// Builds the root search state with every partial assignment applied.
///
/// # Errors
///
/// Returns [`EngineError::PartialAssignment`] when a fixed item cannot legally
/// occupy its fixed slot given the fixed items placed before it.
pub fn build_root_state(problem: &Problem) -> Result<ScheduleState, EngineError> {
    apply_partial_assignments(problem, &ProgressReporter::new())
}

fn prepare_root(context: &SearchContext) -> Result<ScheduleState, EngineError> {
    context.reporter.report(Progress::PhaseStart {
        name: "Applying Partial Assignments",
    });
    let root = apply_partial_assignments(context.problem, context.reporter)?;
    info!(
        fixed = root.num_placed(),
        remaining = root.remaining().len(),
        "Root state prepared."
    );
    context.reporter.report(Progress::PhaseFinish);
    Ok(root)
}

fn apply_partial_assignments(
    problem: &Problem,
    reporter: &ProgressReporter,
) -> Result<ScheduleState, EngineError> {
    let fixed: Vec<(ItemId, SlotId)> = problem
        .items_iter()
        .filter_map(|(id, item)| item.spec().fixed_slot().map(|slot| (id, slot)))
        .collect();

    reporter.report(Progress::TaskStart {
        total_steps: fixed.len() as u64,
    });
    let mut state = ScheduleState::empty(problem);
    for (item, slot) in fixed {
        if let Err(violation) = hard_constraints::check(problem, &state, item, slot) {
            let slot_key = problem.slot(slot).map(Slot::key).ok_or_else(|| {
                EngineError::Internal(format!(
                    "fixed slot of '{}' is not part of the problem",
                    problem.identifier(item)
                ))
            })?;
            warn!(item = problem.identifier(item), slot = %slot_key, "Partial assignment rejected.");
            return Err(EngineError::PartialAssignment {
                item: problem.identifier(item).to_string(),
                slot: slot_key,
                reason: violation.describe(problem),
            });
        }
        state.place(item, slot);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    Ok(state)
}

fn search(
    context: &SearchContext,
    root: ScheduleState,
) -> Result<(SharedSolutionPool, SearchStats), EngineError> {
    let config = context.config;
    let prunes = config.strategy.prunes();
    let pool = SharedSolutionPool::new(config.num_solutions);
    let mut frontier = Frontier::new(config.strategy);
    let mut stats = SearchStats::default();
    let started = Instant::now();

    context.reporter.report(Progress::PhaseStart { name: "Searching" });
    info!(
        strategy = %config.strategy,
        num_solutions = config.num_solutions,
        batch_size = config.batch_size,
        "Starting search."
    );

    if root.is_complete() {
        stats.complete_schedules += 1;
        let cost = soft_constraints::evaluate(context.problem, &root, context.weights())?;
        pool.offer(Solution::new(cost, root));
    } else {
        let bound = soft_constraints::lower_bound(context.problem, &root, context.weights());
        frontier.push(Node {
            state: root,
            bound,
            depth: 0,
        });
    }

    loop {
        if frontier.is_empty() {
            stats.termination = Termination::Exhausted;
            break;
        }
        if config
            .limits
            .time_limit
            .is_some_and(|limit| started.elapsed() >= limit)
        {
            stats.termination = Termination::TimeLimit;
            break;
        }
        let batch_limit = match config.limits.max_nodes {
            Some(max) if stats.nodes_expanded >= max => {
                stats.termination = Termination::NodeLimit;
                break;
            }
            Some(max) => (max - stats.nodes_expanded).min(config.batch_size as u64) as usize,
            None => config.batch_size,
        };

        let threshold = pool.bound();
        let batch: Vec<Node> = frontier
            .pop_batch(batch_limit)
            .into_iter()
            .filter(|node| {
                let keep = !prunes || node.bound <= threshold;
                if !keep {
                    stats.pruned += 1;
                }
                keep
            })
            .collect();
        if batch.is_empty() {
            continue;
        }
        stats.rounds += 1;
        stats.nodes_expanded += batch.len() as u64;

        #[cfg(not(feature = "parallel"))]
        let iterator = batch.iter();

        #[cfg(feature = "parallel")]
        let iterator = batch.par_iter();

        let expansions: Vec<Expansion> = iterator
            .map(|node| expand(context, &pool, node))
            .collect::<Result<_, _>>()?;

        // Children are judged against the bound as it stands after the whole
        // round, so the outcome does not depend on worker interleaving.
        let threshold = pool.bound();
        for expansion in expansions {
            stats.complete_schedules += expansion.completed;
            if expansion.dead_end {
                stats.dead_ends += 1;
            }
            let (kept, pruned): (Vec<Node>, Vec<Node>) = expansion
                .open
                .into_iter()
                .partition(|child| !prunes || child.bound <= threshold);
            stats.pruned += pruned.len() as u64;
            frontier.extend(kept);
        }

        debug!(
            round = stats.rounds,
            expanded = stats.nodes_expanded,
            open = frontier.len(),
            bound = threshold,
            "Round complete."
        );
        context.reporter.status(|| {
            let best = pool
                .best_cost()
                .map_or_else(|| "none".to_string(), |cost| cost.to_string());
            format!(
                "Expanded {} nodes, {} open, best cost {}",
                stats.nodes_expanded,
                frontier.len(),
                best
            )
        });
    }

    stats.elapsed = started.elapsed();
    info!(
        expanded = stats.nodes_expanded,
        dead_ends = stats.dead_ends,
        pruned = stats.pruned,
        complete = stats.complete_schedules,
        termination = %stats.termination,
        "Search finished."
    );
    context.reporter.report(Progress::PhaseFinish);
    Ok((pool, stats))
}

fn expand(
    context: &SearchContext,
    pool: &SharedSolutionPool,
    node: &Node,
) -> Result<Expansion, EngineError> {
    let problem = context.problem;
    let weights = context.weights();

    let item = selection::select_item(problem, &node.state).ok_or_else(|| {
        EngineError::Internal("attempted to expand a complete schedule".to_string())
    })?;
    let children = branching::branch(problem, &node.state, item);
    if children.is_empty() {
        trace!(
            item = problem.identifier(item),
            depth = node.depth,
            "Dead end."
        );
        return Ok(Expansion {
            open: Vec::new(),
            completed: 0,
            dead_end: true,
        });
    }

    let mut open = Vec::with_capacity(children.len());
    let mut completed = 0;
    for child in children {
        if child.is_complete() {
            completed += 1;
            let cost = soft_constraints::evaluate(problem, &child, weights)?;
            pool.offer(Solution::new(cost, child));
        } else {
            let bound = if context.config.strategy.prunes() {
                soft_constraints::lower_bound(problem, &child, weights)
            } else {
                0
            };
            open.push(Node {
                state: child,
                bound,
                depth: node.depth + 1,
            });
        }
    }

    Ok(Expansion {
        open,
        completed,
        dead_end: false,
    })
}

fn finalize_results(
    pool: SharedSolutionPool,
    stats: SearchStats,
) -> Result<ScheduleResult, EngineError> {
    let solutions = pool.into_inner().into_sorted_vec();

    if solutions.is_empty() {
        return Err(match stats.termination {
            Termination::Exhausted => EngineError::Infeasible {
                nodes_explored: stats.nodes_expanded,
            },
            Termination::NodeLimit => EngineError::BudgetExhausted {
                limit: "node limit",
                nodes_explored: stats.nodes_expanded,
            },
            Termination::TimeLimit => EngineError::BudgetExhausted {
                limit: "time limit",
                nodes_explored: stats.nodes_expanded,
            },
        });
    }

    info!(
        solutions = solutions.len(),
        best = solutions[0].total(),
        "Workflow complete."
    );
    Ok(ScheduleResult { solutions, stats })
}
