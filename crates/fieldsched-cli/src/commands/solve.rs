use crate::cli::SolveArgs;
use crate::config::PartialSolveConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use fieldsched::{
    core::io::{text::TextFormat, traits::ProblemFile},
    core::models::problem::Problem,
    engine::{progress::ProgressReporter, state::Solution},
    workflows::schedule::{self, ScheduleResult},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: SolveArgs, quiet: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialSolveConfig::from_file(path)?,
        None => PartialSolveConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let problem = load_problem(&args.input)?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the scheduling workflow...");
    let result = schedule::run(&problem, &config, &reporter)?;
    drop(reporter);

    info!(
        "Workflow finished, received {} solution(s) after expanding {} nodes ({}).",
        result.solutions.len(),
        result.stats.nodes_expanded,
        result.stats.termination
    );
    print_summary(&result);

    match &args.output {
        Some(base) => write_to_files(&problem, &result.solutions, base)?,
        None => write_to_stdout(&problem, &result.solutions)?,
    }

    if args.breakdown {
        for (i, solution) in result.solutions.iter().enumerate() {
            eprintln!("{}", format_breakdown(i + 1, solution));
        }
    }

    Ok(())
}

pub(crate) fn load_problem(path: &Path) -> Result<Problem> {
    info!("Loading problem from {:?}", path);
    TextFormat::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn print_summary(result: &ScheduleResult) {
    let stats = &result.stats;
    eprintln!(
        "Search stopped: {} ({} nodes expanded, {} pruned, {} dead ends, {:.2?}).",
        stats.termination, stats.nodes_expanded, stats.pruned, stats.dead_ends, stats.elapsed
    );
}

fn write_to_stdout(problem: &Problem, solutions: &[Solution]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (i, solution) in solutions.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        TextFormat::write_solution_to(problem, &solution.schedule, solution.total(), &mut out)
            .map_err(|e| CliError::Other(e.into()))?;
    }
    out.flush()?;
    Ok(())
}

fn write_to_files(problem: &Problem, solutions: &[Solution], base: &Path) -> Result<()> {
    for (i, solution) in solutions.iter().enumerate() {
        let output_path = numbered_output_path(base, i + 1);
        info!(
            "Writing solution {} (Eval-value: {}) to {:?}",
            i + 1,
            solution.total(),
            &output_path
        );
        TextFormat::write_solution_to_path(
            problem,
            &solution.schedule,
            solution.total(),
            &output_path,
        )
        .map_err(|e| CliError::FileParsing {
            path: output_path.clone(),
            source: e.into(),
        })?;

        if i == 0 {
            eprintln!(
                "✓ Best solution (Eval-value: {}) written to: {}",
                solution.total(),
                output_path.display()
            );
        } else {
            eprintln!(
                "  Solution {} (Eval-value: {}) written to: {}",
                i + 1,
                solution.total(),
                output_path.display()
            );
        }
    }
    Ok(())
}

/// The first solution goes to `base` itself; the n-th to `stem_n.ext`.
fn numbered_output_path(base: &Path, rank: usize) -> PathBuf {
    if rank == 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, rank, ext.to_string_lossy()),
        None => format!("{}_{}", stem, rank),
    };
    base.with_file_name(file_name)
}

fn format_breakdown(rank: usize, solution: &Solution) -> String {
    let raw = &solution.cost.raw;
    let weighted = &solution.cost.weighted;
    let rows = [
        ("min-filled", raw.min_filled, weighted.min_filled),
        ("preference", raw.preference, weighted.preference),
        ("pair", raw.pair, weighted.pair),
        ("section", raw.section, weighted.section),
    ];
    let mut out = format!("Solution {} breakdown:\n", rank);
    out.push_str(&format!("  {:<12} {:>10} {:>10}\n", "term", "raw", "weighted"));
    for (name, raw, weighted) in rows {
        out.push_str(&format!("  {:<12} {:>10} {:>10}\n", name, raw, weighted));
    }
    out.push_str(&format!("  {:<12} {:>10} {:>10}", "total", "", solution.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    const LEAGUE: &str = "\
Name:
Tiny

Game slots:
MO, 8:00, 2, 1
TU, 9:30, 1, 0

Practice slots:
MO, 8:00, 1, 0
TU, 9:30, 1, 0

Games:
CMSA U12T1 DIV 01
CUSA O18 DIV 01

Practices:
CUSA O18 DIV 01 PRC 01

Not compatible:

Unwanted:
CUSA O18 DIV 01, TU, 9:30

Preferences:
TU, 9:30, CMSA U12T1 DIV 01, 4

Pair:

Partial assignments:
";

    fn solve_args(dir: &Path, extra: &[&str]) -> SolveArgs {
        let input = dir.join("league.txt");
        fs::write(&input, LEAGUE).unwrap();
        let input = input.to_string_lossy().into_owned();
        let mut argv = vec!["fieldsched", "solve", input.as_str()];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Solve(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn numbered_paths_keep_the_extension() {
        let base = Path::new("/tmp/out/schedule.txt");
        assert_eq!(numbered_output_path(base, 1), base);
        assert_eq!(
            numbered_output_path(base, 3),
            PathBuf::from("/tmp/out/schedule_3.txt")
        );
        assert_eq!(
            numbered_output_path(Path::new("plan"), 2),
            PathBuf::from("plan_2")
        );
    }

    #[test]
    fn solve_writes_ranked_solution_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("schedule.txt");
        let output_arg = output.to_string_lossy().into_owned();
        let args = solve_args(
            dir.path(),
            &["1", "1", "1", "1", "1", "1", "1", "1", "-n", "2", "-o", output_arg.as_str()],
        );

        run(args, true).unwrap();

        let best = fs::read_to_string(&output).unwrap();
        assert!(best.starts_with("Eval-value: "), "{best}");
        assert!(best.contains("CUSA O18 DIV 01 "), "{best}");
        assert!(dir.path().join("schedule_2.txt").exists());
    }

    #[test]
    fn solve_without_weights_fails_before_search() {
        let dir = tempfile::tempdir().unwrap();
        let args = solve_args(dir.path(), &[]);
        assert!(matches!(run(args, true), Err(CliError::Config(_))));
    }

    #[test]
    fn missing_input_is_reported_with_its_path() {
        let args = match Cli::try_parse_from([
            "fieldsched", "solve", "/nonexistent/league.txt", "1", "1", "1", "1", "1", "1", "1", "1",
        ])
        .unwrap()
        .command
        {
            Commands::Solve(args) => args,
            other => panic!("unexpected command: {other:?}"),
        };
        let err = run(args, true).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
        assert!(err.to_string().contains("/nonexistent/league.txt"));
    }

    #[test]
    fn breakdown_lists_every_term() {
        let dir = tempfile::tempdir().unwrap();
        let args = solve_args(dir.path(), &["2", "1", "1", "1", "3", "1", "1", "1"]);
        let partial = PartialSolveConfig::default();
        let config = partial.merge_with_cli(&args).unwrap();
        let problem = load_problem(&args.input).unwrap();
        let result = schedule::run(&problem, &config, &ProgressReporter::new()).unwrap();

        let text = format_breakdown(1, result.best().unwrap());
        for term in ["min-filled", "preference", "pair", "section", "total"] {
            assert!(text.contains(term), "{text}");
        }
    }
}
