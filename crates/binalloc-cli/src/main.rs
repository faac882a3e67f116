// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! Command line front end.
//!
//! Distributes a list of values over bins with the given targets and prints
//! the resulting assignment. Logging is controlled through `RUST_LOG`.

use binalloc_greedy::assigner::{GreedyAssigner, Scoring};
use binalloc_model::{
    bins::BinState,
    objective::{Aggregation, Objective},
};
use binalloc_split::{
    allocator::{AllocatorBuilder, BranchExecution},
    exhaustive::ExhaustiveSearch,
    monitor::log::LogMonitor,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScoringArg {
    Marginal,
    Absolute,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Marginal => Scoring::Marginal,
            ScoringArg::Absolute => Scoring::Absolute,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "binalloc", version, about = "Assign values to target-carrying bins")]
struct Args {
    /// Comma separated bin targets.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = vec![3.0, 4.0]
    )]
    targets: Vec<f64>,
    /// Comma separated values to assign.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = vec![1.0, 2.0, 3.0]
    )]
    values: Vec<f64>,
    /// absolute-error, squared-error or absolute-percentage-error.
    #[arg(short, long, default_value = "absolute-percentage-error")]
    objective: Objective,
    #[arg(short, long, value_enum, default_value_t = ScoringArg::Marginal)]
    scoring: ScoringArg,
    /// Evaluate sibling branches on the rayon pool (needs the `parallel` feature).
    #[arg(long)]
    parallel: bool,
    /// Also report the single-pass greedy result.
    #[arg(long)]
    compare_greedy: bool,
    /// Also report the brute-force optimum (small inputs only).
    #[arg(long)]
    exhaustive: bool,
    /// Print the allocation table and search statistics.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let start = std::time::Instant::now();
    let args = Args::parse();
    let scoring = Scoring::from(args.scoring);
    let execution = if args.parallel {
        BranchExecution::parallel()
    } else {
        BranchExecution::Sequential
    };

    let mut allocator = AllocatorBuilder::new(args.targets.clone())
        .with_objective(args.objective)
        .with_scoring(scoring)
        .with_execution(execution)
        .build()?;
    log::info!("{}", allocator);
    println!("Received values and bin values information...");

    let mut monitor = LogMonitor::new(log::Level::Info);
    let outcome = allocator.assign_values_with_monitor(&args.values, &mut monitor)?;

    println!("Values assigned...");
    println!("Objective function value: {:.2}", allocator.mean_objective()?);
    println!("Bin values: {:?}", allocator.bin_values());
    println!("Bins: {:?}", allocator.state().to_vecs());

    if args.compare_greedy {
        let mut state = BinState::new(args.targets.clone())?;
        GreedyAssigner::new(scoring).assign(&args.values, &mut state, &args.objective)?;
        let greedy = state.aggregate(&args.objective, Aggregation::Mean)?;
        println!("Greedy objective function value: {:.2}", greedy);
        println!("Greedy bins: {:?}", state.to_vecs());
    }

    if args.exhaustive {
        let optimum = ExhaustiveSearch::new().solve(&args.targets, &args.values, &args.objective)?;
        let mean = optimum.objective_value() / optimum.num_bins() as f64;
        println!("Optimal objective function value: {:.2}", mean);
        println!("Optimal bins: {:?}", optimum.bins());
    }

    if args.summary {
        println!();
        println!("{}", allocator.allocation()?);
        println!("{}", outcome.statistics());
    }

    println!(
        "Program finished running in {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["binalloc"]).unwrap();
        assert_eq!(args.targets, vec![3.0, 4.0]);
        assert_eq!(args.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(args.objective, Objective::AbsolutePercentageError);
        assert_eq!(args.scoring, ScoringArg::Marginal);
        assert!(!args.parallel);
    }

    #[test]
    fn test_lists_and_names() {
        let args = Args::try_parse_from([
            "binalloc",
            "--targets",
            "5,10,50",
            "--values=-1,2.5,3",
            "--objective",
            "squared-error",
            "--scoring",
            "absolute",
            "--compare-greedy",
        ])
        .unwrap();
        assert_eq!(args.targets, vec![5.0, 10.0, 50.0]);
        assert_eq!(args.values, vec![-1.0, 2.5, 3.0]);
        assert_eq!(args.objective, Objective::SquaredError);
        assert_eq!(Scoring::from(args.scoring), Scoring::Absolute);
        assert!(args.compare_greedy);
    }

    #[test]
    fn test_unknown_objective_is_rejected() {
        assert!(Args::try_parse_from(["binalloc", "--objective", "hinge"]).is_err());
    }
}
