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


use binalloc_greedy::assigner::Scoring;
use binalloc_model::objective::{Objective, ObjectiveFunction};
use binalloc_split::allocator::{Allocator, AllocatorBuilder, BranchExecution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CASES: usize = 64;

struct Case {
    targets: Vec<f64>,
    batches: Vec<Vec<f64>>,
    objective: Objective,
    scoring: Scoring,
}

fn random_case(rng: &mut ChaCha8Rng) -> Case {
    let num_bins = rng.random_range(1..=6);
    let targets = (0..num_bins)
        .map(|_| rng.random_range(1.0..100.0))
        .collect();
    let num_batches = rng.random_range(1..=3);
    let batches = (0..num_batches)
        .map(|_| {
            let len = rng.random_range(1..=40);
            (0..len)
                .map(|_| {
                    // Integral values keep the totals exact.
                    f64::from(rng.random_range(-5i32..=40))
                })
                .collect()
        })
        .collect();
    let objective = Objective::ALL[rng.random_range(0..Objective::ALL.len())];
    let scoring = if rng.random_bool(0.5) {
        Scoring::Marginal
    } else {
        Scoring::Absolute
    };

    Case {
        targets,
        batches,
        objective,
        scoring,
    }
}

fn build(case: &Case, execution: BranchExecution) -> Allocator<f64> {
    AllocatorBuilder::new(case.targets.clone())
        .with_objective(case.objective)
        .with_scoring(case.scoring)
        .with_execution(execution)
        .build()
        .unwrap()
}

fn run(case: &Case, execution: BranchExecution) -> Allocator<f64> {
    let mut allocator = build(case, execution);
    for batch in &case.batches {
        allocator.assign_values(batch).unwrap();
    }
    allocator
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

#[test]
fn test_conservation() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..CASES {
        let case = random_case(&mut rng);
        let allocator = run(&case, BranchExecution::Sequential);

        let placed = sorted(allocator.bins().flatten().copied().collect());
        let input = sorted(case.batches.iter().flatten().copied().collect());
        assert_eq!(placed, input);

        for (values, &total) in allocator.bins().zip(allocator.bin_totals()) {
            assert_eq!(values.iter().sum::<f64>(), total);
        }
    }
}

#[test]
fn test_bin_count_is_stable() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..CASES {
        let case = random_case(&mut rng);
        let mut allocator = build(&case, BranchExecution::Sequential);
        for batch in &case.batches {
            allocator.assign_values(batch).unwrap();
            assert_eq!(allocator.num_bins(), case.targets.len());
            assert_eq!(allocator.bin_values(), case.targets.as_slice());
            assert_eq!(allocator.bin_totals().len(), case.targets.len());
            assert_eq!(allocator.bins().len(), case.targets.len());
        }
    }
}

#[test]
fn test_determinism() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    for _ in 0..CASES {
        let case = random_case(&mut rng);
        let first = run(&case, BranchExecution::Sequential);
        let second = run(&case, BranchExecution::Sequential);
        let parallel = run(&case, BranchExecution::Parallel { min_batch: 2 });

        assert_eq!(first.state(), second.state());
        assert_eq!(first.state(), parallel.state());
        assert_eq!(first.objective().unwrap(), second.objective().unwrap());
    }
}

#[test]
fn test_objective_is_finite_and_non_negative() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for _ in 0..CASES {
        let case = random_case(&mut rng);
        let allocator = run(&case, BranchExecution::Sequential);
        let objective = allocator.objective().unwrap();

        assert!(objective.is_finite());
        assert!(objective >= 0.0);

        let recomputed: f64 = allocator
            .state()
            .iter()
            .map(|bin| case.objective.evaluate(bin.total(), bin.target()))
            .sum();
        assert!((objective - recomputed).abs() < 1e-9);
    }
}

#[test]
fn test_statistics_are_consistent() {
    let mut rng = ChaCha8Rng::seed_from_u64(19);
    for _ in 0..CASES {
        let case = random_case(&mut rng);
        let mut allocator = build(&case, BranchExecution::Sequential);
        for batch in &case.batches {
            let outcome = allocator.assign_values(batch).unwrap();
            let stats = outcome.statistics();
            let n = batch.len() as u64;

            assert_eq!(stats.values_assigned, n);
            assert_eq!(stats.leaves, n);
            assert_eq!(stats.merges, n - 1);
            assert_eq!(stats.left_wins + stats.right_wins, stats.merges);
            assert!(stats.reassigned_values >= stats.merges);
        }
    }
}
