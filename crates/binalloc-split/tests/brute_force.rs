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


use binalloc_model::objective::{AbsoluteError, AbsolutePercentageError, SquaredError};
use binalloc_split::allocator::Allocator;
use binalloc_split::exhaustive::ExhaustiveSearch;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_recovers_optimum_on_two_bins() {
    let targets: Vec<f64> = vec![3.0, 4.0];
    let values = [1.0, 2.0, 3.0];

    let optimum = ExhaustiveSearch::new()
        .solve(&targets, &values, &AbsolutePercentageError)
        .unwrap();
    let mut allocator = Allocator::new(targets, AbsolutePercentageError).unwrap();
    allocator.assign_values(&values).unwrap();

    assert!((allocator.objective().unwrap() - optimum.objective_value()).abs() < 1e-12);
}

#[test]
fn test_never_beats_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let search = ExhaustiveSearch::new();

    let mut gaps = Vec::new();
    for case in 0..48 {
        let num_bins = rng.random_range(1..=4);
        let num_values = rng.random_range(1..=8);
        let targets: Vec<f64> = (0..num_bins)
            .map(|_| f64::from(rng.random_range(1i32..=30)))
            .collect();
        let values: Vec<f64> = (0..num_values)
            .map(|_| f64::from(rng.random_range(1i32..=10)))
            .collect();

        let (heuristic, optimum) = match case % 3 {
            0 => {
                let mut a = Allocator::new(targets.clone(), AbsoluteError).unwrap();
                a.assign_values(&values).unwrap();
                let opt = search.solve(&targets, &values, &AbsoluteError).unwrap();
                (a.objective().unwrap(), opt.objective_value())
            }
            1 => {
                let mut a = Allocator::new(targets.clone(), SquaredError).unwrap();
                a.assign_values(&values).unwrap();
                let opt = search.solve(&targets, &values, &SquaredError).unwrap();
                (a.objective().unwrap(), opt.objective_value())
            }
            _ => {
                let mut a = Allocator::new(targets.clone(), AbsolutePercentageError).unwrap();
                a.assign_values(&values).unwrap();
                let opt = search
                    .solve(&targets, &values, &AbsolutePercentageError)
                    .unwrap();
                (a.objective().unwrap(), opt.objective_value())
            }
        };

        assert!(
            optimum <= heuristic + 1e-9,
            "brute force {} worse than heuristic {} on {:?} / {:?}",
            optimum,
            heuristic,
            targets,
            values
        );
        gaps.push(heuristic - optimum);
    }

    // The heuristic must hit the optimum on a fair share of tiny instances.
    let exact = gaps.iter().filter(|&&g| g.abs() < 1e-9).count();
    assert!(exact >= gaps.len() / 4, "only {} of {} optimal", exact, gaps.len());
}

#[test]
fn test_single_bin_is_always_optimal() {
    let values: Vec<f64> = (1..=7).map(f64::from).collect();
    let optimum = ExhaustiveSearch::new()
        .solve(&[20.0], &values, &SquaredError)
        .unwrap();

    let mut allocator = Allocator::new(vec![20.0], SquaredError).unwrap();
    allocator.assign_values(&values).unwrap();
    assert_eq!(allocator.objective().unwrap(), optimum.objective_value());
    assert_eq!(optimum.objective_value(), 64.0);
}
