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


//! Recursive split/recombine allocation.
//!
//! `Allocator::assign_values` distributes a batch of values over the bins by
//! recursion on the batch:
//!
//! 1. A batch of one value is placed by the `GreedyAssigner`.
//! 2. A longer batch is cut at `len / 2`. The left half `values[..mid]` and
//!    the right half `values[mid..]` are solved recursively, each against its
//!    own snapshot of the bin state.
//! 3. The half whose result has the strictly lower aggregate objective is
//!    kept. On equal objectives the right half is kept.
//! 4. The original values of the discarded half are greedily re-assigned into
//!    the kept state, and the aggregate objective is recomputed.
//!
//! Sibling halves never share mutable state, which is what allows
//! `BranchExecution::Parallel` to evaluate them with `rayon::join` when the
//! `parallel` feature is enabled. The selected branch does not depend on the
//! execution mode.

use crate::{
    monitor::{allocation_monitor::AllocationMonitor, no_op::NoOperationMonitor},
    result::AllocationOutcome,
    stats::SplitStatistics,
};
use binalloc_core::num::AllocNumeric;
use binalloc_greedy::assigner::{GreedyAssigner, Scoring};
use binalloc_model::{
    allocation::Allocation,
    bins::{BinState, BinView},
    error::AllocationError,
    index::{BinIndex, ValueIndex},
    objective::{AbsoluteError, Aggregation, ObjectiveFunction, validate_targets},
};
use std::sync::Arc;

/// How the two halves of a split are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BranchExecution {
    /// Left half first, then right half, on the calling thread.
    #[default]
    Sequential,
    /// Both halves concurrently on the rayon pool, for batches of at least
    /// `min_batch` values. Smaller batches fall back to sequential
    /// evaluation, as does everything when the `parallel` feature is off.
    Parallel { min_batch: usize },
}

impl BranchExecution {
    /// The `min_batch` used by `BranchExecution::parallel`.
    pub const DEFAULT_MIN_BATCH: usize = 64;

    /// Parallel execution with the default batch threshold.
    #[inline]
    pub const fn parallel() -> Self {
        BranchExecution::Parallel {
            min_batch: Self::DEFAULT_MIN_BATCH,
        }
    }

    /// Returns `true` if a batch of `len` values would have its halves
    /// evaluated concurrently.
    #[inline]
    pub fn splits_in_parallel(&self, len: usize) -> bool {
        match *self {
            BranchExecution::Sequential => false,
            BranchExecution::Parallel { min_batch } => {
                cfg!(feature = "parallel") && len >= min_batch.max(2)
            }
        }
    }
}

impl std::fmt::Display for BranchExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchExecution::Sequential => write!(f, "Sequential"),
            BranchExecution::Parallel { min_batch } => {
                write!(f, "Parallel(min_batch: {})", min_batch)
            }
        }
    }
}

/// Tuning knobs of an `Allocator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AllocatorConfig {
    /// Scoring rule of every greedy placement.
    pub scoring: Scoring,
    /// Evaluation strategy of sibling halves.
    pub execution: BranchExecution,
}

impl std::fmt::Display for AllocatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AllocatorConfig(scoring: {}, execution: {})",
            self.scoring, self.execution
        )
    }
}

/// Distributes batches of values over a fixed set of target-carrying bins.
///
/// The allocator owns the bin state exclusively. Batches are applied
/// atomically: a rejected batch leaves the state untouched.
#[derive(Clone, Debug)]
pub struct Allocator<T>
where
    T: AllocNumeric,
{
    state: BinState<T>,
    objective: Arc<dyn ObjectiveFunction<T>>,
    config: AllocatorConfig,
}

impl<T> Allocator<T>
where
    T: AllocNumeric,
{
    /// Creates an allocator with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if `targets` is empty, contains NaN or infinity, or contains a
    /// target the objective rejects.
    #[inline]
    pub fn new<O>(targets: Vec<T>, objective: O) -> Result<Self, AllocationError>
    where
        O: ObjectiveFunction<T> + 'static,
    {
        AllocatorBuilder::new(targets).with_objective(objective).build()
    }

    /// Assigns a batch of values to the bins.
    ///
    /// # Errors
    ///
    /// - `AllocationError::EmptyBatch` if `values` is empty.
    /// - `AllocationError::NonFiniteValue` if a value is NaN or infinite.
    /// - `AllocationError::NonFiniteObjective` if the objective breaks down
    ///   while the batch is solved.
    ///
    /// In every error case the allocator is left unchanged.
    #[inline]
    pub fn assign_values(&mut self, values: &[T]) -> Result<AllocationOutcome<T>, AllocationError> {
        let mut monitor = NoOperationMonitor::new();
        self.assign_values_with_monitor(values, &mut monitor)
    }

    /// Same as `assign_values`, reporting to `monitor`.
    ///
    /// `on_enter_allocation` is only called for batches that pass input
    /// validation; `on_allocation_failed` is called for every rejection.
    pub fn assign_values_with_monitor<M>(
        &mut self,
        values: &[T],
        monitor: &mut M,
    ) -> Result<AllocationOutcome<T>, AllocationError>
    where
        M: AllocationMonitor<T> + ?Sized,
    {
        match self.run_batch(values, monitor) {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                log::debug!("batch of {} values rejected: {}", values.len(), error);
                monitor.on_allocation_failed(&error);
                Err(error)
            }
        }
    }

    fn run_batch<M>(
        &mut self,
        values: &[T],
        monitor: &mut M,
    ) -> Result<AllocationOutcome<T>, AllocationError>
    where
        M: AllocationMonitor<T> + ?Sized,
    {
        if values.is_empty() {
            return Err(AllocationError::EmptyBatch);
        }
        if let Some((i, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AllocationError::NonFiniteValue {
                index: ValueIndex::new(i),
                value: value.widen(),
            });
        }

        // Pinned for the whole run.
        let objective = Arc::clone(&self.objective);
        let previous = self.state.aggregate(objective.as_ref(), Aggregation::Sum)?;

        monitor.on_enter_allocation(&self.state, values);
        let start = std::time::Instant::now();

        let session = SplitSession {
            objective: objective.as_ref(),
            assigner: GreedyAssigner::new(self.config.scoring),
            execution: self.config.execution,
        };
        let Branch {
            state,
            objective: value,
            mut stats,
        } = session.solve(values, self.state.clone(), 0)?;

        stats.on_snapshot();
        stats.values_assigned = values.len() as u64;
        stats.set_total_time(start.elapsed());
        self.state = state;

        let outcome = AllocationOutcome::new(value, previous, values.len(), stats);
        log::debug!(
            "allocated {} values into {} bins: objective {} -> {} ({} merges, {:.3?})",
            values.len(),
            self.state.num_bins(),
            previous,
            value,
            outcome.statistics().merges,
            outcome.statistics().time_total
        );
        monitor.on_exit_allocation(&self.state, &outcome);
        Ok(outcome)
    }

    /// Returns the sum of the objective over all bins.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NonFiniteObjective` if any bin scores NaN or
    /// infinity.
    #[inline]
    pub fn objective(&self) -> Result<T, AllocationError> {
        self.state.aggregate(self.objective.as_ref(), Aggregation::Sum)
    }

    /// Returns the mean of the objective over all bins.
    ///
    /// # Errors
    ///
    /// Same as `objective`.
    #[inline]
    pub fn mean_objective(&self) -> Result<T, AllocationError> {
        self.state.aggregate(self.objective.as_ref(), Aggregation::Mean)
    }

    /// Installs a new objective for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidTarget` if the objective rejects one
    /// of the targets. The previous objective then stays installed.
    #[inline]
    pub fn set_objective<O>(&mut self, objective: O) -> Result<(), AllocationError>
    where
        O: ObjectiveFunction<T> + 'static,
    {
        self.set_objective_arc(Arc::new(objective))
    }

    /// Shared-pointer variant of `set_objective`.
    pub fn set_objective_arc(
        &mut self,
        objective: Arc<dyn ObjectiveFunction<T>>,
    ) -> Result<(), AllocationError> {
        validate_targets(objective.as_ref(), self.state.targets())?;
        log::debug!(
            "objective changed from {} to {}",
            self.objective.name(),
            objective.name()
        );
        self.objective = objective;
        Ok(())
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.state.num_bins()
    }

    /// Returns the per-bin targets.
    #[inline]
    pub fn bin_values(&self) -> &[T] {
        self.state.targets()
    }

    /// Returns the per-bin running totals.
    #[inline]
    pub fn bin_totals(&self) -> &[T] {
        self.state.totals()
    }

    /// Iterates over the value lists of all bins, in bin order.
    #[inline]
    pub fn bins(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        BinIndex::range(self.state.num_bins()).map(|bin| self.state.contents(bin))
    }

    /// Returns a view of a single bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn bin(&self, bin: BinIndex) -> BinView<'_, T> {
        self.state.bin(bin)
    }

    #[inline]
    pub fn state(&self) -> &BinState<T> {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    #[inline]
    pub fn objective_function(&self) -> &dyn ObjectiveFunction<T> {
        self.objective.as_ref()
    }

    /// Takes a snapshot of the current bins and their aggregate objective.
    ///
    /// # Errors
    ///
    /// Same as `objective`.
    pub fn allocation(&self) -> Result<Allocation<T>, AllocationError> {
        let objective = self.objective()?;
        Ok(Allocation::from_state(&self.state, objective))
    }

    /// Consumes the allocator, returning its final allocation.
    ///
    /// # Errors
    ///
    /// Same as `objective`.
    pub fn into_allocation(self) -> Result<Allocation<T>, AllocationError> {
        self.allocation()
    }
}

impl<T> std::fmt::Display for Allocator<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Allocator(bins: {}, values: {}, objective: {}, scoring: {}, execution: {})",
            self.state.num_bins(),
            self.state.num_values(),
            self.objective.name(),
            self.config.scoring,
            self.config.execution
        )
    }
}

/// Builder for `Allocator`.
///
/// Without an explicit objective the allocator uses `AbsoluteError`.
pub struct AllocatorBuilder<T>
where
    T: AllocNumeric,
{
    targets: Vec<T>,
    objective: Option<Arc<dyn ObjectiveFunction<T>>>,
    config: AllocatorConfig,
}

impl<T> AllocatorBuilder<T>
where
    T: AllocNumeric,
{
    #[inline]
    pub fn new(targets: Vec<T>) -> Self {
        Self {
            targets,
            objective: None,
            config: AllocatorConfig::default(),
        }
    }

    #[inline]
    pub fn with_objective<O>(mut self, objective: O) -> Self
    where
        O: ObjectiveFunction<T> + 'static,
    {
        self.objective = Some(Arc::new(objective));
        self
    }

    #[inline]
    pub fn with_objective_arc(mut self, objective: Arc<dyn ObjectiveFunction<T>>) -> Self {
        self.objective = Some(objective);
        self
    }

    #[inline]
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.config.scoring = scoring;
        self
    }

    #[inline]
    pub fn with_execution(mut self, execution: BranchExecution) -> Self {
        self.config.execution = execution;
        self
    }

    #[inline]
    pub fn with_config(mut self, config: AllocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the allocator with all bins empty.
    ///
    /// # Errors
    ///
    /// - `AllocationError::NoBins` if no targets were given.
    /// - `AllocationError::NonFiniteTarget` for a NaN or infinite target.
    /// - `AllocationError::InvalidTarget` if the objective rejects a target.
    pub fn build(self) -> Result<Allocator<T>, AllocationError> {
        let objective = self
            .objective
            .unwrap_or_else(|| Arc::new(AbsoluteError) as Arc<dyn ObjectiveFunction<T>>);
        let state = BinState::new(self.targets)?;
        validate_targets(objective.as_ref(), state.targets())?;

        Ok(Allocator {
            state,
            objective,
            config: self.config,
        })
    }
}

/// Result of solving one slice of the batch.
struct Branch<T> {
    state: BinState<T>,
    objective: T,
    stats: SplitStatistics,
}

/// Everything a run needs besides the values and the state. Shared by
/// reference between sibling branches.
struct SplitSession<'a, T>
where
    T: AllocNumeric,
{
    objective: &'a dyn ObjectiveFunction<T>,
    assigner: GreedyAssigner,
    execution: BranchExecution,
}

impl<'a, T> SplitSession<'a, T>
where
    T: AllocNumeric,
{
    fn solve(
        &self,
        values: &[T],
        mut state: BinState<T>,
        depth: u64,
    ) -> Result<Branch<T>, AllocationError> {
        debug_assert!(
            !values.is_empty(),
            "called `SplitSession::solve` with an empty batch"
        );

        let mut stats = SplitStatistics::default();

        if values.len() == 1 {
            self.assigner.assign(values, &mut state, self.objective)?;
            let objective = state.aggregate(self.objective, Aggregation::Sum)?;
            stats.on_leaf(depth);
            return Ok(Branch {
                state,
                objective,
                stats,
            });
        }

        let mid = values.len() / 2;
        let (left_values, right_values) = values.split_at(mid);
        let left_state = state.clone();
        stats.on_snapshot();

        let (left, right) = self.solve_halves(left_values, left_state, right_values, state, depth + 1)?;
        stats.absorb(&left.stats);
        stats.absorb(&right.stats);

        // Strictly lower wins; ties keep the right half.
        let left_won = left.objective < right.objective;
        let (mut kept, abandoned) = if left_won {
            (left.state, right_values)
        } else {
            (right.state, left_values)
        };
        log::trace!(
            "depth {}: left {} vs right {}, keeping {}, re-assigning {} values",
            depth,
            left.objective,
            right.objective,
            if left_won { "left" } else { "right" },
            abandoned.len()
        );

        self.assigner.assign(abandoned, &mut kept, self.objective)?;
        let objective = kept.aggregate(self.objective, Aggregation::Sum)?;

        stats.on_merge(left_won, abandoned.len());
        stats.on_depth_update(depth);

        Ok(Branch {
            state: kept,
            objective,
            stats,
        })
    }

    fn solve_halves(
        &self,
        left_values: &[T],
        left_state: BinState<T>,
        right_values: &[T],
        right_state: BinState<T>,
        depth: u64,
    ) -> Result<(Branch<T>, Branch<T>), AllocationError> {
        if self
            .execution
            .splits_in_parallel(left_values.len() + right_values.len())
        {
            #[cfg(feature = "parallel")]
            {
                let (left, right) = rayon::join(
                    || self.solve(left_values, left_state, depth),
                    || self.solve(right_values, right_state, depth),
                );
                return Ok((left?, right?));
            }
        }

        let left = self.solve(left_values, left_state, depth)?;
        let right = self.solve(right_values, right_state, depth)?;
        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::history::HistoryMonitor;
    use binalloc_model::objective::{AbsolutePercentageError, FnObjective, SquaredError};

    fn bi(i: usize) -> BinIndex {
        BinIndex::new(i)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_builder_defaults_to_absolute_error() {
        let allocator = AllocatorBuilder::<f64>::new(vec![1.0, 2.0]).build().unwrap();
        assert_eq!(allocator.objective_function().name(), "AbsoluteError");
        assert_eq!(*allocator.config(), AllocatorConfig::default());
        assert_eq!(allocator.num_bins(), 2);
        assert_eq!(allocator.bin_totals(), &[0.0, 0.0]);
        assert!(allocator.bins().all(|b| b.is_empty()));
    }

    #[test]
    fn test_builder_rejects_bad_targets() {
        assert_eq!(
            AllocatorBuilder::<f64>::new(Vec::new()).build().unwrap_err(),
            AllocationError::NoBins
        );
        let err = Allocator::new(vec![3.0, 0.0], AbsolutePercentageError).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::InvalidTarget { bin, .. } if bin == bi(1)
        ));
        assert!(err.is_precondition_violation());
    }

    #[test]
    fn test_single_value_goes_to_closest_target() {
        let mut allocator = AllocatorBuilder::new(vec![10.0, 4.0, 6.0])
            .with_objective(AbsoluteError)
            .with_scoring(Scoring::Absolute)
            .build()
            .unwrap();
        let outcome = allocator.assign_values(&[5.0]).unwrap();

        // 4 and 6 are equally close; the lower index wins.
        assert_eq!(allocator.bin(bi(1)).values(), &[5.0]);
        assert_eq!(outcome.statistics().leaves, 1);
        assert_eq!(outcome.statistics().merges, 0);
        assert!(approx(outcome.previous_objective(), 20.0));
        assert!(approx(outcome.objective(), 17.0));
    }

    #[test]
    fn test_equal_objectives_keep_right_half() {
        // Both halves end at objective 2, so the right half (value 0) is kept
        // and the left value 2 is re-assigned after it.
        let mut allocator = Allocator::new(vec![1.0, 1.0], AbsoluteError).unwrap();
        let outcome = allocator.assign_values(&[2.0, 0.0]).unwrap();

        assert_eq!(allocator.bin(bi(0)).values(), &[0.0, 2.0]);
        assert!(allocator.bin(bi(1)).values().is_empty());
        assert_eq!(outcome.statistics().right_wins, 1);
        assert_eq!(outcome.statistics().left_wins, 0);
    }

    #[test]
    fn test_single_bin_takes_everything() {
        let mut allocator = Allocator::new(vec![7.0], SquaredError).unwrap();
        let outcome = allocator.assign_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(allocator.bin_totals(), &[15.0]);
        assert_eq!(allocator.bin(bi(0)).values().len(), 5);
        assert_eq!(outcome.statistics().merges, 4);
        assert!(approx(allocator.objective().unwrap(), 64.0));
    }

    #[test]
    fn test_statistics_shape() {
        let mut allocator = Allocator::new(vec![3.0, 5.0, 9.0], AbsoluteError).unwrap();
        let values: Vec<f64> = (1..=11).map(f64::from).collect();
        let outcome = allocator.assign_values(&values).unwrap();
        let stats = outcome.statistics();

        assert_eq!(stats.values_assigned, 11);
        assert_eq!(stats.leaves, 11);
        assert_eq!(stats.merges, 10);
        assert_eq!(stats.left_wins + stats.right_wins, stats.merges);
        // One snapshot per split plus the run snapshot.
        assert_eq!(stats.snapshots, 11);
        // ceil(log2(11)) levels below the root.
        assert_eq!(stats.max_depth, 4);
        assert!(stats.reassigned_values >= 10);
    }

    #[test]
    fn test_empty_batch_is_rejected_without_changes() {
        let mut allocator = Allocator::new(vec![3.0, 4.0], AbsoluteError).unwrap();
        allocator.assign_values(&[1.0]).unwrap();
        let before = allocator.state().clone();

        assert_eq!(
            allocator.assign_values(&[]).unwrap_err(),
            AllocationError::EmptyBatch
        );
        assert_eq!(allocator.state(), &before);
    }

    #[test]
    fn test_non_finite_value_is_rejected_without_changes() {
        let mut allocator = Allocator::new(vec![3.0, 4.0], AbsoluteError).unwrap();
        let err = allocator.assign_values(&[1.0, 2.0, f64::NAN]).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::NonFiniteValue { index, .. } if index == ValueIndex::new(2)
        ));
        assert_eq!(allocator.state().num_values(), 0);
    }

    #[test]
    fn test_objective_breakdown_rolls_back() {
        let exploding = FnObjective::new("Exploding", |achieved: f64, target: f64| {
            if achieved > 5.0 {
                f64::INFINITY
            } else {
                (target - achieved).abs()
            }
        });
        let mut allocator = Allocator::new(vec![10.0], exploding).unwrap();
        allocator.assign_values(&[1.0, 2.0]).unwrap();
        let before = allocator.state().clone();

        let err = allocator.assign_values(&[2.0, 3.0]).unwrap_err();
        assert!(matches!(err, AllocationError::NonFiniteObjective { .. }));
        assert_eq!(allocator.state(), &before);
    }

    #[test]
    fn test_set_objective_validates_targets() {
        let mut allocator = Allocator::new(vec![0.0, 4.0], AbsoluteError).unwrap();
        assert!(allocator.set_objective(AbsolutePercentageError).is_err());
        assert_eq!(allocator.objective_function().name(), "AbsoluteError");

        allocator.set_objective(SquaredError).unwrap();
        assert_eq!(allocator.objective_function().name(), "SquaredError");
        assert!(approx(allocator.objective().unwrap(), 16.0));
    }

    #[test]
    fn test_mean_objective() {
        let mut allocator = Allocator::new(vec![3.0, 4.0], AbsolutePercentageError).unwrap();
        allocator.assign_values(&[1.0, 2.0, 3.0]).unwrap();
        assert!(approx(allocator.objective().unwrap(), 0.25));
        assert!(approx(allocator.mean_objective().unwrap(), 0.125));
    }

    #[test]
    fn test_batches_accumulate() {
        let mut allocator = Allocator::new(vec![10.0, 20.0], AbsoluteError).unwrap();
        let mut history = HistoryMonitor::new();

        allocator
            .assign_values_with_monitor(&[4.0, 6.0, 8.0], &mut history)
            .unwrap();
        allocator
            .assign_values_with_monitor(&[5.0, 7.0], &mut history)
            .unwrap();
        assert!(allocator.assign_values_with_monitor(&[], &mut history).is_err());

        assert_eq!(history.len(), 2);
        assert_eq!(history.failures(), 1);
        assert_eq!(history.entries()[1].num_values, 5);
        assert_eq!(
            history.entries()[1].previous_objective,
            history.entries()[0].objective
        );
        let total: f64 = allocator.bin_totals().iter().sum();
        assert!(approx(total, 30.0));
    }

    #[test]
    fn test_parallel_config_matches_sequential() {
        let targets = vec![5.0, 10.0, 50.0, 200.0, 240.0];
        let values: Vec<f64> = (1..=64).rev().map(f64::from).collect();

        let mut sequential = Allocator::new(targets.clone(), AbsolutePercentageError).unwrap();
        let mut parallel = AllocatorBuilder::new(targets)
            .with_objective(AbsolutePercentageError)
            .with_execution(BranchExecution::Parallel { min_batch: 2 })
            .build()
            .unwrap();

        sequential.assign_values(&values).unwrap();
        parallel.assign_values(&values).unwrap();
        assert_eq!(sequential.state(), parallel.state());
    }

    #[test]
    fn test_splits_in_parallel_threshold() {
        assert!(!BranchExecution::Sequential.splits_in_parallel(1_000));
        let parallel = BranchExecution::Parallel { min_batch: 8 };
        assert!(!parallel.splits_in_parallel(7));
        assert_eq!(parallel.splits_in_parallel(8), cfg!(feature = "parallel"));
    }

    #[test]
    fn test_allocation_snapshot() {
        let mut allocator = Allocator::new(vec![3.0, 4.0], AbsolutePercentageError).unwrap();
        allocator.assign_values(&[1.0, 2.0, 3.0]).unwrap();

        let allocation = allocator.allocation().unwrap();
        assert_eq!(allocation.num_values(), 3);
        assert_eq!(allocation.targets(), &[3.0, 4.0]);
        assert!(approx(allocation.objective_value(), 0.25));
        assert_eq!(allocator.into_allocation().unwrap(), allocation);
    }

    #[test]
    fn test_display() {
        let allocator = AllocatorBuilder::<f64>::new(vec![1.0])
            .with_scoring(Scoring::Absolute)
            .with_execution(BranchExecution::Parallel { min_batch: 16 })
            .build()
            .unwrap();
        assert_eq!(
            allocator.to_string(),
            "Allocator(bins: 1, values: 0, objective: AbsoluteError, scoring: Absolute, execution: Parallel(min_batch: 16))"
        );
    }
}
