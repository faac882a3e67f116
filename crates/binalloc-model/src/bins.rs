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


//! The mutable state of a bin collection.
//!
//! `BinState` stores the bins in Structure of Arrays form: one shared,
//! immutable slice of targets, one vector of running totals and one vector of
//! per-bin value lists. The three always have the same length, which is the
//! number of bins and never changes after construction.
//!
//! Targets live behind an `Arc` because they are fixed for the lifetime of
//! the state; cloning a `BinState` therefore deep-copies only what can
//! diverge (totals and value lists) and shares the rest. This is the snapshot
//! the split allocator hands to each recursive branch.

use crate::{
    error::AllocationError,
    index::BinIndex,
    objective::{Aggregation, ObjectiveFunction, try_evaluate},
};
use binalloc_core::num::AllocNumeric;
use smallvec::SmallVec;
use std::sync::Arc;

/// Values assigned to a single bin, in insertion order.
pub type BinContents<T> = SmallVec<[T; 8]>;

#[derive(Clone, Debug, PartialEq)]
pub struct BinState<T> {
    targets: Arc<[T]>,               // len = num_bins
    totals: Vec<T>,                  // len = num_bins
    contents: Vec<BinContents<T>>,   // len = num_bins
}

impl<T> BinState<T>
where
    T: AllocNumeric,
{
    /// Creates a state with one empty bin per target, all totals zero.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NoBins` if `targets` is empty and
    /// `AllocationError::NonFiniteTarget` if a target is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use binalloc_model::bins::BinState;
    /// let state = BinState::new(vec![3.0f64, 4.0]).unwrap();
    /// assert_eq!(state.num_bins(), 2);
    /// assert_eq!(state.totals(), &[0.0, 0.0]);
    /// ```
    pub fn new<V>(targets: V) -> Result<Self, AllocationError>
    where
        V: Into<Arc<[T]>>,
    {
        let targets: Arc<[T]> = targets.into();
        validate_targets(&targets)?;
        let num_bins = targets.len();
        Ok(Self {
            targets,
            totals: vec![T::zero(); num_bins],
            contents: vec![BinContents::new(); num_bins],
        })
    }

    /// Creates a state from pre-existing totals and value lists.
    ///
    /// Totals are taken as given, they are not recomputed from `contents`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::LengthMismatch` if the three inputs disagree
    /// in length, plus the errors of `BinState::new`.
    pub fn from_parts<V>(
        targets: V,
        totals: Vec<T>,
        contents: Vec<Vec<T>>,
    ) -> Result<Self, AllocationError>
    where
        V: Into<Arc<[T]>>,
    {
        let targets: Arc<[T]> = targets.into();
        if targets.len() != totals.len() || targets.len() != contents.len() {
            return Err(AllocationError::LengthMismatch {
                targets: targets.len(),
                totals: totals.len(),
                contents: contents.len(),
            });
        }
        validate_targets(&targets)?;

        Ok(Self {
            targets,
            totals,
            contents: contents.into_iter().map(BinContents::from_vec).collect(),
        })
    }

    /// Returns the number of bins.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.targets.len()
    }

    /// Returns the total number of values placed across all bins.
    #[inline]
    pub fn num_values(&self) -> usize {
        self.contents.iter().map(|c| c.len()).sum()
    }

    /// Returns the targets ("bin values") of all bins.
    #[inline]
    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Returns the shared handle to the targets.
    #[inline]
    pub fn shared_targets(&self) -> &Arc<[T]> {
        &self.targets
    }

    /// Returns the running totals of all bins.
    #[inline]
    pub fn totals(&self) -> &[T] {
        &self.totals
    }

    /// Returns the target of a bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn target(&self, bin: BinIndex) -> T {
        self.targets[bin.get()]
    }

    /// Returns the running total of a bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn total(&self, bin: BinIndex) -> T {
        self.totals[bin.get()]
    }

    /// Returns the values assigned to a bin, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn contents(&self, bin: BinIndex) -> &[T] {
        &self.contents[bin.get()]
    }

    /// Returns a read-only view of one bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn bin(&self, bin: BinIndex) -> BinView<'_, T> {
        let i = bin.get();
        assert!(
            i < self.num_bins(),
            "called `BinState::bin` with bin index out of bounds: the len is {} but the index is {}",
            self.num_bins(),
            i
        );
        BinView {
            index: bin,
            target: self.targets[i],
            total: self.totals[i],
            values: &self.contents[i],
        }
    }

    /// Iterates over all bins in index order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = BinView<'_, T>> + '_ {
        BinIndex::range(self.num_bins()).map(move |b| self.bin(b))
    }

    /// Appends `value` to a bin and adds it to the bin's total.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn place(&mut self, bin: BinIndex, value: T) {
        let i = bin.get();
        debug_assert!(
            i < self.num_bins(),
            "called `BinState::place` with bin index out of bounds: the len is {} but the index is {}",
            self.num_bins(),
            i
        );
        self.totals[i] = self.totals[i] + value;
        self.contents[i].push(value);
    }

    /// Scores a single bin with `objective`.
    #[inline]
    pub fn score<O>(&self, bin: BinIndex, objective: &O) -> Result<T, AllocationError>
    where
        O: ObjectiveFunction<T> + ?Sized,
    {
        try_evaluate(objective, bin, self.total(bin), self.target(bin))
    }

    /// Recomputes the aggregate objective over all bins from scratch.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NonFiniteObjective` for the first bin whose
    /// score is NaN or infinite.
    pub fn aggregate<O>(&self, objective: &O, aggregation: Aggregation) -> Result<T, AllocationError>
    where
        O: ObjectiveFunction<T> + ?Sized,
    {
        let mut sum = T::zero();
        let mut count = T::zero();
        for bin in BinIndex::range(self.num_bins()) {
            sum = sum + self.score(bin, objective)?;
            count = count + T::one();
        }

        match aggregation {
            Aggregation::Sum => Ok(sum),
            // `count >= 1`, a state always has bins.
            Aggregation::Mean => Ok(sum / count),
        }
    }

    /// Returns the value lists of all bins as owned vectors.
    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.contents.iter().map(|c| c.to_vec()).collect()
    }
}

fn validate_targets<T>(targets: &[T]) -> Result<(), AllocationError>
where
    T: AllocNumeric,
{
    if targets.is_empty() {
        return Err(AllocationError::NoBins);
    }
    if let Some((i, &target)) = targets.iter().enumerate().find(|(_, t)| !t.is_finite()) {
        return Err(AllocationError::NonFiniteTarget {
            bin: BinIndex::new(i),
            target: target.widen(),
        });
    }
    Ok(())
}

/// A borrowed view of a single bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinView<'a, T> {
    index: BinIndex,
    target: T,
    total: T,
    values: &'a [T],
}

impl<'a, T> BinView<'a, T>
where
    T: Copy,
{
    #[inline]
    pub fn index(&self) -> BinIndex {
        self.index
    }

    #[inline]
    pub fn target(&self) -> T {
        self.target
    }

    #[inline]
    pub fn total(&self) -> T {
        self.total
    }

    #[inline]
    pub fn values(&self) -> &'a [T] {
        self.values
    }
}

impl<'a, T> std::fmt::Display for BinView<'a, T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bin(index: {}, target: {}, total: {}, values: {})",
            self.index.get(),
            self.target,
            self.total,
            self.values.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{AbsoluteError, AbsolutePercentageError, FnObjective};

    fn bi(i: usize) -> BinIndex {
        BinIndex::new(i)
    }

    #[test]
    fn test_new_starts_empty() {
        let state = BinState::new(vec![3.0f64, 4.0, 5.0]).expect("valid targets");
        assert_eq!(state.num_bins(), 3);
        assert_eq!(state.targets(), &[3.0, 4.0, 5.0]);
        assert_eq!(state.totals(), &[0.0, 0.0, 0.0]);
        assert_eq!(state.num_values(), 0);
        assert!(state.iter().all(|b| b.values().is_empty()));
    }

    #[test]
    fn test_new_rejects_empty_targets() {
        let err = BinState::<f64>::new(Vec::new()).expect_err("no bins");
        assert_eq!(err, AllocationError::NoBins);
    }

    #[test]
    fn test_new_rejects_non_finite_target() {
        let err = BinState::new(vec![1.0f64, f64::INFINITY]).expect_err("infinite target");
        assert!(matches!(
            err,
            AllocationError::NonFiniteTarget { bin, .. } if bin == bi(1)
        ));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let err = BinState::from_parts(vec![1.0f64, 2.0], vec![0.0], vec![vec![], vec![]])
            .expect_err("mismatch");
        assert_eq!(
            err,
            AllocationError::LengthMismatch {
                targets: 2,
                totals: 1,
                contents: 2
            }
        );
    }

    #[test]
    fn test_from_parts_keeps_given_totals() {
        let state = BinState::from_parts(
            vec![10.0f64, 20.0],
            vec![5.0, 1.0],
            vec![vec![2.0, 3.0], vec![1.0]],
        )
        .expect("consistent parts");
        assert_eq!(state.totals(), &[5.0, 1.0]);
        assert_eq!(state.contents(bi(0)), &[2.0, 3.0]);
        assert_eq!(state.num_values(), 3);
    }

    #[test]
    fn test_place_updates_total_and_contents() {
        let mut state = BinState::new(vec![3.0f64, 4.0]).unwrap();
        state.place(bi(1), 2.5);
        state.place(bi(1), -0.5);
        state.place(bi(0), 0.0);

        assert_eq!(state.total(bi(1)), 2.0);
        assert_eq!(state.contents(bi(1)), &[2.5, -0.5]);
        assert_eq!(state.contents(bi(0)), &[0.0]);
        assert_eq!(state.num_values(), 3);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut original = BinState::new(vec![3.0f64, 4.0]).unwrap();
        original.place(bi(0), 1.0);

        let mut snapshot = original.clone();
        snapshot.place(bi(0), 2.0);

        assert_eq!(original.total(bi(0)), 1.0);
        assert_eq!(original.contents(bi(0)), &[1.0]);
        assert_eq!(snapshot.total(bi(0)), 3.0);
        assert!(Arc::ptr_eq(original.shared_targets(), snapshot.shared_targets()));
    }

    #[test]
    fn test_aggregate_sum_and_mean() {
        let mut state = BinState::new(vec![3.0f64, 4.0]).unwrap();
        state.place(bi(0), 1.0);
        state.place(bi(1), 6.0);

        let sum = state.aggregate(&AbsoluteError, Aggregation::Sum).unwrap();
        let mean = state.aggregate(&AbsoluteError, Aggregation::Mean).unwrap();
        assert!((sum - 4.0).abs() < 1e-12);
        assert!((mean - 2.0).abs() < 1e-12);

        let ape = state
            .aggregate(&AbsolutePercentageError, Aggregation::Sum)
            .unwrap();
        assert!((ape - (2.0 / 3.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_mean_divides_by_bin_count() {
        let state = BinState::new(vec![1.0f32, 2.0, 6.0]).unwrap();
        let sum = state.aggregate(&AbsoluteError, Aggregation::Sum).unwrap();
        let mean = state.aggregate(&AbsoluteError, Aggregation::Mean).unwrap();
        assert_eq!(sum, 9.0);
        assert_eq!(mean, 3.0);
    }

    #[test]
    fn test_aggregate_surfaces_non_finite_scores() {
        let state = BinState::new(vec![1.0f64, 2.0]).unwrap();
        let blows_up = FnObjective::new("blows-up", |a: f64, t: f64| {
            if t > 1.5 { f64::INFINITY } else { (t - a).abs() }
        });
        let err = state
            .aggregate(&blows_up, Aggregation::Sum)
            .expect_err("infinite score");
        assert!(matches!(
            err,
            AllocationError::NonFiniteObjective { bin, .. } if bin == bi(1)
        ));
    }

    #[test]
    #[should_panic(expected = "called `BinState::bin` with bin index out of bounds")]
    fn test_bin_out_of_bounds_panics() {
        let state = BinState::new(vec![1.0f64]).unwrap();
        let _ = state.bin(bi(1));
    }

    #[test]
    fn test_bin_view_display() {
        let mut state = BinState::new(vec![3.0f64]).unwrap();
        state.place(bi(0), 1.5);
        assert_eq!(
            format!("{}", state.bin(bi(0))),
            "Bin(index: 0, target: 3, total: 1.5, values: 1)"
        );
    }
}
