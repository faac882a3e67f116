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


//! Brute-force optimum for small instances.
//!
//! `ExhaustiveSearch` tries every one of the `bins ^ values` assignments and
//! returns the one with the lowest aggregate objective (sum over bins). Among
//! equally good assignments the first one in enumeration order is kept, where
//! value `0` varies slowest and lower bins come first. It exists to measure
//! the heuristic `Allocator` against the true optimum.

use binalloc_core::num::AllocNumeric;
use binalloc_model::{
    allocation::Allocation,
    bins::BinState,
    error::AllocationError,
    index::{BinIndex, ValueIndex},
    objective::{ObjectiveFunction, try_evaluate, validate_targets},
};

/// Errors returned by `ExhaustiveSearch::solve`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExhaustiveError {
    /// The instance has more assignments than the configured limit.
    /// `combinations` is `None` when the count does not fit into `u64`.
    TooLarge {
        combinations: Option<u64>,
        limit: u64,
    },
    /// The inputs were rejected.
    Allocation(AllocationError),
}

impl std::fmt::Display for ExhaustiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExhaustiveError::TooLarge {
                combinations: Some(n),
                limit,
            } => write!(f, "{} assignments exceed the limit of {}", n, limit),
            ExhaustiveError::TooLarge {
                combinations: None,
                limit,
            } => write!(f, "assignment count overflows u64 (limit {})", limit),
            ExhaustiveError::Allocation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExhaustiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExhaustiveError::Allocation(e) => Some(e),
            ExhaustiveError::TooLarge { .. } => None,
        }
    }
}

impl From<AllocationError> for ExhaustiveError {
    fn from(e: AllocationError) -> Self {
        ExhaustiveError::Allocation(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExhaustiveSearch {
    max_combinations: u64,
}

impl Default for ExhaustiveSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ExhaustiveSearch {
    pub const DEFAULT_MAX_COMBINATIONS: u64 = 1 << 20;

    #[inline]
    pub const fn new() -> Self {
        Self {
            max_combinations: Self::DEFAULT_MAX_COMBINATIONS,
        }
    }

    #[inline]
    pub const fn with_max_combinations(max_combinations: u64) -> Self {
        Self { max_combinations }
    }

    #[inline]
    pub fn max_combinations(&self) -> u64 {
        self.max_combinations
    }

    /// Returns `bins ^ values`, or `None` on overflow.
    #[inline]
    pub fn combinations(num_bins: usize, num_values: usize) -> Option<u64> {
        let exp = u32::try_from(num_values).ok()?;
        (num_bins as u64).checked_pow(exp)
    }

    /// Finds an optimal assignment of `values` to bins with the given
    /// `targets`.
    ///
    /// # Errors
    ///
    /// - `ExhaustiveError::TooLarge` if the search space exceeds the limit.
    /// - `ExhaustiveError::Allocation` for an empty batch, invalid targets,
    ///   non-finite values, or a non-finite objective.
    pub fn solve<T, O>(
        &self,
        targets: &[T],
        values: &[T],
        objective: &O,
    ) -> Result<Allocation<T>, ExhaustiveError>
    where
        T: AllocNumeric,
        O: ObjectiveFunction<T> + ?Sized,
    {
        let empty = BinState::new(targets.to_vec())?;
        validate_targets(objective, empty.targets())?;
        if values.is_empty() {
            return Err(AllocationError::EmptyBatch.into());
        }
        if let Some((i, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AllocationError::NonFiniteValue {
                index: ValueIndex::new(i),
                value: value.widen(),
            }
            .into());
        }

        let combinations = Self::combinations(targets.len(), values.len());
        if combinations.is_none_or(|n| n > self.max_combinations) {
            return Err(ExhaustiveError::TooLarge {
                combinations,
                limit: self.max_combinations,
            });
        }

        let mut search = Enumeration {
            targets,
            values,
            objective,
            totals: vec![T::zero(); targets.len()],
            choice: vec![0; values.len()],
            best: None,
        };
        search.run()?;

        let (best_objective, best_choice) = match search.best {
            Some(best) => best,
            // At least one complete assignment exists for a non-empty batch.
            None => return Err(AllocationError::EmptyBatch.into()),
        };

        let mut state = empty;
        for (&bin, &value) in best_choice.iter().zip(values) {
            state.place(BinIndex::new(bin), value);
        }
        log::debug!(
            "exhaustive search over {} assignments: optimum {}",
            combinations.unwrap_or(0),
            best_objective
        );
        Ok(Allocation::from_state(&state, best_objective))
    }
}

struct Enumeration<'a, T, O>
where
    O: ?Sized,
{
    targets: &'a [T],
    values: &'a [T],
    objective: &'a O,
    totals: Vec<T>,
    choice: Vec<usize>,
    best: Option<(T, Vec<usize>)>,
}

impl<'a, T, O> Enumeration<'a, T, O>
where
    T: AllocNumeric,
    O: ObjectiveFunction<T> + ?Sized,
{
    /// Visits every assignment, starting with all values in bin 0.
    fn run(&mut self) -> Result<(), AllocationError> {
        for &value in self.values {
            self.totals[0] = self.totals[0] + value;
        }
        loop {
            self.record()?;
            if !self.advance() {
                return Ok(());
            }
        }
    }

    /// Steps `choice` to the next assignment like an odometer, the last value
    /// turning fastest, and moves values between totals accordingly. Returns
    /// `false` once every digit wrapped around.
    fn advance(&mut self) -> bool {
        let num_bins = self.targets.len();
        for i in (0..self.values.len()).rev() {
            let value = self.values[i];
            let from = self.choice[i];
            let to = if from + 1 < num_bins { from + 1 } else { 0 };

            self.totals[from] = self.totals[from] - value;
            self.totals[to] = self.totals[to] + value;
            self.choice[i] = to;

            if to != 0 {
                return true;
            }
        }
        false
    }

    fn record(&mut self) -> Result<(), AllocationError> {
        let mut sum = T::zero();
        for (i, (&total, &target)) in self.totals.iter().zip(self.targets).enumerate() {
            sum = sum + try_evaluate(self.objective, BinIndex::new(i), total, target)?;
        }

        if self
            .best
            .as_ref()
            .is_none_or(|(best, _)| sum < *best)
        {
            self.best = Some((sum, self.choice.clone()));
        }
        Ok(())
    }
}
