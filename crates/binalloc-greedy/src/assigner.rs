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


//! Greedy assignment of values to bins.
//!
//! For every value `v`, in input order, each bin `j` is scored and the value
//! is appended to the bin with the strictly smallest score. Scores are
//! compared with `<`, so when several bins score the same the lowest bin
//! index wins. The score depends on the configured `Scoring` rule:
//!
//! - `Scoring::Marginal`: `f(total[j] + v, target[j]) - f(total[j], target[j])`,
//!   the change of the aggregate objective caused by the placement.
//! - `Scoring::Absolute`: `f(total[j] + v, target[j])`, the bin's score after
//!   the placement.
//!
//! One rule applies to every placement of a run; the two are never mixed.
//! Scores that are NaN or infinite abort the call with
//! `AllocationError::NonFiniteObjective` instead of taking part in the
//! comparison.

use binalloc_core::num::AllocNumeric;
use binalloc_model::{
    bins::BinState,
    error::AllocationError,
    index::{BinIndex, ValueIndex},
    objective::{ObjectiveFunction, try_evaluate},
};

/// How a candidate bin is scored for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scoring {
    /// Change of the bin's objective caused by the placement.
    #[default]
    Marginal,
    /// The bin's objective after the placement.
    Absolute,
}

impl std::fmt::Display for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scoring::Marginal => write!(f, "Marginal"),
            Scoring::Absolute => write!(f, "Absolute"),
        }
    }
}

/// The bin chosen for a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<T> {
    /// The selected bin.
    pub bin: BinIndex,
    /// The score the selection was based on. Lower is better.
    pub score: T,
    /// The change of the aggregate objective caused by the placement.
    /// Under `Scoring::Absolute` it is not finite when the bin's score
    /// before the placement is not.
    pub delta: T,
}

impl<T> std::fmt::Display for Candidate<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candidate(bin: {}, score: {}, delta: {})",
            self.bin.get(),
            self.score,
            self.delta
        )
    }
}

/// Assigns values one at a time to the bin with the best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GreedyAssigner {
    scoring: Scoring,
}

impl GreedyAssigner {
    /// Creates a new `GreedyAssigner` using the given scoring rule.
    #[inline]
    pub const fn new(scoring: Scoring) -> Self {
        Self { scoring }
    }

    /// Returns the scoring rule of this assigner.
    #[inline]
    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    /// Finds the bin `value` should go to, without placing it.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NonFiniteObjective` if a score the rule
    /// compares is NaN or infinite. `Scoring::Absolute` only evaluates the
    /// bins after the placement.
    pub fn best_bin<T, O>(
        &self,
        value: T,
        state: &BinState<T>,
        objective: &O,
    ) -> Result<Candidate<T>, AllocationError>
    where
        T: AllocNumeric,
        O: ObjectiveFunction<T> + ?Sized,
    {
        let mut best: Option<Candidate<T>> = None;

        for bin in BinIndex::range(state.num_bins()) {
            let total = state.total(bin);
            let target = state.target(bin);

            let after = try_evaluate(objective, bin, total + value, target)?;
            let (score, delta) = match self.scoring {
                Scoring::Marginal => {
                    let before = try_evaluate(objective, bin, total, target)?;
                    let delta = after - before;
                    if !delta.is_finite() {
                        return Err(AllocationError::NonFiniteObjective {
                            bin,
                            achieved: (total + value).widen(),
                            target: target.widen(),
                        });
                    }
                    (delta, delta)
                }
                // The pre-placement score does not take part in the choice.
                Scoring::Absolute => (after, after - objective.evaluate(total, target)),
            };

            if best.is_none_or(|b| score < b.score) {
                best = Some(Candidate { bin, score, delta });
            }
        }

        // `BinState` cannot be constructed without bins.
        best.ok_or(AllocationError::NoBins)
    }

    /// Places every value of `values`, in order, into its best bin.
    ///
    /// Returns the cumulative change of the aggregate objective, the sum of
    /// the `Candidate::delta` of every placement.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NonFiniteValue` for a NaN or infinite value
    /// and `AllocationError::NonFiniteObjective` if scoring breaks down. The
    /// offending value is not placed; values before it stay placed.
    pub fn assign<T, O>(
        &self,
        values: &[T],
        state: &mut BinState<T>,
        objective: &O,
    ) -> Result<T, AllocationError>
    where
        T: AllocNumeric,
        O: ObjectiveFunction<T> + ?Sized,
    {
        let mut cumulative = T::zero();

        for (i, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(AllocationError::NonFiniteValue {
                    index: ValueIndex::new(i),
                    value: value.widen(),
                });
            }

            let candidate = self.best_bin(value, state, objective)?;
            log::trace!("greedy: value {} -> {}", value, candidate);

            state.place(candidate.bin, value);
            cumulative = cumulative + candidate.delta;
        }

        Ok(cumulative)
    }
}

impl std::fmt::Display for GreedyAssigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GreedyAssigner(scoring: {})", self.scoring)
    }
}
