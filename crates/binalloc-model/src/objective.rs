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


//! Objective functions comparing a bin's achieved total with its target.
//!
//! An objective is a pure function of two numbers, `(achieved, target)`,
//! returning a non-negative error score. It keeps no state, so it can be
//! called any number of times and shared between threads. The aggregate
//! objective of a bin state is the sum (or mean) of the per-bin scores and
//! is always recomputed from the totals, never cached.
//!
//! Three reference metrics are provided:
//!
//! | metric | formula | target restriction |
//! | --- | --- | --- |
//! | `AbsoluteError` | `\|target - achieved\|` | none |
//! | `SquaredError` | `(target - achieved)^2` | none |
//! | `AbsolutePercentageError` | `\|(target - achieved) / target\|` | `target != 0` |
//!
//! Objectives that cannot score some targets say so in `validate_target`,
//! which the allocator calls for every bin before any value is placed.

use crate::{error::AllocationError, index::BinIndex};
use binalloc_core::num::AllocNumeric;

/// A pairwise error metric between a bin's achieved total and its target.
pub trait ObjectiveFunction<T>: Send + Sync
where
    T: AllocNumeric,
{
    /// Returns the name of the objective function.
    fn name(&self) -> &str;

    /// Scores a bin whose values sum to `achieved` against its `target`.
    /// Lower is better.
    fn evaluate(&self, achieved: T, target: T) -> T;

    /// Checks whether `target` can be scored by this objective.
    ///
    /// The default implementation accepts every target.
    #[inline]
    fn validate_target(&self, _bin: BinIndex, _target: T) -> Result<(), AllocationError> {
        Ok(())
    }
}

impl<T> std::fmt::Debug for dyn ObjectiveFunction<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveFunction({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn ObjectiveFunction<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveFunction({})", self.name())
    }
}

/// Evaluates `objective` for one bin and rejects NaN or infinite scores.
#[inline]
pub fn try_evaluate<T, O>(
    objective: &O,
    bin: BinIndex,
    achieved: T,
    target: T,
) -> Result<T, AllocationError>
where
    T: AllocNumeric,
    O: ObjectiveFunction<T> + ?Sized,
{
    let score = objective.evaluate(achieved, target);
    if score.is_finite() {
        Ok(score)
    } else {
        Err(AllocationError::NonFiniteObjective {
            bin,
            achieved: achieved.widen(),
            target: target.widen(),
        })
    }
}

/// Validates every target against `objective`, stopping at the first rejection.
pub fn validate_targets<T, O>(objective: &O, targets: &[T]) -> Result<(), AllocationError>
where
    T: AllocNumeric,
    O: ObjectiveFunction<T> + ?Sized,
{
    targets
        .iter()
        .enumerate()
        .try_for_each(|(i, &target)| objective.validate_target(BinIndex::new(i), target))
}

/// How per-bin scores are combined into one aggregate objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregation {
    /// Sum of the per-bin scores.
    #[default]
    Sum,
    /// Sum divided by the number of bins.
    Mean,
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aggregation::Sum => write!(f, "Sum"),
            Aggregation::Mean => write!(f, "Mean"),
        }
    }
}

/// `|target - achieved|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AbsoluteError;

impl<T> ObjectiveFunction<T> for AbsoluteError
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        "AbsoluteError"
    }

    #[inline(always)]
    fn evaluate(&self, achieved: T, target: T) -> T {
        (target - achieved).abs()
    }
}

/// `(target - achieved)^2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SquaredError;

impl<T> ObjectiveFunction<T> for SquaredError
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        "SquaredError"
    }

    #[inline(always)]
    fn evaluate(&self, achieved: T, target: T) -> T {
        let diff = target - achieved;
        diff * diff
    }
}

/// `|(target - achieved) / target|`, undefined for a zero target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AbsolutePercentageError;

impl<T> ObjectiveFunction<T> for AbsolutePercentageError
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        "AbsolutePercentageError"
    }

    #[inline(always)]
    fn evaluate(&self, achieved: T, target: T) -> T {
        ((target - achieved) / target).abs()
    }

    fn validate_target(&self, bin: BinIndex, target: T) -> Result<(), AllocationError> {
        if target.is_zero() {
            return Err(AllocationError::InvalidTarget {
                bin,
                target: target.widen(),
                objective: <Self as ObjectiveFunction<T>>::name(self).to_string(),
                reason: "target must be non-zero",
            });
        }
        Ok(())
    }
}

/// A named objective backed by a closure `(achieved, target) -> score`.
///
/// The closure must be pure: the allocator calls it many times on cloned
/// states and relies on identical inputs giving identical scores.
#[derive(Clone)]
pub struct FnObjective<F> {
    name: String,
    function: F,
}

impl<F> FnObjective<F> {
    /// Wraps `function` under the given `name`.
    #[inline]
    pub fn new<N>(name: N, function: F) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            function,
        }
    }
}

impl<F> std::fmt::Debug for FnObjective<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObjective")
            .field("name", &self.name)
            .finish()
    }
}

impl<T, F> ObjectiveFunction<T> for FnObjective<F>
where
    T: AllocNumeric,
    F: Fn(T, T) -> T + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn evaluate(&self, achieved: T, target: T) -> T {
        (self.function)(achieved, target)
    }
}

/// The built-in objectives, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Objective {
    AbsoluteError,
    SquaredError,
    #[default]
    AbsolutePercentageError,
}

impl Objective {
    /// All built-in objectives, in declaration order.
    pub const ALL: [Objective; 3] = [
        Objective::AbsoluteError,
        Objective::SquaredError,
        Objective::AbsolutePercentageError,
    ];

    /// Returns the kebab-case identifier of the objective.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::AbsoluteError => "absolute-error",
            Objective::SquaredError => "squared-error",
            Objective::AbsolutePercentageError => "absolute-percentage-error",
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown objective name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownObjectiveError {
    pub name: String,
}

impl std::fmt::Display for UnknownObjectiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown objective function '{}'", self.name)
    }
}

impl std::error::Error for UnknownObjectiveError {}

impl std::str::FromStr for Objective {
    type Err = UnknownObjectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Objective::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownObjectiveError {
                name: s.to_string(),
            })
    }
}

impl<T> ObjectiveFunction<T> for Objective
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        match self {
            Objective::AbsoluteError => "AbsoluteError",
            Objective::SquaredError => "SquaredError",
            Objective::AbsolutePercentageError => "AbsolutePercentageError",
        }
    }

    #[inline]
    fn evaluate(&self, achieved: T, target: T) -> T {
        match self {
            Objective::AbsoluteError => AbsoluteError.evaluate(achieved, target),
            Objective::SquaredError => SquaredError.evaluate(achieved, target),
            Objective::AbsolutePercentageError => {
                AbsolutePercentageError.evaluate(achieved, target)
            }
        }
    }

    fn validate_target(&self, bin: BinIndex, target: T) -> Result<(), AllocationError> {
        match self {
            Objective::AbsoluteError => AbsoluteError.validate_target(bin, target),
            Objective::SquaredError => SquaredError.validate_target(bin, target),
            Objective::AbsolutePercentageError => {
                AbsolutePercentageError.validate_target(bin, target)
            }
        }
    }
}
