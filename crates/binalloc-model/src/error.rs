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


//! Failure taxonomy of the allocation crates.
//!
//! Two families of errors exist. Precondition violations (empty batch, no
//! bins, mismatched lengths, a target an objective cannot handle) are
//! detected before any state is touched. Numeric degeneracies (an objective
//! returning NaN or infinity) are detected where the score is computed and
//! are never folded into a comparison.
//!
//! Numbers carried by the variants are widened to `f64` so the error type
//! does not depend on the numeric type of the allocator.

use crate::index::{BinIndex, ValueIndex};

#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// `assign_values` was called with an empty batch.
    EmptyBatch,
    /// The bin collection is empty (no targets were given).
    NoBins,
    /// Targets, totals and value lists disagree in length.
    LengthMismatch {
        targets: usize,
        totals: usize,
        contents: usize,
    },
    /// A value of the batch is NaN or infinite.
    NonFiniteValue { index: ValueIndex, value: f64 },
    /// A bin target is NaN or infinite.
    NonFiniteTarget { bin: BinIndex, target: f64 },
    /// The objective function cannot score the target of this bin.
    InvalidTarget {
        bin: BinIndex,
        target: f64,
        objective: String,
        reason: &'static str,
    },
    /// The objective function produced NaN or infinity for this bin.
    NonFiniteObjective {
        bin: BinIndex,
        achieved: f64,
        target: f64,
    },
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "Cannot assign an empty batch of values"),
            Self::NoBins => write!(f, "At least one bin is required"),
            Self::LengthMismatch {
                targets,
                totals,
                contents,
            } => write!(
                f,
                "Inconsistent bin state: {} targets, {} totals, {} value lists",
                targets, totals, contents
            ),
            Self::NonFiniteValue { index, value } => {
                write!(f, "Value {} at {} is not finite", value, index)
            }
            Self::NonFiniteTarget { bin, target } => {
                write!(f, "Target {} of {} is not finite", target, bin)
            }
            Self::InvalidTarget {
                bin,
                target,
                objective,
                reason,
            } => write!(
                f,
                "Objective '{}' rejects target {} of {}: {}",
                objective, target, bin, reason
            ),
            Self::NonFiniteObjective {
                bin,
                achieved,
                target,
            } => write!(
                f,
                "Objective is not finite for {} (achieved: {}, target: {})",
                bin, achieved, target
            ),
        }
    }
}

impl std::error::Error for AllocationError {}

impl AllocationError {
    /// Returns `true` if the error is a rejected input rather than a
    /// numeric breakdown of the objective.
    #[inline]
    pub fn is_precondition_violation(&self) -> bool {
        !matches!(self, Self::NonFiniteObjective { .. })
    }
}
