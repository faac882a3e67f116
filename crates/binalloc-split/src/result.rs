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


use crate::stats::SplitStatistics;
use binalloc_core::num::AllocNumeric;

/// Outcome of assigning one batch of values.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome<T> {
    objective: T,
    previous_objective: T,
    batch_size: usize,
    statistics: SplitStatistics,
}

impl<T> AllocationOutcome<T>
where
    T: AllocNumeric,
{
    #[inline]
    pub fn new(
        objective: T,
        previous_objective: T,
        batch_size: usize,
        statistics: SplitStatistics,
    ) -> Self {
        Self {
            objective,
            previous_objective,
            batch_size,
            statistics,
        }
    }

    /// Returns the aggregate objective after the batch.
    #[inline]
    pub fn objective(&self) -> T {
        self.objective
    }

    /// Returns the aggregate objective before the batch.
    #[inline]
    pub fn previous_objective(&self) -> T {
        self.previous_objective
    }

    /// Returns how much the batch lowered the objective. Negative when the
    /// batch pushed the bins further away from their targets.
    #[inline]
    pub fn improvement(&self) -> T {
        self.previous_objective - self.objective
    }

    /// Returns the number of values in the batch.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the search statistics.
    #[inline]
    pub fn statistics(&self) -> &SplitStatistics {
        &self.statistics
    }
}

impl<T> std::fmt::Display for AllocationOutcome<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AllocationOutcome(values: {}, objective: {} -> {}, merges: {})",
            self.batch_size, self.previous_objective, self.objective, self.statistics.merges
        )
    }
}
