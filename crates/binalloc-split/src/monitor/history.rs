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


use crate::{monitor::allocation_monitor::AllocationMonitor, result::AllocationOutcome};
use binalloc_core::num::AllocNumeric;
use binalloc_model::{bins::BinState, error::AllocationError};

/// Objective trajectory of one committed batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry<T> {
    pub batch_size: usize,
    pub previous_objective: T,
    pub objective: T,
    pub num_values: usize,
}

/// Records the objective after every committed batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryMonitor<T> {
    entries: Vec<HistoryEntry<T>>,
    failures: usize,
}

impl<T> HistoryMonitor<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            failures: 0,
        }
    }

    #[inline]
    pub fn entries(&self) -> &[HistoryEntry<T>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of batches that were rejected.
    #[inline]
    pub fn failures(&self) -> usize {
        self.failures
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.failures = 0;
    }
}

impl<T> AllocationMonitor<T> for HistoryMonitor<T>
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        "HistoryMonitor"
    }

    fn on_enter_allocation(&mut self, _state: &BinState<T>, _values: &[T]) {}

    fn on_exit_allocation(&mut self, state: &BinState<T>, outcome: &AllocationOutcome<T>) {
        self.entries.push(HistoryEntry {
            batch_size: outcome.batch_size(),
            previous_objective: outcome.previous_objective(),
            objective: outcome.objective(),
            num_values: state.num_values(),
        });
    }

    fn on_allocation_failed(&mut self, _error: &AllocationError) {
        self.failures += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SplitStatistics;

    #[test]
    fn test_records_batches_and_failures() {
        let mut history = HistoryMonitor::<f64>::new();
        let mut state = BinState::new(vec![3.0f64, 4.0]).unwrap();
        state.place(binalloc_model::index::BinIndex::new(0), 3.0);

        let outcome = AllocationOutcome::new(1.0, 7.0, 1, SplitStatistics::default());
        history.on_exit_allocation(&state, &outcome);
        history.on_allocation_failed(&AllocationError::EmptyBatch);

        assert_eq!(history.len(), 1);
        assert_eq!(history.failures(), 1);
        assert_eq!(
            history.entries()[0],
            HistoryEntry {
                batch_size: 1,
                previous_objective: 7.0,
                objective: 1.0,
                num_values: 1,
            }
        );

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.failures(), 0);
    }
}
