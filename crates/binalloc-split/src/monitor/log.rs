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


//! Progress reporting through the `log` facade.
//!
//! `LogMonitor` writes one line when a batch starts and one when it is
//! committed, at a configurable level. Nothing is printed unless the host
//! application installs a logger.

use crate::{monitor::allocation_monitor::AllocationMonitor, result::AllocationOutcome};
use binalloc_core::num::AllocNumeric;
use binalloc_model::{bins::BinState, error::AllocationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogMonitor {
    level: log::Level,
    batches: u64,
}

impl LogMonitor {
    /// Creates a monitor logging at `level`.
    #[inline]
    pub fn new(level: log::Level) -> Self {
        Self { level, batches: 0 }
    }

    /// Returns the level this monitor logs at.
    #[inline]
    pub fn level(&self) -> log::Level {
        self.level
    }

    /// Returns the number of committed batches seen so far.
    #[inline]
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(level: {})", self.level)
    }
}

impl<T> AllocationMonitor<T> for LogMonitor
where
    T: AllocNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_allocation(&mut self, state: &BinState<T>, values: &[T]) {
        log::log!(
            self.level,
            "{:<24}{} values into {} bins ({} already placed)",
            "allocating",
            values.len(),
            state.num_bins(),
            state.num_values()
        );
    }

    fn on_exit_allocation(&mut self, _state: &BinState<T>, outcome: &AllocationOutcome<T>) {
        self.batches = self.batches.saturating_add(1);
        let stats = outcome.statistics();
        log::log!(
            self.level,
            "{:<24}objective {} -> {} | merges {} (left {}, right {}) | reassigned {} | depth {} | {:.3?}",
            format!("batch {}", self.batches),
            outcome.previous_objective(),
            outcome.objective(),
            stats.merges,
            stats.left_wins,
            stats.right_wins,
            stats.reassigned_values,
            stats.max_depth,
            stats.time_total
        );
    }

    fn on_allocation_failed(&mut self, error: &AllocationError) {
        log::warn!("{:<24}{}", "batch rejected", error);
    }
}
