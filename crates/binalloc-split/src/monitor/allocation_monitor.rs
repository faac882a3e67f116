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


use crate::result::AllocationOutcome;
use binalloc_core::num::AllocNumeric;
use binalloc_model::{bins::BinState, error::AllocationError};

/// Trait for observing the batches processed by an `Allocator`.
pub trait AllocationMonitor<T>
where
    T: AllocNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called before a batch is split, with the state it starts from.
    fn on_enter_allocation(&mut self, state: &BinState<T>, values: &[T]);

    /// Called after a batch was committed, with the resulting state.
    fn on_exit_allocation(&mut self, state: &BinState<T>, outcome: &AllocationOutcome<T>);

    /// Called when a batch was rejected; the allocator state is unchanged.
    fn on_allocation_failed(&mut self, _error: &AllocationError) {}
}

impl<T> std::fmt::Debug for dyn AllocationMonitor<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn AllocationMonitor<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationMonitor({})", self.name())
    }
}
