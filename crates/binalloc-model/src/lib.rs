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


//! # Binalloc Model
//!
//! **The domain model shared by the greedy assigner and the split allocator.**
//!
//! A problem instance is a fixed collection of bins, each carrying a target
//! (its "bin value"), and batches of real numbers that must be distributed
//! across the bins so that an objective comparing every bin's total against
//! its target is as small as possible.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed wrappers (`BinIndex`, `ValueIndex`).
//! * **`bins`**: `BinState`, the targets, running totals and assigned values of all bins.
//! * **`objective`**: The `ObjectiveFunction` trait and the three reference metrics.
//! * **`allocation`**: `Allocation`, an owned snapshot of a finished assignment.
//! * **`error`**: `AllocationError`, the precondition and numeric failure taxonomy.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Bin indices and batch positions are distinct types.
//! 2.  **Fail-Fast**: Constructors reject empty, mismatched or non-finite input
//!     instead of letting NaN or an out-of-range index leak into the search.
//! 3.  **Value Semantics**: Cloning a `BinState` yields an independent snapshot,
//!     which is what lets sibling branches of the allocator diverge safely.

pub mod allocation;
pub mod bins;
pub mod error;
pub mod index;
pub mod objective;
