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


//! Binalloc-Split: divide-and-conquer bin allocation
//!
//! High-level crate that distributes a batch of values across a fixed set of
//! target-carrying bins. The `Allocator` halves the batch recursively, solves
//! both halves against independent snapshots of the bin state, keeps the
//! half whose result scores better and greedily re-assigns the values of the
//! other half into it.
//!
//! Core flow
//! - Provide targets and an `ObjectiveFunction` through `AllocatorBuilder`.
//! - Call `Allocator::assign_values` with a batch, as often as needed.
//! - Read totals, value lists and the aggregate objective from the allocator,
//!   or take an `Allocation` snapshot.
//!
//! Design highlights
//! - Sibling branches never share mutable state; each owns its snapshot.
//! - Deterministic: identical inputs give identical assignments, also with
//!   the optional `parallel` feature, which evaluates sibling branches with
//!   `rayon::join`.
//! - A batch is applied atomically: on error the allocator is unchanged.
//!
//! Module map
//! - `allocator`: the allocator, its builder and configuration.
//! - `monitor`: observers of allocation runs (log, history, composite).
//! - `result`: the outcome of a batch.
//! - `stats`: counters of the split/recombine search.
//! - `exhaustive`: brute-force optimum for small instances.

pub mod allocator;
pub mod exhaustive;
pub mod monitor;
pub mod result;
pub mod stats;
