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


use crate::{bins::BinState, index::BinIndex};
use binalloc_core::num::AllocNumeric;

/// An owned snapshot of a finished assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation<T> {
    /// The aggregate objective of this allocation.
    objective_value: T,

    /// `targets[b]` is the target of bin `b`.
    targets: Vec<T>,

    /// `totals[b]` is the sum of the values in bin `b`.
    totals: Vec<T>,

    /// `bins[b]` lists the values assigned to bin `b`, in insertion order.
    bins: Vec<Vec<T>>,
}

impl<T> Allocation<T>
where
    T: AllocNumeric,
{
    /// Constructs a new `Allocation`.
    ///
    /// # Panics
    ///
    /// Panics if `targets`, `totals` and `bins` have different lengths.
    pub fn new(objective_value: T, targets: Vec<T>, totals: Vec<T>, bins: Vec<Vec<T>>) -> Self {
        assert!(
            targets.len() == totals.len() && targets.len() == bins.len(),
            "called Allocation::new with inconsistent vector lengths: targets.len() = {}, totals.len() = {}, bins.len() = {}",
            targets.len(),
            totals.len(),
            bins.len()
        );

        Self {
            objective_value,
            targets,
            totals,
            bins,
        }
    }

    /// Captures the current contents of `state` together with its objective.
    pub fn from_state(state: &BinState<T>, objective_value: T) -> Self {
        Self {
            objective_value,
            targets: state.targets().to_vec(),
            totals: state.totals().to_vec(),
            bins: state.to_vecs(),
        }
    }

    /// Returns the aggregate objective value.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    /// Returns the number of bins.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.targets.len()
    }

    /// Returns the total number of assigned values.
    #[inline]
    pub fn num_values(&self) -> usize {
        self.bins.iter().map(Vec::len).sum()
    }

    /// Returns the targets of all bins.
    #[inline]
    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Returns the totals of all bins.
    #[inline]
    pub fn totals(&self) -> &[T] {
        &self.totals
    }

    /// Returns the value lists of all bins.
    #[inline]
    pub fn bins(&self) -> &[Vec<T>] {
        &self.bins
    }

    /// Returns the values assigned to a bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is out of bounds.
    #[inline]
    pub fn values_in(&self, bin: BinIndex) -> &[T] {
        let index = bin.get();
        debug_assert!(
            index < self.num_bins(),
            "called `Allocation::values_in` with bin index out of bounds: the len is {} but the index is {}",
            self.num_bins(),
            index
        );

        &self.bins[index]
    }

    /// Returns all assigned values, bin by bin.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.bins.iter().flat_map(|b| b.iter().copied())
    }
}

struct ValueList<'a, T>(&'a [T]);

impl<'a, T> std::fmt::Display for ValueList<'a, T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

impl<T> std::fmt::Display for Allocation<T>
where
    T: AllocNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Allocation Summary")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        writeln!(f)?;

        writeln!(
            f,
            "   {:<10} | {:<10} | {:<10} | {}",
            "Bin", "Target", "Total", "Values"
        )?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<10}-+-{:-<12}", "", "", "", "")?;
        for i in 0..self.num_bins() {
            let target = format!("{}", self.targets[i]);
            let total = format!("{}", self.totals[i]);
            writeln!(
                f,
                "   {:<10} | {:<10} | {:<10} | {}",
                i,
                target,
                total,
                ValueList(&self.bins[i])
            )?;
        }

        Ok(())
    }
}
