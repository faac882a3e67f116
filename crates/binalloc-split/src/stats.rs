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


use std::time::Duration;

/// Counters describing one split/recombine run.
///
/// Statistics of sibling branches are merged into their parent, so the
/// statistics of a finished run cover the whole recursion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SplitStatistics {
    /// Number of values in the batch.
    pub values_assigned: u64,
    /// Single-value partitions solved directly by the greedy assigner.
    pub leaves: u64,
    /// Partitions whose two halves were compared and recombined.
    pub merges: u64,
    /// Merges kept by the left half (strictly lower objective).
    pub left_wins: u64,
    /// Merges kept by the right half (lower or equal objective).
    pub right_wins: u64,
    /// Values of discarded halves placed again by the greedy assigner.
    pub reassigned_values: u64,
    /// Bin state snapshots taken before diverging recursion.
    pub snapshots: u64,
    /// Deepest recursion level reached; the whole batch is level 0.
    pub max_depth: u64,
    /// Wall clock time of the run.
    pub time_total: Duration,
}

impl SplitStatistics {
    #[inline]
    pub fn on_leaf(&mut self, depth: u64) {
        self.leaves = self.leaves.saturating_add(1);
        self.on_depth_update(depth);
    }

    #[inline]
    pub fn on_merge(&mut self, left_won: bool, reassigned: usize) {
        self.merges = self.merges.saturating_add(1);
        if left_won {
            self.left_wins = self.left_wins.saturating_add(1);
        } else {
            self.right_wins = self.right_wins.saturating_add(1);
        }
        self.reassigned_values = self.reassigned_values.saturating_add(reassigned as u64);
    }

    #[inline]
    pub fn on_snapshot(&mut self) {
        self.snapshots = self.snapshots.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Adds the counters of a sibling branch to this one.
    pub fn absorb(&mut self, other: &SplitStatistics) {
        self.values_assigned = self.values_assigned.saturating_add(other.values_assigned);
        self.leaves = self.leaves.saturating_add(other.leaves);
        self.merges = self.merges.saturating_add(other.merges);
        self.left_wins = self.left_wins.saturating_add(other.left_wins);
        self.right_wins = self.right_wins.saturating_add(other.right_wins);
        self.reassigned_values = self.reassigned_values.saturating_add(other.reassigned_values);
        self.snapshots = self.snapshots.saturating_add(other.snapshots);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_total = self.time_total.saturating_add(other.time_total);
    }

    /// Total number of greedy placements, leaves plus re-assignments.
    #[inline]
    pub fn greedy_placements(&self) -> u64 {
        self.leaves.saturating_add(self.reassigned_values)
    }
}

impl std::fmt::Display for SplitStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Binalloc-Split Statistics:")?;
        writeln!(f, "   Values Assigned:     {}", self.values_assigned)?;
        writeln!(f, "   Leaves:              {}", self.leaves)?;
        writeln!(f, "   Merges:              {}", self.merges)?;
        writeln!(f, "   Left Wins:           {}", self.left_wins)?;
        writeln!(f, "   Right Wins:          {}", self.right_wins)?;
        writeln!(f, "   Reassigned Values:   {}", self.reassigned_values)?;
        writeln!(f, "   Snapshots:           {}", self.snapshots)?;
        writeln!(f, "   Max Depth:           {}", self.max_depth)?;
        writeln!(f, "   Total Time:          {:?}", self.time_total)?;
        Ok(())
    }
}
