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

use num_traits::Zero;
use std::time::Duration;

/// Statistics collected during one run of the tour search.
///
/// Owned by the search session; every run starts from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics<T> {
    /// Total nodes visited, the root included.
    pub nodes_explored: u64,
    /// Total times the search stepped back up one level.
    pub backtracks: u64,
    /// Total children priced with the lower bound.
    pub candidates_generated: u64,
    /// Children and complete tours discarded against the incumbent.
    pub prunings_bound: u64,
    /// Total improving tours found.
    pub solutions_found: u64,
    /// The deepest path length reached (cities on the path).
    pub max_depth: u64,
    /// Total search loop iterations.
    pub steps: u64,
    /// The lower bound of the root state.
    pub root_lower_bound: T,
    /// The cost of the tour the incumbent was seeded with, if any.
    pub initial_upper_bound: Option<T>,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl<T> Default for BnbSolverStatistics<T>
where
    T: Zero,
{
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            backtracks: 0,
            candidates_generated: 0,
            prunings_bound: 0,
            solutions_found: 0,
            max_depth: 0,
            steps: 0,
            root_lower_bound: T::zero(),
            initial_upper_bound: None,
            time_total: Duration::ZERO,
        }
    }
}

impl<T> BnbSolverStatistics<T> {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_candidate_generated(&mut self) {
        self.candidates_generated = self.candidates_generated.saturating_add(1);
    }

    /// Records a branch or tour discarded because it cannot beat the incumbent.
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: T) {
        self.root_lower_bound = bound;
    }

    #[inline]
    pub fn set_initial_upper_bound(&mut self, bound: T) {
        self.initial_upper_bound = Some(bound);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl<T> std::fmt::Display for BnbSolverStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tourbound-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Candidates generated: {}", self.candidates_generated)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Steps:                {}", self.steps)?;
        writeln!(f, "  Root lower bound:     {}", self.root_lower_bound)?;
        if let Some(bound) = &self.initial_upper_bound {
            writeln!(f, "  Initial upper bound:  {}", bound)?;
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let s = BnbSolverStatistics::<i64>::default();
        assert_eq!(s.nodes_explored, 0);
        assert_eq!(s.root_lower_bound, 0);
        assert_eq!(s.initial_upper_bound, None);
        assert_eq!(s.time_total, Duration::ZERO);
    }

    #[test]
    fn test_counters() {
        let mut s = BnbSolverStatistics::<i64>::default();
        s.on_node_explored();
        s.on_node_explored();
        s.on_backtrack();
        s.on_candidate_generated();
        s.on_pruning_bound();
        s.on_solution_found();
        s.on_step();
        s.on_depth_update(3);
        s.on_depth_update(2);
        s.set_root_lower_bound(45);

        assert_eq!(s.nodes_explored, 2);
        assert_eq!(s.backtracks, 1);
        assert_eq!(s.candidates_generated, 1);
        assert_eq!(s.prunings_bound, 1);
        assert_eq!(s.solutions_found, 1);
        assert_eq!(s.steps, 1);
        assert_eq!(s.max_depth, 3);
        assert_eq!(s.root_lower_bound, 45);
    }

    #[test]
    fn test_counters_saturate() {
        let mut s = BnbSolverStatistics::<i64> {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        s.on_node_explored();
        assert_eq!(s.nodes_explored, u64::MAX);
    }

    #[test]
    fn test_display_lists_counters() {
        let s = BnbSolverStatistics::<i64> {
            nodes_explored: 12,
            root_lower_bound: 45,
            ..Default::default()
        };
        let out = format!("{}", s);
        assert!(out.starts_with("Tourbound-BnB Solver Statistics:\n"));
        assert!(out.contains("  Nodes explored:       12\n"));
        assert!(out.contains("  Root lower bound:     45\n"));
        assert!(!out.contains("Initial upper bound"));
    }

    #[test]
    fn test_display_shows_seeded_upper_bound() {
        let mut s = BnbSolverStatistics::<i64>::default();
        s.set_initial_upper_bound(80);
        assert_eq!(s.initial_upper_bound, Some(80));
        assert!(format!("{}", s).contains("  Initial upper bound:  80\n"));
    }
}
