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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, `SearchCommand` and `PruneReason`
//! for observing and controlling the tour search. Callbacks track the solver
//! lifecycle, and a monitor can stop the run through `search_command`
//! (default: Continue), which the engine consults once per step.
//!
//! Lifecycle highlights
//! - enter → step → {lower bound/prune | candidates/descend/backtrack} → solution → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Design notes
//! - Methods take `&mut self`; monitors are single-threaded.
//! - Keep callbacks lightweight; they run inside the search loop.

use crate::{state::SearchState, stats::BnbSolverStatistics};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// What the search should do next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    /// Keep searching.
    #[default]
    Continue,
    /// Stop the search. The string says why.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Reasons for discarding part of the search tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// A child's lower bound reached the incumbent cost.
    BoundDominated,
    /// A complete tour was not strictly cheaper than the incumbent.
    TourNotImproving,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::TourNotImproving => write!(f, "TourNotImproving"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: CostNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, graph: &Graph<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>);
    /// Called to determine the next action of the search.
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called at each step of the search.
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when a candidate child has been priced. `state` is the child
    /// state, `lower_bound` its bound and `estimated_remaining` the part of
    /// the bound beyond the running cost.
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when part of the tree is discarded.
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when the children of the current node are enqueued.
    fn on_candidates_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called after `city` has been committed to the path.
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        city: CityIndex,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when stepping back to the parent node.
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when a new incumbent tour is installed.
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>);
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: CostNumeric,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, graph: &Graph<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_enter_search(graph, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_step(state, statistics)
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics)
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_prune(state, reason, statistics)
    }

    #[inline(always)]
    fn on_candidates_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_candidates_enqueued(state, count, statistics)
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        city: CityIndex,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_descend(state, city, statistics)
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_backtrack(state, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_solution_found(tour, statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_default_and_display() {
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
        assert_eq!(format!("{}", SearchCommand::Continue), "Continue");
        assert_eq!(
            format!("{}", SearchCommand::Terminate("stop".into())),
            "Terminate: stop"
        );
    }

    #[test]
    fn test_prune_reason_display() {
        assert_eq!(format!("{}", PruneReason::BoundDominated), "BoundDominated");
        assert_eq!(format!("{}", PruneReason::TourNotImproving), "TourNotImproving");
    }
}
