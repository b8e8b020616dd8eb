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

use crate::{
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// A monitor that ignores every event and always returns `Continue`.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOperationMonitor<T> {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> TreeSearchMonitor<T> for NoOperationMonitor<T>
where
    T: CostNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _graph: &Graph<T>, _statistics: &BnbSolverStatistics<T>) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    #[inline(always)]
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics<T>) {}

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_candidates_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _city: CityIndex,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics<T>) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _tour: &Tour<T>, _statistics: &BnbSolverStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_continues() {
        let mut m = NoOperationMonitor::<i64>::new();
        let state = SearchState::<i64>::new(3);
        let stats = BnbSolverStatistics::default();
        assert_eq!(m.name(), "NoOperationMonitor");
        assert_eq!(m.search_command(&state, &stats), SearchCommand::Continue);
    }
}
