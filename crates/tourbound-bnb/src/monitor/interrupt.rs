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
use std::sync::atomic::{AtomicBool, Ordering};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// A monitor that stops the search once a shared flag is raised.
///
/// The flag can be set from another thread (a signal handler, a UI) while
/// the search runs; it is read with relaxed ordering once per step.
#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    stop_flag: &'a AtomicBool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    /// Creates a new `InterruptMonitor` watching `stop_flag`.
    #[inline(always)]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self {
            stop_flag,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _graph: &Graph<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("Interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState<T>,
        _lower_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_candidates_enqueued(
        &mut self,
        _state: &SearchState<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _city: CityIndex,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_solution_found(&mut self, _tour: &Tour<T>, _statistics: &BnbSolverStatistics<T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_continues_when_flag_is_clear() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::<IntegerType>::new(&flag);
        let state = SearchState::new(3);
        let stats = BnbSolverStatistics::default();
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_when_flag_is_set() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::<IntegerType>::new(&flag);
        let state = SearchState::new(3);
        let stats = BnbSolverStatistics::default();

        flag.store(true, Ordering::Relaxed);

        match monitor.search_command(&state, &stats) {
            SearchCommand::Terminate(reason) => assert_eq!(reason, "Interrupt signal received"),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }
}
