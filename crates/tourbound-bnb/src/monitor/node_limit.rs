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
use std::marker::PhantomData;
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// A monitor that terminates the search once a node budget is spent.
///
/// The budget is compared against `BnbSolverStatistics::nodes_explored`, so
/// the root counts as the first node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLimitMonitor<T> {
    node_limit: u64,
    _marker: PhantomData<T>,
}

impl<T> NodeLimitMonitor<T> {
    /// Creates a new `NodeLimitMonitor` allowing `node_limit` nodes.
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self {
            node_limit,
            _marker: PhantomData,
        }
    }

    /// Returns the node budget.
    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl<T> TreeSearchMonitor<T> for NodeLimitMonitor<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _graph: &Graph<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if statistics.nodes_explored >= self.node_limit {
            SearchCommand::Terminate(format!("Node limit of {} reached", self.node_limit))
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
