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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children, so logging and stop conditions can be combined
//! without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// A tree search monitor that forwards events to a list of monitors.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity`
    /// monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds an already boxed monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the contained monitors.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    /// Returns the number of contained monitors.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if no monitor was added.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> std::fmt::Debug for CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: CostNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, graph: &Graph<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(graph, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command(state, statistics) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_step(state, statistics);
        }
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(state, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_candidates_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_candidates_enqueued(state, count, statistics);
        }
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        city: CityIndex,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_descend(state, city, statistics);
        }
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_backtrack(state, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(tour, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{node_limit::NodeLimitMonitor, no_op::NoOperationMonitor};

    type IntegerType = i64;

    /// Records which callbacks fired.
    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
        stop: bool,
    }

    impl TreeSearchMonitor<IntegerType> for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }
        fn on_enter_search(&mut self, _g: &Graph<IntegerType>, _s: &BnbSolverStatistics<IntegerType>) {
            self.events.push("enter");
        }
        fn on_exit_search(&mut self, _s: &BnbSolverStatistics<IntegerType>) {
            self.events.push("exit");
        }
        fn search_command(
            &mut self,
            _state: &SearchState<IntegerType>,
            _s: &BnbSolverStatistics<IntegerType>,
        ) -> SearchCommand {
            self.events.push("command");
            if self.stop {
                SearchCommand::Terminate("recorder".into())
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _state: &SearchState<IntegerType>, _s: &BnbSolverStatistics<IntegerType>) {
            self.events.push("step");
        }
        fn on_lower_bound_computed(
            &mut self,
            _state: &SearchState<IntegerType>,
            _lb: IntegerType,
            _rem: IntegerType,
            _s: &BnbSolverStatistics<IntegerType>,
        ) {
            self.events.push("bound");
        }
        fn on_prune(
            &mut self,
            _state: &SearchState<IntegerType>,
            _r: PruneReason,
            _s: &BnbSolverStatistics<IntegerType>,
        ) {
            self.events.push("prune");
        }
        fn on_candidates_enqueued(
            &mut self,
            _state: &SearchState<IntegerType>,
            _count: usize,
            _s: &BnbSolverStatistics<IntegerType>,
        ) {
            self.events.push("enqueued");
        }
        fn on_descend(
            &mut self,
            _state: &SearchState<IntegerType>,
            _city: CityIndex,
            _s: &BnbSolverStatistics<IntegerType>,
        ) {
            self.events.push("descend");
        }
        fn on_backtrack(&mut self, _state: &SearchState<IntegerType>, _s: &BnbSolverStatistics<IntegerType>) {
            self.events.push("backtrack");
        }
        fn on_solution_found(&mut self, _t: &Tour<IntegerType>, _s: &BnbSolverStatistics<IntegerType>) {
            self.events.push("solution");
        }
    }

    #[test]
    fn test_fans_out_to_all_children_in_order() {
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        {
            let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
            composite.add_monitor(&mut first);
            composite.add_monitor(&mut second);
            assert_eq!(composite.len(), 2);

            let g = Graph::<IntegerType>::from_upper_triangle(2, &[3]).unwrap();
            let state = SearchState::new(2);
            let stats = BnbSolverStatistics::default();
            composite.on_enter_search(&g, &stats);
            composite.on_step(&state, &stats);
            composite.on_descend(&state, CityIndex::new(1), &stats);
            composite.on_exit_search(&stats);
        }
        assert_eq!(first.events, vec!["enter", "step", "descend", "exit"]);
        assert_eq!(second.events, first.events);
    }

    #[test]
    fn test_search_command_short_circuits() {
        let mut stopper = Recorder {
            stop: true,
            ..Default::default()
        };
        let mut after = Recorder::default();
        {
            let mut composite = CompositeTreeSearchMonitor::new();
            composite.add_monitor(&mut stopper);
            composite.add_monitor(&mut after);

            let state = SearchState::new(3);
            let stats = BnbSolverStatistics::default();
            assert_eq!(
                composite.search_command(&state, &stats),
                SearchCommand::Terminate("recorder".into())
            );
        }
        assert_eq!(stopper.events, vec!["command"]);
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_from_iter_and_debug() {
        let composite: CompositeTreeSearchMonitor<'_, IntegerType> = vec![
            Box::new(NoOperationMonitor::new()) as Box<dyn TreeSearchMonitor<IntegerType>>,
            Box::new(NodeLimitMonitor::new(10)),
        ]
        .into_iter()
        .collect();
        assert!(!composite.is_empty());
        assert_eq!(
            format!("{:?}", composite),
            "[\"NoOperationMonitor\", \"NodeLimitMonitor\"]"
        );
        assert_eq!(composite.monitors()[1].name(), "NodeLimitMonitor");
    }
}
