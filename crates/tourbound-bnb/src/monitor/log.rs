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
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use std::time::{Duration, Instant};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};
use tracing::{debug, info};

/// A monitor that reports search progress through `tracing`.
///
/// Emits an `info` event when the search starts, a progress line at most once
/// per `log_interval`, a `debug` event for every new incumbent and an `info`
/// summary at exit. The clock is only read when
/// `nodes_explored & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<T>,
}

impl<T> LogTreeSearchMonitor<T> {
    /// Creates a new `LogTreeSearchMonitor`.
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_cost: None,
        }
    }

    /// Returns the cost of the last incumbent reported to this monitor.
    #[inline]
    pub fn best_cost(&self) -> Option<&T> {
        self.best_cost.as_ref()
    }
}

impl<T> LogTreeSearchMonitor<T>
where
    T: CostNumeric,
{
    fn log_progress(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let best = match self.best_cost {
            Some(cost) => cost.to_string(),
            None => "Inf".to_string(),
        };

        info!(
            elapsed = %format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32()),
            nodes = stats.nodes_explored,
            depth = state.depth(),
            best = %best,
            current = %state.running_cost(),
            backtracks = stats.backtracks,
            pruned = stats.prunings_bound,
            "search progress"
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {:?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, graph: &Graph<T>, statistics: &BnbSolverStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = statistics.initial_upper_bound;

        info!(
            cities = graph.num_cities(),
            search_space = %graph.complexity(),
            "search started"
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        info!(
            nodes = statistics.nodes_explored,
            backtracks = statistics.backtracks,
            pruned = statistics.prunings_bound,
            solutions = statistics.solutions_found,
            elapsed = ?statistics.time_total,
            "search finished"
        );
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
        state: &SearchState<T>,
        _city: CityIndex,
        statistics: &BnbSolverStatistics<T>,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_progress(state, statistics);
        }
    }

    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_solution_found(&mut self, tour: &Tour<T>, statistics: &BnbSolverStatistics<T>) {
        self.best_cost = Some(tour.cost());
        debug!(
            cost = %tour.cost(),
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            "new incumbent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_tracks_best_cost() {
        let g = Graph::<IntegerType>::from_upper_triangle(2, &[4]).unwrap();
        let stats = BnbSolverStatistics::default();
        let mut m = LogTreeSearchMonitor::<IntegerType>::default();

        m.on_enter_search(&g, &stats);
        assert!(m.best_cost().is_none());

        let tour = Tour::new(8, vec![CityIndex::new(0), CityIndex::new(1), CityIndex::new(0)]);
        m.on_solution_found(&tour, &stats);
        assert_eq!(m.best_cost(), Some(&8));

        // A new search forgets the previous incumbent.
        m.on_enter_search(&g, &stats);
        assert!(m.best_cost().is_none());
        m.on_exit_search(&stats);
    }

    #[test]
    fn test_seeded_search_starts_from_initial_upper_bound() {
        let g = Graph::<IntegerType>::from_upper_triangle(2, &[4]).unwrap();
        let mut stats = BnbSolverStatistics::default();
        stats.set_initial_upper_bound(80);
        let mut m = LogTreeSearchMonitor::<IntegerType>::default();

        m.on_enter_search(&g, &stats);
        assert_eq!(m.best_cost(), Some(&80));
        m.on_exit_search(&stats);
    }

    #[test]
    fn test_progress_logging_does_not_disturb_state() {
        let g = Graph::<IntegerType>::from_upper_triangle(2, &[4]).unwrap();
        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(2);
        let mut m = LogTreeSearchMonitor::new(Duration::ZERO, 0);
        m.on_enter_search(&g, &stats);
        m.on_descend(&state, CityIndex::new(1), &stats);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_display() {
        let m = LogTreeSearchMonitor::<IntegerType>::new(Duration::from_secs(2), 1023);
        assert_eq!(
            format!("{}", m),
            "LogTreeSearchMonitor(log_interval: 2s, clock_check_mask: 1023)"
        );
    }
}
