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
use std::time::{Duration, Instant};
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// A monitor that terminates the search after a wall-clock duration.
///
/// Checks the clock only every `check_interval` steps to keep overhead low;
/// the limit may therefore be overshot by up to that many steps.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor<T> {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Creates a new `TimeLimitMonitor` with the given duration, checking the
    /// clock every `check_interval` steps.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new `TimeLimitMonitor` checking the clock every 10,000 steps.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 10_000)
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _graph: &Graph<T>, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);
        if self.ops_since_last_check < self.check_interval {
            return SearchCommand::Continue;
        }
        self.ops_since_last_check = 0;

        match self.start_time {
            Some(start) if start.elapsed() > self.time_limit => SearchCommand::Terminate(format!(
                "Time limit of {:.3} seconds exceeded",
                self.time_limit.as_secs_f64()
            )),
            _ => SearchCommand::Continue,
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

    fn setup() -> (Graph<IntegerType>, SearchState<IntegerType>, BnbSolverStatistics<IntegerType>) {
        (
            Graph::from_upper_triangle(2, &[1]).unwrap(),
            SearchState::new(2),
            BnbSolverStatistics::default(),
        )
    }

    #[test]
    fn test_zero_limit_terminates_at_first_check() {
        let (g, state, stats) = setup();
        let mut m = TimeLimitMonitor::<IntegerType>::new(Duration::ZERO, 2);
        m.on_enter_search(&g, &stats);
        std::thread::sleep(Duration::from_millis(2));

        // First call is between checks.
        assert_eq!(m.search_command(&state, &stats), SearchCommand::Continue);
        assert!(matches!(
            m.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_limit_continues() {
        let (g, state, stats) = setup();
        let mut m = TimeLimitMonitor::<IntegerType>::new(Duration::from_secs(3600), 1);
        m.on_enter_search(&g, &stats);
        for _ in 0..10 {
            assert_eq!(m.search_command(&state, &stats), SearchCommand::Continue);
        }
    }

    #[test]
    fn test_not_started_never_terminates() {
        let (_g, state, stats) = setup();
        let mut m = TimeLimitMonitor::<IntegerType>::with_default_check_interval(Duration::ZERO);
        for _ in 0..20_000 {
            assert_eq!(m.search_command(&state, &stats), SearchCommand::Continue);
        }
    }
}
