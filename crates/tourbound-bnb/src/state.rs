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

//! Search state for the tour search.
//!
//! `SearchState` is the single mutable picture of the partial tour the engine
//! is standing on:
//! - `visited`: which cities are already on the path (always contains the origin),
//! - `path`: the visiting order so far, origin first,
//! - `running_cost`: the exact cost of the edges along `path`.
//!
//! Invariants (debug-checked):
//! - `visited.count_ones(..) == path.len()`
//! - `running_cost` equals the summed edge costs of `path`.
//!
//! Mutation happens in two disciplined ways. Committed moves go through the
//! `SearchTrail`, which records the old cost and undoes the move on backtrack.
//! Tentative moves used to price a candidate go through `trial_visit`, whose
//! guard undoes the move when it is dropped, on every exit path.

use fixedbitset::FixedBitSet;
use num_traits::Zero;
use std::ops::Deref;
use tourbound_model::{graph::Graph, index::CityIndex, num::CostNumeric, tour::Tour};

/// The mutable state of the depth-first tour search.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    visited: FixedBitSet,
    path: Vec<CityIndex>,
    running_cost: T,
    num_cities: usize,
}

impl<T> SearchState<T>
where
    T: Copy + Zero,
{
    /// Creates the root state over `num_cities` cities: only the origin is
    /// visited and the running cost is zero.
    ///
    /// # Panics
    ///
    /// Panics if `num_cities` is zero.
    #[inline]
    pub fn new(num_cities: usize) -> Self {
        assert!(
            num_cities > 0,
            "called `SearchState::new` with zero cities"
        );

        let mut visited = FixedBitSet::with_capacity(num_cities);
        visited.insert(CityIndex::ORIGIN.get());
        let mut path = Vec::with_capacity(num_cities + 1);
        path.push(CityIndex::ORIGIN);

        Self {
            visited,
            path,
            running_cost: T::zero(),
            num_cities,
        }
    }

    /// Restores the root state without releasing memory.
    #[inline]
    pub fn reset(&mut self) {
        self.visited.clear();
        self.visited.insert(CityIndex::ORIGIN.get());
        self.path.clear();
        self.path.push(CityIndex::ORIGIN);
        self.running_cost = T::zero();
    }
}

impl<T> SearchState<T>
where
    T: Copy,
{
    /// Returns the number of cities in the instance.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.num_cities
    }

    /// Returns the number of cities on the path, origin included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the number of cities not yet on the path.
    #[inline]
    pub fn num_unvisited(&self) -> usize {
        self.num_cities - self.path.len()
    }

    /// Returns `true` if every city is on the path and only the closing edge
    /// back to the origin is missing.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.num_cities
    }

    /// Returns the last city on the path.
    #[inline]
    pub fn current_city(&self) -> CityIndex {
        debug_assert!(!self.path.is_empty(), "search path lost its origin");
        self.path.last().copied().unwrap_or(CityIndex::ORIGIN)
    }

    /// Returns the cost of the edges along the path.
    #[inline]
    pub fn running_cost(&self) -> T {
        self.running_cost
    }

    /// Returns the visiting order so far, origin first.
    #[inline]
    pub fn path(&self) -> &[CityIndex] {
        &self.path
    }

    /// Returns the set of visited cities.
    #[inline]
    pub fn visited(&self) -> &FixedBitSet {
        &self.visited
    }

    /// Returns `true` if `city` is on the path.
    ///
    /// # Panics
    ///
    /// Panics if `city` is out of `0..num_cities`.
    #[inline]
    pub fn is_visited(&self, city: CityIndex) -> bool {
        let index = city.get();
        assert!(
            index < self.num_cities,
            "called `SearchState::is_visited` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            index
        );

        self.visited.contains(index)
    }

    /// Returns `true` if `city` is on the path, without bounds checking.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of `0..num_cities`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `city` is within `0..num_cities`.
    #[inline]
    pub unsafe fn is_visited_unchecked(&self, city: CityIndex) -> bool {
        let index = city.get();
        debug_assert!(
            index < self.num_cities,
            "called `SearchState::is_visited_unchecked` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            index
        );

        unsafe { self.visited.contains_unchecked(index) }
    }

    /// Returns an iterator over the cities not yet on the path, ascending.
    #[inline]
    pub fn unvisited(&self) -> impl Iterator<Item = CityIndex> + '_ {
        self.visited.zeroes().map(CityIndex::new)
    }

    /// Appends `city` to the path and sets the running cost to `new_cost`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of bounds or already visited.
    #[inline]
    pub(crate) fn push_city(&mut self, city: CityIndex, new_cost: T) {
        let index = city.get();
        debug_assert!(
            index < self.num_cities,
            "called `SearchState::push_city` with city index out of bounds: the len is {} but the index is {}",
            self.num_cities,
            index
        );
        debug_assert!(
            !self.visited.contains(index),
            "called `SearchState::push_city` with city {} which is already visited",
            index
        );

        self.visited.insert(index);
        self.path.push(city);
        self.running_cost = new_cost;
    }

    /// Removes the last city from the path and restores the running cost to
    /// `old_cost`. Returns the removed city.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if only the origin is left on the path.
    #[inline]
    pub(crate) fn pop_city(&mut self, old_cost: T) -> CityIndex {
        debug_assert!(
            self.path.len() > 1,
            "called `SearchState::pop_city` on the root state"
        );

        let city = self.path.pop().unwrap_or(CityIndex::ORIGIN);
        self.visited.set(city.get(), false);
        self.running_cost = old_cost;
        city
    }
}

impl<T> SearchState<T>
where
    T: CostNumeric,
{
    /// Tentatively appends `city` to the path so that the resulting state can
    /// be inspected, typically to compute its lower bound.
    ///
    /// The returned guard dereferences to the extended state and removes
    /// `city` again when dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tourbound_bnb::state::SearchState;
    /// # use tourbound_model::{graph::Graph, index::CityIndex};
    /// let graph = Graph::from_upper_triangle(3, &[4i64, 1, 7]).unwrap();
    /// let mut state = SearchState::<i64>::new(3);
    /// {
    ///     let trial = state.trial_visit(&graph, CityIndex::new(2));
    ///     assert_eq!(trial.running_cost(), 1);
    ///     assert_eq!(trial.depth(), 2);
    /// }
    /// assert_eq!(state.running_cost(), 0);
    /// assert_eq!(state.depth(), 1);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `city` is out of bounds for `graph`. In debug builds, panics
    /// if `city` is already visited.
    #[inline]
    pub fn trial_visit<'s>(&'s mut self, graph: &Graph<T>, city: CityIndex) -> TrialVisit<'s, T> {
        let old_cost = self.running_cost;
        let new_cost = old_cost.saturating_add(graph.cost(self.current_city(), city));
        self.push_city(city, new_cost);
        TrialVisit {
            state: self,
            old_cost,
        }
    }

    /// Returns the cost of closing the path back to the origin.
    #[inline]
    pub fn closing_cost(&self, graph: &Graph<T>) -> T {
        self.running_cost
            .saturating_add(graph.cost(self.current_city(), CityIndex::ORIGIN))
    }

    /// Builds the closed tour for the current (complete) path at `cost`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the path does not cover every city.
    #[inline]
    pub fn to_closed_tour(&self, cost: T) -> Tour<T> {
        debug_assert!(
            self.is_complete(),
            "called `SearchState::to_closed_tour` on a partial path of {} of {} cities",
            self.path.len(),
            self.num_cities
        );

        let mut cities = Vec::with_capacity(self.path.len() + 1);
        cities.extend_from_slice(&self.path);
        cities.push(CityIndex::ORIGIN);
        Tour::new(cost, cities)
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchState(path: [")?;
        for (i, city) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", city.get())?;
        }
        write!(
            f,
            "], cost: {}, visited: {}/{})",
            self.running_cost,
            self.path.len(),
            self.num_cities
        )
    }
}

/// Scope guard returned by `SearchState::trial_visit`.
///
/// Dereferences to the extended state. Dropping the guard removes the trial
/// city and restores the previous running cost.
#[derive(Debug)]
pub struct TrialVisit<'s, T>
where
    T: Copy,
{
    state: &'s mut SearchState<T>,
    old_cost: T,
}

impl<'s, T> Deref for TrialVisit<'s, T>
where
    T: Copy,
{
    type Target = SearchState<T>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<'s, T> Drop for TrialVisit<'s, T>
where
    T: Copy,
{
    #[inline(always)]
    fn drop(&mut self) {
        self.state.pop_city(self.old_cost);
    }
}
