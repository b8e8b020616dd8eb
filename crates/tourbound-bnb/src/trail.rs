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

use crate::state::SearchState;
use tourbound_model::index::CityIndex;

/// A record of one committed visit, sufficient to undo it.
///
/// Stores the city that was appended to the path and the running cost before
/// it was appended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    old_cost: T,
    city: CityIndex,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the running cost before the visit.
    #[inline]
    pub fn old_cost(&self) -> T {
        self.old_cost
    }

    /// Returns the visited city.
    #[inline]
    pub fn city(&self) -> CityIndex {
        self.city
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(city: {}, old_cost: {})",
            self.city.get(),
            self.old_cost
        )
    }
}

/// A linear undo log with frame markers for backtracking.
///
/// Usage during search:
/// 1. `push_frame()` before committing a city at a new depth,
/// 2. `apply_visit(...)` to commit it,
/// 3. `backtrack(state)` to undo everything since the last frame.
///
/// `frames[i]` stores the index in `entries` where depth `i` began.
#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    frames: Vec<usize>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    /// Creates a new, empty `SearchTrail`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a new `SearchTrail` with room for a path over `num_cities`.
    #[inline]
    pub fn preallocated(num_cities: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_cities),
            frames: Vec::with_capacity(num_cities + 1),
        }
    }

    /// Grows the capacities to fit a path over `num_cities` if needed.
    pub fn ensure_capacity(&mut self, num_cities: usize) {
        if self.entries.capacity() < num_cities {
            self.entries.reserve(num_cities - self.entries.len());
        }
        if self.frames.capacity() < num_cities + 1 {
            self.frames.reserve((num_cities + 1) - self.frames.len());
        }
    }

    /// Returns the number of entries in the trail.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of frames (depth) in the trail.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if there are no frames tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Commits `city` to `state` at running cost `new_cost` and records how to
    /// undo it.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `city` is out of bounds or already visited.
    #[inline]
    pub fn apply_visit(&mut self, state: &mut SearchState<T>, city: CityIndex, new_cost: T)
    where
        T: Copy,
    {
        self.entries.push(TrailEntry {
            old_cost: state.running_cost(),
            city,
        });
        state.push_city(city, new_cost);
    }

    /// Pops the current frame, undoing all visits made since it was pushed.
    pub fn backtrack(&mut self, state: &mut SearchState<T>)
    where
        T: Copy,
    {
        let start = match self.frames.pop() {
            Some(start) => start,
            None => return,
        };

        while self.entries.len() > start {
            if let Some(entry) = self.entries.pop() {
                let city = state.pop_city(entry.old_cost);
                debug_assert_eq!(
                    city, entry.city,
                    "trail entry does not match the city on top of the path"
                );
            }
        }
    }

    /// Resets the trail markers without undoing any state changes.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<TrailEntry<T>>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }

    /// Returns an iterator over all trail entries.
    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry<T>> {
        self.entries.iter()
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_new_and_preallocated() {
        let t = SearchTrail::<IntegerType>::new();
        assert!(t.is_empty());
        assert_eq!(t.num_entries(), 0);
        assert_eq!(format!("{}", t), "SearchTrail(entries: 0, frames: 0)");

        let t = SearchTrail::<IntegerType>::preallocated(8);
        assert!(t.allocated_memory_bytes() > 0);
    }

    #[test]
    fn test_ensure_capacity_is_monotonic() {
        let mut t = SearchTrail::<IntegerType>::preallocated(2);
        t.ensure_capacity(10);
        let bytes = t.allocated_memory_bytes();
        assert!(t.entries.capacity() >= 10);
        assert!(t.frames.capacity() >= 11);
        t.ensure_capacity(1);
        assert_eq!(t.allocated_memory_bytes(), bytes);
    }

    #[test]
    fn test_backtrack_restores_state_frame_by_frame() {
        let mut state = SearchState::<IntegerType>::new(4);
        let mut trail = SearchTrail::new();

        trail.push_frame(); // root
        trail.push_frame();
        trail.apply_visit(&mut state, ci(2), 15);
        trail.push_frame();
        trail.apply_visit(&mut state, ci(1), 50);

        assert_eq!(trail.depth(), 3);
        assert_eq!(trail.num_entries(), 2);
        assert_eq!(state.path(), &[ci(0), ci(2), ci(1)]);

        trail.backtrack(&mut state);
        assert_eq!(state.path(), &[ci(0), ci(2)]);
        assert_eq!(state.running_cost(), 15);
        assert!(!state.is_visited(ci(1)));

        trail.backtrack(&mut state);
        assert_eq!(state.path(), &[ci(0)]);
        assert_eq!(state.running_cost(), 0);

        // Root frame holds no entries.
        trail.backtrack(&mut state);
        assert!(trail.is_empty());
        assert_eq!(state.depth(), 1);

        // Backtracking an empty trail is a no-op.
        trail.backtrack(&mut state);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_entries_record_old_cost() {
        let mut state = SearchState::<IntegerType>::new(3);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        trail.apply_visit(&mut state, ci(1), 4);
        trail.apply_visit(&mut state, ci(2), 11);

        let entries: Vec<_> = trail.iter_entries().copied().collect();
        assert_eq!(entries[0].city(), ci(1));
        assert_eq!(entries[0].old_cost(), 0);
        assert_eq!(entries[1].old_cost(), 4);
        assert_eq!(format!("{}", entries[1]), "TrailEntry(city: 2, old_cost: 4)");
    }
}
