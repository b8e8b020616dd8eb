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

use tourbound_model::index::CityIndex;

/// A pending child of a search node: the city to visit next and the lower
/// bound of the state that visit leads to.
///
/// Field order makes the derived `Ord` compare `(lower_bound, city)`, which is
/// exactly the visiting order among siblings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate<T> {
    lower_bound: T,
    city: CityIndex,
}

impl<T> Candidate<T>
where
    T: Copy,
{
    /// Creates a new candidate.
    #[inline(always)]
    pub fn new(lower_bound: T, city: CityIndex) -> Self {
        Self { lower_bound, city }
    }

    /// Returns the lower bound of the child state.
    #[inline(always)]
    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    /// Returns the city to visit.
    #[inline(always)]
    pub fn city(&self) -> CityIndex {
        self.city
    }
}

impl<T> std::fmt::Display for Candidate<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candidate(city: {}, lower_bound: {})",
            self.city.get(),
            self.lower_bound
        )
    }
}

/// A frame-structured LIFO stack of pending candidates.
///
/// All candidates live in one vector; `frames` marks where each depth
/// starts. Popping a frame truncates the entries back to that start, dropping
/// siblings that were never visited.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    entries: Vec<Candidate<T>>,
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    /// Creates a new, empty `SearchStack`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a `SearchStack` sized for a search over `num_cities`.
    ///
    /// Depth `d` holds at most `num_cities - d` pending siblings, so the
    /// whole stack never exceeds `num_cities * (num_cities - 1) / 2` entries.
    #[inline]
    pub fn preallocated(num_cities: usize) -> Self {
        let (entry_capacity, frame_capacity) = Self::capacities(num_cities);
        Self {
            entries: Vec::with_capacity(entry_capacity),
            frames: Vec::with_capacity(frame_capacity),
        }
    }

    /// Grows the capacities to fit a search over `num_cities` if needed.
    #[inline]
    pub fn ensure_capacity(&mut self, num_cities: usize) {
        let (entry_capacity, frame_capacity) = Self::capacities(num_cities);

        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    #[inline(always)]
    fn capacities(num_cities: usize) -> (usize, usize) {
        let entries = num_cities.saturating_mul(num_cities.saturating_sub(1)) / 2;
        (entries, num_cities.saturating_add(1))
    }

    /// Returns the number of pending candidates across all frames.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames tracked (search exhausted).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Pops the current frame, truncating the entries back to its start.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    /// Pushes a single candidate.
    #[inline]
    pub fn push(&mut self, candidate: Candidate<T>) {
        self.entries.push(candidate);
    }

    /// Pushes several candidates; the last one pushed is popped first.
    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Candidate<T>>,
    {
        self.entries.extend(iter);
    }

    /// Pops the next candidate (LIFO).
    #[inline]
    pub fn pop(&mut self) -> Option<Candidate<T>> {
        self.entries.pop()
    }

    /// Clears all entries and frames, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns `true` if the current level has no remaining candidates.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<Candidate<T>>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
