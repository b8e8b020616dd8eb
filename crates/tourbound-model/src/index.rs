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

//! Strongly typed city indices.
//!
//! Cities are addressed by `CityIndex`, a transparent wrapper around `usize`.
//! Keeping city ids distinct from plain counters and positions (depth, path
//! offsets, adjacency slots) catches a whole class of mix-ups at compile time
//! while compiling down to a bare `usize`.

/// A typed index identifying a city of the tour.
///
/// # Examples
///
/// ```rust
/// # use tourbound_model::index::CityIndex;
/// let c = CityIndex::new(3);
/// assert_eq!(c.get(), 3);
/// assert_eq!(format!("{}", c), "CityIndex(3)");
/// assert!(CityIndex::ORIGIN.is_origin());
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CityIndex(usize);

impl CityIndex {
    /// The city every tour starts and ends at.
    pub const ORIGIN: CityIndex = CityIndex(0);

    /// Creates a new `CityIndex` from a raw `usize`.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying `usize`.
    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns `true` if this is the origin city.
    #[inline(always)]
    pub const fn is_origin(self) -> bool {
        self.0 == Self::ORIGIN.0
    }
}

impl From<usize> for CityIndex {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<CityIndex> for usize {
    #[inline(always)]
    fn from(index: CityIndex) -> Self {
        index.0
    }
}

impl std::fmt::Display for CityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CityIndex({})", self.0)
    }
}

impl std::fmt::Debug for CityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CityIndex({})", self.0)
    }
}
