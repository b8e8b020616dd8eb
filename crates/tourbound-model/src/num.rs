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

//! # Cost Numeric Trait
//!
//! `CostNumeric` collects the integer capabilities the solver needs from an
//! edge cost type into a single alias, so generic signatures across the
//! model and engine stay short.
//!
//! - `PrimInt + Signed` for comparisons, saturating and checked arithmetic
//!   (`PrimInt` brings `Saturating`, `CheckedAdd`, `Bounded`).
//! - `T::max_value()` doubles as the "+infinity" sentinel for an empty
//!   incumbent; the graph validation guarantees no real tour reaches it.
//! - Negative values are representable so that invalid input can be
//!   detected and rejected instead of wrapping silently.

use num_traits::{PrimInt, Signed};

/// A trait alias for integer types usable as edge costs.
///
/// Implemented for every signed primitive integer (`i8` through `i128`,
/// `isize`).
pub trait CostNumeric:
    PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

impl<T> CostNumeric for T where
    T: PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

/// Returns the "+infinity" sentinel for `T`.
#[inline(always)]
pub fn infinity<T>() -> T
where
    T: CostNumeric,
{
    T::max_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cost_numeric<T: CostNumeric>() {}

    #[test]
    fn test_signed_primitives_are_cost_numeric() {
        assert_cost_numeric::<i8>();
        assert_cost_numeric::<i16>();
        assert_cost_numeric::<i32>();
        assert_cost_numeric::<i64>();
        assert_cost_numeric::<i128>();
        assert_cost_numeric::<isize>();
    }

    #[test]
    fn test_infinity_is_max() {
        assert_eq!(infinity::<i32>(), i32::MAX);
        assert_eq!(infinity::<i64>(), i64::MAX);
    }
}
