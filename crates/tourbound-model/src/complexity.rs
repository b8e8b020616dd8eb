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

/// Represents the size of the full permutation tree of a tour search.
///
/// With the origin fixed, level `k` of the tree holds every ordered choice of
/// `k` of the remaining `N - 1` cities, so the tree has
/// $\sum_{k=0}^{N-1} \frac{(N-1)!}{(N-1-k)!}$ nodes.
///
/// These numbers leave integer range quickly (`N = 30` is already beyond
/// $10^{30}$), so the value is stored in **logarithmic space** ($\log_{10}$).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    /// The base-10 logarithm of the total tree size.
    log_val: f64,
}

impl Complexity {
    /// Calculates the tree size for a tour over `num_cities` cities.
    pub fn new(num_cities: usize) -> Self {
        if num_cities <= 1 {
            return Complexity { log_val: 0.0 }; // root only
        }

        let free = num_cities - 1;

        // log10(10^a + 10^b) without leaving log space.
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        let mut level_log = 0.0; // L_0 = 1
        let mut total_log = 0.0;
        for k in 1..=free {
            // L_k = L_{k-1} * (free - k + 1)
            level_log += ((free - k + 1) as f64).log10();
            total_log = log10_add(total_log, level_log);
        }

        Complexity { log_val: total_log }
    }

    /// Returns the percentage of the tree that was actually explored.
    ///
    /// Returns `Some(0.0)` once the tree is too large for a meaningful
    /// percentage.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return Some(0.0);
        }

        let total_size = 10.0_f64.powf(self.log_val);
        if total_size == 0.0 {
            return None;
        }

        Some((nodes_explored as f64 / total_size) * 100.0)
    }

    /// Returns the order of magnitude.
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the mantissa.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let fractional_part = self.log_val - self.log_val.floor();
        10.0_f64.powf(fractional_part)
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log10={:.4})", self.log_val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(c: Complexity) -> f64 {
        10.0_f64.powf(c.log_val)
    }

    #[test]
    fn test_trivial_trees_have_one_node() {
        assert_eq!(Complexity::new(0).log_val, 0.0);
        assert_eq!(Complexity::new(1).log_val, 0.0);
    }

    #[test]
    fn test_small_tree_sizes() {
        // N=2: 1 + 1 = 2
        assert!((size(Complexity::new(2)) - 2.0).abs() < 1e-9);
        // N=4: 1 + 3 + 6 + 6 = 16
        assert!((size(Complexity::new(4)) - 16.0).abs() < 1e-9);
        // N=5: 1 + 4 + 12 + 24 + 24 = 65
        assert!((size(Complexity::new(5)) - 65.0).abs() < 1e-7);
    }

    #[test]
    fn test_coverage() {
        let c = Complexity::new(4);
        let cov = c.coverage(8).unwrap();
        assert!((cov - 50.0).abs() < 1e-9);
        assert_eq!(Complexity::new(40).coverage(1_000), Some(0.0));
    }

    #[test]
    fn test_display_and_parts() {
        let c = Complexity::new(5);
        assert_eq!(c.exponent(), 1);
        assert!((c.mantissa() - 6.5).abs() < 1e-9);
        assert_eq!(format!("{}", c), "6.50 × 10^1");
        assert!(format!("{:?}", c).starts_with("Complexity(log10="));
    }
}
