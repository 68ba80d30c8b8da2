//! One-dimensional correlation and convolution primitives.
//!
//! This module centralizes the small signal kernels the dictionary update is
//! built from:
//!
//! - **Valid-mode correlation**: [`correlate_valid`] slides the shorter
//!   signal over the longer one and keeps only fully-overlapped positions.
//!   Equivalent to a valid-mode convolution with the shorter signal
//!   time-reversed.
//! - **Valid-mode convolution**: [`convolve_valid`] is the same overlap rule
//!   without the time reversal.
//! - **Full convolution**: [`convolve_full`] produces every output position,
//!   length `a + b - 1`; this is the forward model mapping code to signal.
//!
//! All outputs are pre-allocated from the input lengths and filled with
//! explicit loops. Length preconditions are the caller's contract (checked
//! upstream via `ProblemShape`) and only debug-asserted here.
use ndarray::{s, Array1, ArrayView1};

/// Valid-mode cross-correlation of `x` with `z`.
///
/// `out[t] = Σ_u z[u] · x[t + u]` for `t` in `[0, x.len() - z.len()]`.
///
/// Requires `1 <= z.len() <= x.len()`; the output has length
/// `x.len() - z.len() + 1`.
pub fn correlate_valid(x: ArrayView1<'_, f64>, z: ArrayView1<'_, f64>) -> Array1<f64> {
    debug_assert!(!z.is_empty() && z.len() <= x.len());
    let m = z.len();
    let n_out = x.len() - m + 1;
    let mut out = Array1::zeros(n_out);
    for t in 0..n_out {
        out[t] = x.slice(s![t..t + m]).dot(&z);
    }
    out
}

/// Valid-mode convolution of `a` with `v`.
///
/// `out[t] = Σ_j v[j] · a[t + v.len() - 1 - j]` for `t` in
/// `[0, a.len() - v.len()]`.
///
/// Requires `1 <= v.len() <= a.len()`; the output has length
/// `a.len() - v.len() + 1`.
pub fn convolve_valid(a: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
    debug_assert!(!v.is_empty() && v.len() <= a.len());
    let m = v.len();
    let n_out = a.len() - m + 1;
    let mut out = Array1::zeros(n_out);
    for t in 0..n_out {
        let mut acc = 0.0;
        for j in 0..m {
            acc += v[j] * a[t + m - 1 - j];
        }
        out[t] = acc;
    }
    out
}

/// Full convolution of `z` with `d`, output length `z.len() + d.len() - 1`.
///
/// This is the forward model: an activation sequence convolved with an atom
/// yields that atom's contribution to the reconstructed signal.
pub fn convolve_full(z: ArrayView1<'_, f64>, d: ArrayView1<'_, f64>) -> Array1<f64> {
    debug_assert!(!z.is_empty() && !d.is_empty());
    let mut out = Array1::zeros(z.len() + d.len() - 1);
    for (j, &zj) in z.iter().enumerate() {
        if zj == 0.0 {
            continue;
        }
        for (t, &dt) in d.iter().enumerate() {
            out[j + t] += zj * dt;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hand-computed values for all three primitives on short signals.
    // - The length contracts relating inputs and outputs.
    // - The correlation/convolution time-reversal relationship.
    //
    // They intentionally DO NOT cover:
    // - Multi-axis tensor plumbing (covered where the primitives are used).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify valid-mode correlation against hand-computed values.
    //
    // Given
    // -----
    // - x = [1, 2, 3, 4], z = [1, 1].
    //
    // Expect
    // ------
    // - out = [3, 5, 7], length x - z + 1 = 3.
    fn correlate_valid_matches_hand_computation() {
        // Arrange
        let x = array![1.0, 2.0, 3.0, 4.0];
        let z = array![1.0, 1.0];

        // Act
        let out = correlate_valid(x.view(), z.view());

        // Assert
        assert_eq!(out, array![3.0, 5.0, 7.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify valid-mode convolution against hand-computed values.
    //
    // Given
    // -----
    // - a = [1, 2, 3, 4], v = [1, 2].
    //
    // Expect
    // ------
    // - out[t] = Σ_j v[j]·a[t+1-j] = [2·1+1·2, 2·2+1·3, 2·3+1·4] = [4, 7, 10].
    fn convolve_valid_matches_hand_computation() {
        // Arrange
        let a = array![1.0, 2.0, 3.0, 4.0];
        let v = array![1.0, 2.0];

        // Act
        let out = convolve_valid(a.view(), v.view());

        // Assert
        assert_eq!(out, array![4.0, 7.0, 10.0]);
    }

    #[test]
    // Purpose
    // -------
    // Confirm that correlating equals convolving with the reversed kernel.
    //
    // Given
    // -----
    // - x = [0.5, -1, 2, 3, 0.25], z = [2, -1, 0.5].
    //
    // Expect
    // ------
    // - correlate_valid(x, z) == convolve_valid(x, reverse(z)) exactly.
    fn correlation_is_convolution_with_reversed_kernel() {
        // Arrange
        let x = array![0.5, -1.0, 2.0, 3.0, 0.25];
        let z = array![2.0, -1.0, 0.5];
        let z_rev = array![0.5, -1.0, 2.0];

        // Act
        let corr = correlate_valid(x.view(), z.view());
        let conv = convolve_valid(x.view(), z_rev.view());

        // Assert
        assert_eq!(corr.len(), 3);
        for (c, v) in corr.iter().zip(conv.iter()) {
            assert!((c - v).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify full convolution values and output length.
    //
    // Given
    // -----
    // - z = [1, 0, 2], d = [3, 1].
    //
    // Expect
    // ------
    // - out = [3, 1, 6, 2], length 3 + 2 - 1 = 4.
    fn convolve_full_matches_hand_computation() {
        // Arrange
        let z = array![1.0, 0.0, 2.0];
        let d = array![3.0, 1.0];

        // Act
        let out = convolve_full(z.view(), d.view());

        // Assert
        assert_eq!(out, array![3.0, 1.0, 6.0, 2.0]);
    }
}
