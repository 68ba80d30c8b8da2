//! dictionary::statistics — sufficient statistics for cheap gradient reuse.
//!
//! Purpose
//! -------
//! Precompute, once per outer update, the two cross-correlation tensors that
//! make repeated gradient evaluations independent of the raw residual:
//!
//! - `ZtX[k, p, τ]`: cross-correlation of the code rows with the data rows,
//!   summed over trials; shape `(n_atoms, n_chan, n_times_atom)`.
//! - `ZtZ[k0, k, t0 ± t]`: autocorrelation of the code with itself across
//!   every relative lag, summed over trials; shape
//!   `(n_atoms, n_atoms, 2·n_times_atom − 1)` with `t0 = n_times_atom − 1`.
//!
//! Key behaviors
//! -------------
//! - Validate the `(X, Z)` pair through `ProblemShape` before any
//!   computation; mismatched shapes fail fast.
//! - Handle lag 0 once and compute positive/negative lags as a matched pair
//!   by slicing the first/last `t` samples off each code row.
//! - Leave lags with empty overlap (`t >= n_times_valid`) at zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ZtZ` is symmetric under swapping the two atom indices and negating the
//!   lag: `ZtZ[k0, k, t0 + t] == ZtZ[k, k0, t0 − t]`.
//! - The statistics are a pure function of `(X, Z)`, independent of the atom
//!   parameters; they stay valid until the code tensor changes.
//!
//! Conventions
//! -----------
//! - Output buffers are allocated up front from the validated shape and
//!   filled with explicit loops; no intermediate per-trial tensors.
//! - Cost is `O(n_atoms² · n_trials · n_times_atom · n_times_valid)` for
//!   `ZtZ` and `O(n_atoms · n_chan · n_trials · n_times)` for `ZtX`, paid
//!   once per outer call.
//!
//! Downstream usage
//! ----------------
//! - [`crate::dictionary::gradient::gradient`] consumes a record through
//!   [`crate::dictionary::gradient::GradientSource::Cached`].
//! - [`crate::dictionary::update::update_atoms`] builds one record at loop
//!   entry and reuses it for every iteration.
//!
//! Testing notes
//! -------------
//! - Unit tests check the lag-swap symmetry, agreement of `ZtX` with a
//!   brute-force double sum, and zeroed lags when the atom is longer than
//!   the valid code length.
use ndarray::{s, Array3};

use crate::dictionary::{
    convolve::correlate_valid,
    errors::DictResult,
    shape::ProblemShape,
    types::{Code, Data},
};

/// Precomputed cross-correlation summaries for one `(X, Z)` pair.
///
/// Read-only for the duration of one outer update; rebuild whenever the code
/// tensor changes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatistics {
    /// Code–data cross-correlation, shape `(n_atoms, n_chan, n_times_atom)`.
    pub ztx: Array3<f64>,
    /// Code autocorrelation over all lags, shape
    /// `(n_atoms, n_atoms, 2·n_times_atom − 1)`.
    pub ztz: Array3<f64>,
    /// Channel count of the data the record was built from.
    pub n_chan: usize,
}

impl UpdateStatistics {
    /// Atom count the record was built for.
    pub fn n_atoms(&self) -> usize {
        self.ztx.dim().0
    }

    /// Atom length the record was built for.
    pub fn n_times_atom(&self) -> usize {
        self.ztx.dim().2
    }
}

/// Build the sufficient statistics for one dictionary update.
///
/// # Errors
/// Propagates the fail-fast shape validation of
/// [`ProblemShape::from_data_code`] (trial mismatch, oversized code, empty
/// axes).
pub fn build_statistics(x: &Data, z: &Code) -> DictResult<UpdateStatistics> {
    let shape = ProblemShape::from_data_code(x, z)?;
    let ProblemShape { n_atoms, n_trials, n_chan, n_times_valid, n_times_atom, .. } = shape;

    let mut ztx = Array3::zeros((n_atoms, n_chan, n_times_atom));
    for k in 0..n_atoms {
        for i in 0..n_trials {
            let z_row = z.slice(s![k, i, ..]);
            for p in 0..n_chan {
                let corr = correlate_valid(x.slice(s![i, p, ..]), z_row);
                ztx.slice_mut(s![k, p, ..]).scaled_add(1.0, &corr);
            }
        }
    }

    let t0 = n_times_atom - 1;
    let mut ztz = Array3::zeros((n_atoms, n_atoms, 2 * n_times_atom - 1));
    for k0 in 0..n_atoms {
        for k in 0..n_atoms {
            for i in 0..n_trials {
                let a = z.slice(s![k0, i, ..]);
                let b = z.slice(s![k, i, ..]);
                ztz[[k0, k, t0]] += a.dot(&b);
                // Positive and negative lags come in matched slice pairs;
                // lags at or beyond the valid length have no overlap.
                for t in 1..n_times_atom.min(n_times_valid) {
                    ztz[[k0, k, t0 + t]] +=
                        a.slice(s![..n_times_valid - t]).dot(&b.slice(s![t..]));
                    ztz[[k0, k, t0 - t]] +=
                        a.slice(s![t..]).dot(&b.slice(s![..n_times_valid - t]));
                }
            }
        }
    }

    Ok(UpdateStatistics { ztx, ztz, n_chan })
}
