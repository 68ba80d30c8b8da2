//! dictionary::gradient — objective gradient for the rank-1 atom update.
//!
//! Purpose
//! -------
//! Evaluate the gradient of the squared reconstruction error
//! `f(uv) = ½ ‖X − X_hat(uv)‖²` with respect to the rank-1 atom parameters,
//! first through the full per-channel atoms and then through the
//! outer-product chain rule.
//!
//! Key behaviors
//! -------------
//! - **Direct path** ([`GradientSource::Raw`]): form the residual from the
//!   raw data and code, then correlate it against each time-reversed code
//!   row (the transpose of the forward convolution).
//! - **Cached path** ([`GradientSource::Cached`]): combine the precomputed
//!   `ZtZ`/`ZtX` statistics with the current atoms; never touches `X` or
//!   `Z`. Both paths are mathematically identical and must agree to
//!   floating-point tolerance for the same inputs.
//! - Chain rule: the spatial gradient contracts the atom gradient against
//!   the temporal kernel, the temporal gradient contracts it against the
//!   spatial weights; the output matches the parameter matrix exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated before any arithmetic: the raw path goes through
//!   `ProblemShape`, the cached path cross-checks the statistics record
//!   against the parameter matrix. Mismatches are contract violations, not
//!   broadcasts.
//! - A gradient is transient: callers own the returned array and recompute
//!   it after every parameter change.
//!
//! Conventions
//! -----------
//! - Within one evaluation the per-atom/per-channel correlations are
//!   independent; the implementation keeps them sequential, which is a
//!   permitted simplification, not a requirement of the contract.
//!
//! Downstream usage
//! ----------------
//! - The optimization loop uses the cached path every iteration.
//! - Gradient-checking tests call the direct path standalone and compare
//!   against finite differences of [`crate::dictionary::update::objective`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the zero-residual case, shape validation on both
//!   paths, and direct/cached agreement on a small deterministic problem;
//!   integration tests add randomized equivalence and finite-difference
//!   checks.
use ndarray::{s, Array2};

use crate::dictionary::{
    convolve::{convolve_valid, correlate_valid},
    errors::{DictError, DictResult},
    reconstruct::{expand_atoms, reconstruct},
    shape::ProblemShape,
    statistics::UpdateStatistics,
    types::{AtomBank, AtomGrad, AtomParams, Code, Data, ParamGrad},
};

/// Input selector for one gradient evaluation.
///
/// The two variants are mathematically interchangeable; `Cached` is the fast
/// path used inside the optimization loop, `Raw` recomputes from the
/// residual and exists for correctness checking and one-off evaluations.
#[derive(Debug, Clone, Copy)]
pub enum GradientSource<'a> {
    /// Recompute from the raw data and code tensors.
    Raw { data: &'a Data, code: &'a Code },
    /// Reuse precomputed sufficient statistics.
    Cached(&'a UpdateStatistics),
}

/// gradient — objective gradient with respect to the rank-1 parameters.
///
/// Purpose
/// -------
/// Compute `∇f(uv)` for the squared-error objective, selecting either the
/// residual-based direct path or the sufficient-statistics fast path.
///
/// Parameters
/// ----------
/// - `uv`: `&AtomParams`
///   Current rank-1 parameters, shape `(n_atoms, n_chan + n_times_atom)`.
/// - `source`: [`GradientSource`]
///   Where the problem data comes from; see the variant docs.
///
/// Returns
/// -------
/// `DictResult<ParamGrad>`
///   The gradient, shaped exactly like `uv`.
///
/// Errors
/// ------
/// - [`DictError::TrialCountMismatch`] / [`DictError::CodeLongerThanData`] /
///   [`DictError::EmptyDimension`] on the raw path when `(X, Z)` are
///   inconsistent.
/// - [`DictError::AtomCountMismatch`] / [`DictError::ParamWidthMismatch`]
///   when `uv` does not match the problem or the statistics record.
///
/// Notes
/// -----
/// - An all-zero code row yields an all-zero gradient row; degenerate
///   numerical inputs propagate IEEE-754 results without special-casing.
pub fn gradient(uv: &AtomParams, source: GradientSource<'_>) -> DictResult<ParamGrad> {
    match source {
        GradientSource::Raw { data, code } => {
            let shape = ProblemShape::from_data_code(data, code)?;
            shape.check_params(uv)?;
            let d = expand_atoms(uv, shape.n_chan)?;
            let grad_d = gradient_atoms_direct(&d, data, code)?;
            Ok(chain_rule(&grad_d, uv, shape.n_chan))
        }
        GradientSource::Cached(stats) => {
            if uv.nrows() != stats.n_atoms() {
                return Err(DictError::AtomCountMismatch {
                    expected: stats.n_atoms(),
                    found: uv.nrows(),
                });
            }
            let expected = stats.n_chan + stats.n_times_atom();
            if uv.ncols() != expected {
                return Err(DictError::ParamWidthMismatch { expected, found: uv.ncols() });
            }
            let d = expand_atoms(uv, stats.n_chan)?;
            let grad_d = gradient_atoms_cached(&d, stats);
            Ok(chain_rule(&grad_d, uv, stats.n_chan))
        }
    }
}

/// Residual-based gradient with respect to the full atoms.
///
/// `grad_D[k, p, :] = Σ_i correlate_valid(residual[i, p, :], Z[k, i, :])`
/// with `residual = reconstruct(Z, D) − X`.
fn gradient_atoms_direct(d: &AtomBank, x: &Data, z: &Code) -> DictResult<AtomGrad> {
    let residual = reconstruct(z, d)? - x;
    let (n_atoms, _, n_times_atom) = d.dim();
    let (n_trials, n_chan, _) = x.dim();

    let mut grad_d = AtomGrad::zeros((n_atoms, n_chan, n_times_atom));
    for k in 0..n_atoms {
        for i in 0..n_trials {
            let z_row = z.slice(s![k, i, ..]);
            for p in 0..n_chan {
                let corr = correlate_valid(residual.slice(s![i, p, ..]), z_row);
                grad_d.slice_mut(s![k, p, ..]).scaled_add(1.0, &corr);
            }
        }
    }
    Ok(grad_d)
}

/// Statistics-based gradient with respect to the full atoms.
///
/// `grad_D[k, p, :] = Σ_{k'} convolve_valid(ZtZ[k, k', :], D[k', p, :])
/// − ZtX[k, p, :]`.
fn gradient_atoms_cached(d: &AtomBank, stats: &UpdateStatistics) -> AtomGrad {
    let (n_atoms, n_chan, n_times_atom) = d.dim();
    let mut grad_d = AtomGrad::zeros((n_atoms, n_chan, n_times_atom));
    for k in 0..n_atoms {
        for p in 0..n_chan {
            let mut row = grad_d.slice_mut(s![k, p, ..]);
            row.scaled_add(-1.0, &stats.ztx.slice(s![k, p, ..]));
            for k2 in 0..n_atoms {
                let conv =
                    convolve_valid(stats.ztz.slice(s![k, k2, ..]), d.slice(s![k2, p, ..]));
                row.scaled_add(1.0, &conv);
            }
        }
    }
    grad_d
}

/// Chain rule through the outer-product parameterization.
///
/// Spatial part: `grad_u[k, p] = Σ_t grad_D[k, p, t] · v[k, t]`.
/// Temporal part: `grad_v[k, t] = Σ_p grad_D[k, p, t] · u[k, p]`.
fn chain_rule(grad_d: &AtomGrad, uv: &AtomParams, n_chan: usize) -> ParamGrad {
    let (n_atoms, _, n_times_atom) = grad_d.dim();
    let mut grad = Array2::zeros((n_atoms, n_chan + n_times_atom));
    for k in 0..n_atoms {
        for p in 0..n_chan {
            let mut acc = 0.0;
            for t in 0..n_times_atom {
                acc += grad_d[[k, p, t]] * uv[[k, n_chan + t]];
            }
            grad[[k, p]] = acc;
        }
        for t in 0..n_times_atom {
            let mut acc = 0.0;
            for p in 0..n_chan {
                acc += grad_d[[k, p, t]] * uv[[k, p]];
            }
            grad[[k, n_chan + t]] = acc;
        }
    }
    grad
}
