//! dictionary::update — the projected-gradient dictionary-update loop.
//!
//! Purpose
//! -------
//! Drive the constrained least-squares atom update to convergence or budget:
//! repeatedly evaluate the gradient on the cached-statistics fast path, take
//! a fixed-size step, and project back onto the per-atom unit ball.
//!
//! Key behaviors
//! -------------
//! - Validate all shapes and options up front, then clone the caller's
//!   initial parameters; the input array is immutable at the boundary.
//! - Build the sufficient statistics exactly once per call and reuse them
//!   for every iteration.
//! - Report the stopping reason as a structured [`UpdateStatus`] inside
//!   [`UpdateOutcome`]; running out of budget is a reported condition, not
//!   an error, and the best-so-far parameters are still returned.
//!
//! Invariants & assumptions
//! ------------------------
//! - The loop is strictly sequential: each iteration's gradient depends on
//!   the previous iteration's projected parameters.
//! - After every iteration each parameter row has ℓ₂ norm at most 1.
//! - The convergence signal is the ℓ₁ norm of the *pre-step* gradient; the
//!   step and projection of the final iteration are applied before the
//!   signal is checked, matching the reference iteration order.
//! - The step size is a fixed external constant. Too large a value can
//!   diverge; that is a documented property of the scheme, and the loop
//!   will then run to budget and report `MaxIterReached`.
//!
//! Conventions
//! -----------
//! - The convergence signal is scale-dependent (more atoms or longer
//!   kernels inflate the ℓ₁ sum); `tol` is configurable so callers can
//!   rescale it to their problem size.
//! - `verbose` writes a single summary line to stderr after the loop; all
//!   programmatic reporting goes through the returned outcome.
//!
//! Downstream usage
//! ----------------
//! - Alternating-minimization drivers call [`update_atoms`] once per outer
//!   iteration, feeding the previous estimate back in as `uv0`.
//! - [`objective`] exposes the scalar objective for monitoring descent.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, the immediate-convergence and
//!   budget-exhaustion scenarios, and boundary immutability.
//! - Integration tests add monotonic-descent and gradient-agreement
//!   properties on randomized problems.
use crate::dictionary::{
    errors::{DictError, DictResult},
    gradient::{gradient, GradientSource},
    prox::project_unit_ball,
    reconstruct::{expand_atoms, reconstruct},
    shape::ProblemShape,
    statistics::build_statistics,
    types::{AtomParams, Code, Data, DEFAULT_MAX_ITER, DEFAULT_STEP_SIZE, DEFAULT_TOL},
};

/// Configuration for one call to [`update_atoms`].
///
/// Fields:
/// - `step_size: f64` — fixed gradient-step length; no line search or
///   spectral estimation is performed.
/// - `max_iter: usize` — hard iteration budget.
/// - `tol: f64` — threshold on the ℓ₁ norm of the pre-step gradient.
/// - `verbose: bool` — if `true`, prints a one-line summary to stderr.
///
/// Default: `step_size = 1e-2`, `max_iter = 300`,
/// `tol = f32::EPSILON as f64`, `verbose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateOptions {
    pub step_size: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub verbose: bool,
}

impl UpdateOptions {
    /// Construct validated options.
    ///
    /// # Rules
    /// - `step_size` must be finite and strictly positive.
    /// - `tol` must be finite and non-negative.
    /// - `max_iter` must be greater than zero.
    ///
    /// # Errors
    /// - [`DictError::InvalidStepSize`], [`DictError::InvalidTol`], or
    ///   [`DictError::InvalidMaxIter`] for the offending field.
    pub fn new(step_size: f64, max_iter: usize, tol: f64, verbose: bool) -> DictResult<Self> {
        if !step_size.is_finite() {
            return Err(DictError::InvalidStepSize {
                value: step_size,
                reason: "Step size must be finite.",
            });
        }
        if step_size <= 0.0 {
            return Err(DictError::InvalidStepSize {
                value: step_size,
                reason: "Step size must be positive.",
            });
        }
        if !tol.is_finite() {
            return Err(DictError::InvalidTol { tol, reason: "Tolerance must be finite." });
        }
        if tol < 0.0 {
            return Err(DictError::InvalidTol { tol, reason: "Tolerance must be non-negative." });
        }
        if max_iter == 0 {
            return Err(DictError::InvalidMaxIter {
                max_iter,
                reason: "At least one iteration is required.",
            });
        }
        Ok(Self { step_size, max_iter, tol, verbose })
    }
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            verbose: false,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The ℓ₁ gradient signal fell to or below the tolerance.
    Converged,
    /// The iteration budget ran out first. Non-fatal; the last computed
    /// parameters are still returned.
    MaxIterReached,
}

impl std::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateStatus::Converged => write!(f, "converged"),
            UpdateStatus::MaxIterReached => write!(f, "did not converge within budget"),
        }
    }
}

/// Result of one dictionary update.
///
/// Fields:
/// - `uv_hat` — final projected parameters; every row has ℓ₂ norm ≤ 1.
/// - `status` — stopping reason.
/// - `iterations` — number of iterations actually run (≥ 1).
/// - `grad_l1` — ℓ₁ norm of the last pre-step gradient, the convergence
///   signal that was compared against `tol`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub uv_hat: AtomParams,
    pub status: UpdateStatus,
    pub iterations: usize,
    pub grad_l1: f64,
}

impl UpdateOutcome {
    /// Convenience predicate for the common check.
    pub fn converged(&self) -> bool {
        self.status == UpdateStatus::Converged
    }
}

/// update_atoms — projected gradient descent on the rank-1 atom parameters.
///
/// Purpose
/// -------
/// Minimize `½ ‖X − reconstruct(Z, expand(uv))‖²` over `uv` subject to
/// `‖uv[k, :]‖₂ ≤ 1` per atom, starting from `uv0`, with a fixed step size.
///
/// Parameters
/// ----------
/// - `x`: `&Data` — observed signal, `(n_trials, n_chan, n_times)`.
/// - `z`: `&Code` — fixed sparse code, `(n_atoms, n_trials, n_times_valid)`.
/// - `uv0`: `&AtomParams` — initial parameters; cloned, never mutated.
/// - `opts`: `&UpdateOptions` — step size, budget, tolerance, verbosity.
///
/// Returns
/// -------
/// `DictResult<UpdateOutcome>` with the final parameters, stopping status,
/// iteration count, and last convergence signal.
///
/// Errors
/// ------
/// - Shape-contract violations from [`ProblemShape`] validation (trial
///   mismatch, oversized code, empty axes, malformed `uv0`).
///
/// Notes
/// -----
/// - Each iteration evaluates the gradient on the cached-statistics path,
///   records its ℓ₁ norm, steps, projects, and only then checks the signal
///   against `tol` — so the iteration that detects convergence has already
///   applied its (vanishing) step, like the reference scheme.
/// - Non-convergence is reported through `UpdateStatus::MaxIterReached`,
///   never as an error or a print; `verbose` adds an informational stderr
///   line only.
pub fn update_atoms(
    x: &Data, z: &Code, uv0: &AtomParams, opts: &UpdateOptions,
) -> DictResult<UpdateOutcome> {
    let shape = ProblemShape::from_data_code(x, z)?;
    shape.check_params(uv0)?;

    let stats = build_statistics(x, z)?;
    let mut uv_hat = uv0.to_owned();
    let mut status = UpdateStatus::MaxIterReached;
    let mut iterations = opts.max_iter;
    let mut grad_l1 = f64::INFINITY;

    for ii in 0..opts.max_iter {
        let grad = gradient(&uv_hat, GradientSource::Cached(&stats))?;
        grad_l1 = grad.fold(0.0, |acc, g| acc + g.abs());
        uv_hat.scaled_add(-opts.step_size, &grad);
        uv_hat = project_unit_ball(&uv_hat);
        if grad_l1 <= opts.tol {
            status = UpdateStatus::Converged;
            iterations = ii + 1;
            break;
        }
    }

    if opts.verbose {
        eprintln!("update_atoms: {status} after {iterations} iterations, |grad|_1 = {grad_l1:.3e}");
    }

    Ok(UpdateOutcome { uv_hat, status, iterations, grad_l1 })
}

/// Squared-error objective `½ ‖X − reconstruct(Z, expand(uv))‖²`.
///
/// Exposed for descent monitoring and gradient checking; the loop itself
/// never evaluates it.
///
/// # Errors
/// Same shape-contract violations as [`update_atoms`].
pub fn objective(x: &Data, z: &Code, uv: &AtomParams) -> DictResult<f64> {
    let shape = ProblemShape::from_data_code(x, z)?;
    shape.check_params(uv)?;
    let d = expand_atoms(uv, shape.n_chan)?;
    let residual = reconstruct(z, &d)? - x;
    Ok(0.5 * residual.fold(0.0, |acc, r| acc + r * r))
}
