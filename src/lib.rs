//! convdict — rank-1 atom updates for convolutional dictionary learning.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the dictionary-update kernel to Python via the `_convdict`
//! extension module. The crate implements the dictionary-update half of an
//! alternating-minimization scheme for multichannel convolutional sparse
//! coding: projected gradient descent on rank-1 spatio-temporal atoms under
//! a per-atom unit-norm constraint, driven by precomputed cross-correlation
//! sufficient statistics.
//!
//! Key behaviors
//! -------------
//! - Re-export the core [`dictionary`] module as the public crate surface;
//!   native callers typically import `dictionary::prelude::*`.
//! - When the `python-bindings` feature is enabled, define the
//!   Python-facing `AtomUpdate` class and helper functions and the
//!   `#[pymodule]` initializer for `_convdict`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner modules; this
//!   file performs only FFI glue, input conversion, and error mapping.
//! - The sparse code is a fixed input supplied by an external sparse-coding
//!   collaborator; this crate never modifies it.
//!
//! Conventions
//! -----------
//! - Axis order follows the core modules: codes are
//!   `(atom, trial, valid time)`, data is `(trial, channel, time)`,
//!   parameters are `(atom, channels ++ temporal kernel)`.
//! - Errors from core code are rich [`dictionary::errors::DictError`] values
//!   internally and are converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`dictionary`] and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - Python callers import the compiled `_convdict` module and drive the
//!   update through the `AtomUpdate` class.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the integration suite in `tests/`; the PyO3 layer contains no
//!   logic beyond conversion and is exercised from Python.

pub mod dictionary;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray2, PyReadonlyArray3};

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    dictionary::{
        gradient::{gradient, GradientSource},
        prox::project_unit_ball,
        types::DEFAULT_TOL,
        update::{update_atoms, UpdateOptions, UpdateOutcome},
    },
    utils::rows_to_vecs,
};

/// AtomUpdate — Python-facing wrapper for one dictionary update.
///
/// Purpose
/// -------
/// Run the projected-gradient atom update from Python and hold the full
/// [`UpdateOutcome`] for inspection through read-only properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `AtomUpdate(x, z, uv0, step_size=1e-2, max_iter=300, tol=None,
/// verbose=False)`:
/// - `x`: 3-D float64 array, shape `(n_trials, n_chan, n_times)`.
/// - `z`: 3-D float64 array, shape `(n_atoms, n_trials, n_times_valid)`.
/// - `uv0`: 2-D float64 array, shape `(n_atoms, n_chan + n_times_atom)`.
/// - `step_size`, `max_iter`, `tol`, `verbose`: loop configuration;
///   `tol=None` selects single-precision machine epsilon.
///
/// Fields
/// ------
/// - `inner`: [`UpdateOutcome`] — full Rust-side result used by the
///   accessors.
///
/// Notes
/// -----
/// - This type exists solely for the PyO3 surface; native Rust code should
///   call [`dictionary::update::update_atoms`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "convdict")]
pub struct AtomUpdate {
    /// The finished update result.
    inner: UpdateOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AtomUpdate {
    #[new]
    #[pyo3(
        signature = (x, z, uv0, step_size = 1e-2, max_iter = 300, tol = None, verbose = false),
        text_signature = "(x, z, uv0, /, step_size=1e-2, max_iter=300, tol=None, verbose=False)"
    )]
    pub fn update<'py>(
        x: PyReadonlyArray3<'py, f64>, z: PyReadonlyArray3<'py, f64>,
        uv0: PyReadonlyArray2<'py, f64>, step_size: f64, max_iter: usize, tol: Option<f64>,
        verbose: bool,
    ) -> PyResult<Self> {
        let opts = UpdateOptions::new(step_size, max_iter, tol.unwrap_or(DEFAULT_TOL), verbose)?;
        let x = x.as_array().to_owned();
        let z = z.as_array().to_owned();
        let uv0 = uv0.as_array().to_owned();
        let inner = update_atoms(&x, &z, &uv0, &opts)?;
        Ok(AtomUpdate { inner })
    }

    /// Final atom parameters, row-major.
    #[getter]
    pub fn uv_hat(&self) -> Vec<Vec<f64>> {
        rows_to_vecs(&self.inner.uv_hat)
    }

    /// Whether the ℓ₁ gradient signal reached the tolerance.
    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    /// Human-readable stopping reason.
    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.to_string()
    }

    /// Number of iterations actually run.
    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    /// ℓ₁ norm of the last pre-step gradient.
    #[getter]
    pub fn grad_l1(&self) -> f64 {
        self.inner.grad_l1
    }
}

/// Project each atom row of `uv` onto the ℓ₂ unit ball.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(uv, /)")]
pub fn prox<'py>(uv: PyReadonlyArray2<'py, f64>) -> Vec<Vec<f64>> {
    rows_to_vecs(&project_unit_ball(&uv.as_array().to_owned()))
}

/// Objective gradient with respect to the rank-1 parameters, computed on
/// the raw-data path. Intended for gradient checking from Python.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(uv, x, z, /)")]
pub fn gradient_uv<'py>(
    uv: PyReadonlyArray2<'py, f64>, x: PyReadonlyArray3<'py, f64>,
    z: PyReadonlyArray3<'py, f64>,
) -> PyResult<Vec<Vec<f64>>> {
    let uv = uv.as_array().to_owned();
    let x = x.as_array().to_owned();
    let z = z.as_array().to_owned();
    let grad = gradient(&uv, GradientSource::Raw { data: &x, code: &z })?;
    Ok(rows_to_vecs(&grad))
}

/// _convdict — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _convdict<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<AtomUpdate>()?;
    m.add_function(wrap_pyfunction!(prox, m)?)?;
    m.add_function(wrap_pyfunction!(gradient_uv, m)?)?;
    Ok(())
}
