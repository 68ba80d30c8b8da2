//! dictionary::types — shared numeric aliases and loop defaults.
//!
//! Purpose
//! -------
//! Centralize the tensor types and default constants used across the
//! dictionary-update modules. Keeping these in one place lets the rest of
//! the code stay agnostic to the `ndarray` generics and records the axis
//! conventions once.
//!
//! Conventions
//! -----------
//! - `Code` is indexed `(atom, trial, valid time step)`.
//! - `Data` is indexed `(trial, channel, time step)`.
//! - `AtomParams` is indexed `(atom, component)` where the first `n_chan`
//!   components are the spatial weights and the remaining `n_times_atom`
//!   components are the temporal kernel.
//! - `AtomBank` and `AtomGrad` are indexed `(atom, channel, atom time step)`.
//! - `ParamGrad` matches `AtomParams` exactly.
//!
//! Testing notes
//! -------------
//! - This module only defines aliases and constants; correctness is
//!   exercised by the modules that instantiate them.
use ndarray::{Array2, Array3};

/// Sparse code tensor `Z`, shape `(n_atoms, n_trials, n_times_valid)`.
///
/// Fixed input for the duration of one atom update; read-only throughout.
pub type Code = Array3<f64>;

/// Observed multichannel data `X`, shape `(n_trials, n_chan, n_times)`.
pub type Data = Array3<f64>;

/// Rank-1 atom parameters `uv`, shape `(n_atoms, n_chan + n_times_atom)`.
///
/// The optimization variable. After each projected step every row has
/// ℓ₂ norm at most 1.
pub type AtomParams = Array2<f64>;

/// Full per-channel atoms `D`, shape `(n_atoms, n_chan, n_times_atom)`.
///
/// Derived from [`AtomParams`] by an outer product; recomputed whenever the
/// parameters change, never itself an optimization variable.
pub type AtomBank = Array3<f64>;

/// Gradient with respect to the full atoms, shaped like [`AtomBank`].
pub type AtomGrad = Array3<f64>;

/// Gradient with respect to the rank-1 parameters, shaped like
/// [`AtomParams`].
pub type ParamGrad = Array2<f64>;

/// Default fixed step size for the projected-gradient loop.
pub const DEFAULT_STEP_SIZE: f64 = 1e-2;

/// Default iteration budget for the projected-gradient loop.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Default convergence tolerance: single-precision machine epsilon.
pub const DEFAULT_TOL: f64 = f32::EPSILON as f64;
