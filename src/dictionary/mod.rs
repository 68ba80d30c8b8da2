//! dictionary — rank-1 atom updates for convolutional dictionary learning.
//!
//! Purpose
//! -------
//! Provide the dictionary-update half of an alternating-minimization scheme
//! for multichannel convolutional sparse coding: given a fixed sparse code
//! `Z` and observed data `X`, minimize the squared reconstruction error over
//! a bank of rank-1 spatio-temporal atoms under a unit-norm constraint per
//! atom, using projected gradient descent with precomputed sufficient
//! statistics.
//!
//! Key behaviors
//! -------------
//! - Build cross-correlation sufficient statistics (`ZtZ`, `ZtX`) once per
//!   outer update so that repeated gradient evaluations never touch the raw
//!   residual (`statistics`).
//! - Evaluate the objective gradient with respect to the rank-1 parameters
//!   on either the raw-data path or the cached-statistics path, with both
//!   paths numerically interchangeable (`gradient`).
//! - Enforce the per-atom unit-norm constraint via a proximal projection
//!   onto the ℓ₂ unit ball (`prox`).
//! - Drive a fixed-step projected-gradient loop to convergence or iteration
//!   budget and report the outcome as a structured status, never as a side
//!   effect (`update`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All tensors are dense `ndarray` containers over `f64`; axis conventions
//!   are `Z: (atom, trial, valid time)`, `X: (trial, channel, time)`,
//!   `uv: (atom, channel weights ++ temporal kernel)`.
//! - The code tensor `Z` is fixed and read-only for the lifetime of one
//!   update; sufficient statistics are valid only for the `(X, Z)` pair they
//!   were built from.
//! - Shape consistency is validated fail-fast at the module boundary
//!   (`shape`); inner numerical kernels may assume validated dimensions.
//! - After every loop iteration, each row of the parameter matrix has ℓ₂
//!   norm at most 1.
//!
//! Conventions
//! -----------
//! - "Valid-mode" correlation/convolution produces only the fully-overlapped
//!   output positions (length = longer − shorter + 1), matching the data
//!   model where the atom length is `n_times − n_times_valid + 1`.
//! - Fallible operations return `DictResult<T>`; callers never see panics
//!   for malformed inputs, only [`errors::DictError`] values.
//! - Non-convergence within the iteration budget is a reported condition
//!   ([`update::UpdateStatus::MaxIterReached`]), not an error.
//! - Numerical degeneracy (e.g. an all-zero code row) propagates whatever
//!   IEEE-754 result falls out; callers validate code tensors upstream.
//!
//! Downstream usage
//! ----------------
//! - Sparse-coding drivers call [`update::update_atoms`] once per outer
//!   alternation, passing the current code and the previous atom estimate.
//! - Gradient-checking harnesses call [`gradient::gradient`] standalone on
//!   either path and [`update::objective`] for the scalar objective.
//! - Front-ends import the curated surface via `dictionary::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover the convolution primitives, the
//!   outer-product expansion, statistics symmetry, projection properties,
//!   and loop termination.
//! - `tests/integration_atom_update.rs` checks cross-module properties:
//!   direct/cached gradient agreement, finite-difference gradient
//!   correctness, monotonic descent, and objective reduction on a noiseless
//!   recovery problem.

pub mod convolve;
pub mod errors;
pub mod gradient;
pub mod prox;
pub mod reconstruct;
pub mod shape;
pub mod statistics;
pub mod types;
pub mod update;

// ---- Convenience prelude for downstream crates ----------------------------
//
// Downstream code can write
//
//     use convdict::dictionary::prelude::*;
//
// to import the main update surface in a single line.

pub mod prelude {
    pub use super::errors::{DictError, DictResult};
    pub use super::gradient::{gradient, GradientSource};
    pub use super::prox::project_unit_ball;
    pub use super::reconstruct::{expand_atoms, reconstruct};
    pub use super::shape::ProblemShape;
    pub use super::statistics::{build_statistics, UpdateStatistics};
    pub use super::types::{AtomBank, AtomGrad, AtomParams, Code, Data, ParamGrad};
    pub use super::update::{
        objective, update_atoms, UpdateOptions, UpdateOutcome, UpdateStatus,
    };
}
