//! Named problem dimensions for one dictionary update.
//!
//! The original formulation infers the atom length implicitly from the
//! difference of two tensor dimensions. This module makes every dimension an
//! explicit named quantity, validated once at the boundary, so the numerical
//! kernels can assume consistent shapes.
use crate::dictionary::{
    errors::{DictError, DictResult},
    types::{AtomParams, Code, Data},
};

/// All dimensions of one `(X, Z, uv)` dictionary-update problem.
///
/// Invariants (enforced by [`ProblemShape::from_data_code`]):
/// - every dimension is non-zero,
/// - `X` and `Z` agree on the trial count,
/// - `n_times_valid <= n_times`, so that
///   `n_times_atom = n_times - n_times_valid + 1` is well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemShape {
    pub n_atoms: usize,
    pub n_trials: usize,
    pub n_chan: usize,
    pub n_times: usize,
    pub n_times_valid: usize,
    pub n_times_atom: usize,
}

impl ProblemShape {
    /// Derive and validate the problem dimensions from the data and code
    /// tensors.
    ///
    /// # Errors
    /// - [`DictError::EmptyDimension`] if any axis of `x` or `z` has length
    ///   zero.
    /// - [`DictError::TrialCountMismatch`] if `x` and `z` disagree on the
    ///   number of trials.
    /// - [`DictError::CodeLongerThanData`] if the code's valid length exceeds
    ///   the data length.
    pub fn from_data_code(x: &Data, z: &Code) -> DictResult<Self> {
        let (n_trials, n_chan, n_times) = x.dim();
        let (n_atoms, n_trials_code, n_times_valid) = z.dim();

        for (len, name) in [
            (n_atoms, "n_atoms"),
            (n_trials, "n_trials"),
            (n_chan, "n_chan"),
            (n_times, "n_times"),
            (n_times_valid, "n_times_valid"),
        ] {
            if len == 0 {
                return Err(DictError::EmptyDimension { name });
            }
        }
        if n_trials != n_trials_code {
            return Err(DictError::TrialCountMismatch { data: n_trials, code: n_trials_code });
        }
        if n_times_valid > n_times {
            return Err(DictError::CodeLongerThanData { n_times, n_times_valid });
        }

        Ok(ProblemShape {
            n_atoms,
            n_trials,
            n_chan,
            n_times,
            n_times_valid,
            n_times_atom: n_times - n_times_valid + 1,
        })
    }

    /// Validate a parameter matrix against this shape.
    ///
    /// # Errors
    /// - [`DictError::AtomCountMismatch`] if `uv` has a different row count
    ///   than `n_atoms`.
    /// - [`DictError::ParamWidthMismatch`] if `uv` has a different column
    ///   count than `n_chan + n_times_atom`.
    pub fn check_params(&self, uv: &AtomParams) -> DictResult<()> {
        if uv.nrows() != self.n_atoms {
            return Err(DictError::AtomCountMismatch {
                expected: self.n_atoms,
                found: uv.nrows(),
            });
        }
        let expected = self.n_chan + self.n_times_atom;
        if uv.ncols() != expected {
            return Err(DictError::ParamWidthMismatch { expected, found: uv.ncols() });
        }
        Ok(())
    }
}
