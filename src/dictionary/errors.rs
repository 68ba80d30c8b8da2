/// Crate-wide result alias for dictionary-update operations.
pub type DictResult<T> = Result<T, DictError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DictError {
    // ---- Shape contract ----
    /// Data and code tensors disagree on the number of trials.
    TrialCountMismatch {
        data: usize,
        code: usize,
    },

    /// The code's valid length exceeds the data length, so no atom length
    /// can be derived.
    CodeLongerThanData {
        n_times: usize,
        n_times_valid: usize,
    },

    /// A tensor has a different atom count than the rest of the problem.
    AtomCountMismatch {
        expected: usize,
        found: usize,
    },

    /// The parameter matrix width does not equal `n_chan + n_times_atom`.
    ParamWidthMismatch {
        expected: usize,
        found: usize,
    },

    /// A problem dimension is zero.
    EmptyDimension {
        name: &'static str,
    },

    // ---- UpdateOptions ----
    /// Step size needs to be positive and finite.
    InvalidStepSize {
        value: f64,
        reason: &'static str,
    },

    /// Convergence tolerance needs to be non-negative and finite.
    InvalidTol {
        tol: f64,
        reason: &'static str,
    },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
}

impl std::error::Error for DictError {}

impl std::fmt::Display for DictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape contract ----
            DictError::TrialCountMismatch { data, code } => {
                write!(f, "Trial count mismatch: data has {data} trials, code has {code}")
            }
            DictError::CodeLongerThanData { n_times, n_times_valid } => {
                write!(
                    f,
                    "Code valid length {n_times_valid} exceeds data length {n_times}; \
                     atom length n_times - n_times_valid + 1 is undefined"
                )
            }
            DictError::AtomCountMismatch { expected, found } => {
                write!(f, "Atom count mismatch: expected {expected}, found {found}")
            }
            DictError::ParamWidthMismatch { expected, found } => {
                write!(
                    f,
                    "Parameter width mismatch: expected n_chan + n_times_atom = {expected}, \
                     found {found}"
                )
            }
            DictError::EmptyDimension { name } => {
                write!(f, "Dimension '{name}' must be non-zero")
            }

            // ---- UpdateOptions ----
            DictError::InvalidStepSize { value, reason } => {
                write!(f, "Invalid step size {value}: {reason}")
            }
            DictError::InvalidTol { tol, reason } => {
                write!(f, "Invalid tolerance {tol}: {reason}")
            }
            DictError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DictError> for pyo3::PyErr {
    fn from(err: DictError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
