//! Rank-1 atom expansion and signal reconstruction.
//!
//! Two pure functions tie the factored parameterization to the signal
//! domain:
//!
//! - [`expand_atoms`] maps each parameter row `(u_k, v_k)` to a full
//!   per-channel atom `D[k, p, t] = u_k[p] · v_k[t]` (an outer product).
//! - [`reconstruct`] computes the predicted multichannel signal by summing,
//!   over atoms, the full convolution of each code row with the matching
//!   atom row.
//!
//! Both recompute their outputs from scratch on every call; the expanded
//! atom bank is never a stored optimization variable.
use ndarray::s;

use crate::dictionary::{
    errors::{DictError, DictResult},
    types::{AtomBank, AtomParams, Code, Data},
};

use super::convolve::convolve_full;

/// Expand rank-1 parameters into a full atom bank.
///
/// `D[k, p, t] = uv[k, p] · uv[k, n_chan + t]` with temporal length
/// `uv.ncols() - n_chan`.
///
/// # Errors
/// - [`DictError::EmptyDimension`] if `uv` has no rows or `n_chan` is zero.
/// - [`DictError::ParamWidthMismatch`] if `uv.ncols() <= n_chan`, leaving no
///   temporal components.
pub fn expand_atoms(uv: &AtomParams, n_chan: usize) -> DictResult<AtomBank> {
    if uv.nrows() == 0 {
        return Err(DictError::EmptyDimension { name: "n_atoms" });
    }
    if n_chan == 0 {
        return Err(DictError::EmptyDimension { name: "n_chan" });
    }
    if uv.ncols() <= n_chan {
        return Err(DictError::ParamWidthMismatch { expected: n_chan + 1, found: uv.ncols() });
    }

    let n_atoms = uv.nrows();
    let n_times_atom = uv.ncols() - n_chan;
    let mut d = AtomBank::zeros((n_atoms, n_chan, n_times_atom));
    for k in 0..n_atoms {
        for p in 0..n_chan {
            let u_kp = uv[[k, p]];
            for t in 0..n_times_atom {
                d[[k, p, t]] = u_kp * uv[[k, n_chan + t]];
            }
        }
    }
    Ok(d)
}

/// Reconstruct the predicted multichannel signal from codes and atoms.
///
/// For each trial `i` and channel `p`,
/// `X_hat[i, p, :] = Σ_k convolve_full(Z[k, i, :], D[k, p, :])`,
/// with output length `n_times_valid + n_times_atom - 1 = n_times`.
///
/// # Errors
/// - [`DictError::AtomCountMismatch`] if `z` and `d` disagree on the atom
///   count.
/// - [`DictError::EmptyDimension`] if any axis of `z` or `d` has length
///   zero.
pub fn reconstruct(z: &Code, d: &AtomBank) -> DictResult<Data> {
    let (n_atoms, n_trials, n_times_valid) = z.dim();
    let (n_atoms_d, n_chan, n_times_atom) = d.dim();
    if n_atoms != n_atoms_d {
        return Err(DictError::AtomCountMismatch { expected: n_atoms, found: n_atoms_d });
    }
    for (len, name) in [
        (n_atoms, "n_atoms"),
        (n_trials, "n_trials"),
        (n_chan, "n_chan"),
        (n_times_valid, "n_times_valid"),
        (n_times_atom, "n_times_atom"),
    ] {
        if len == 0 {
            return Err(DictError::EmptyDimension { name });
        }
    }

    let n_times = n_times_valid + n_times_atom - 1;
    let mut x_hat = Data::zeros((n_trials, n_chan, n_times));
    for i in 0..n_trials {
        for p in 0..n_chan {
            let mut out_row = x_hat.slice_mut(s![i, p, ..]);
            for k in 0..n_atoms {
                let contrib = convolve_full(z.slice(s![k, i, ..]), d.slice(s![k, p, ..]));
                out_row.scaled_add(1.0, &contrib);
            }
        }
    }
    Ok(x_hat)
}
