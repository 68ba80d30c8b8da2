//! Proximal projection onto the per-atom ℓ₂ unit ball.
//!
//! The norm constraint on the dictionary is enforced by rescaling each
//! parameter row by `1 / max(1, ‖row‖₂)`. Rows already inside the ball are
//! copied through untouched (no arithmetic is applied to them), which makes
//! the operator an exact no-op there and idempotent overall: atoms that were
//! large before projection land on the unit sphere, atoms that were small
//! keep their norm.
use crate::dictionary::types::AtomParams;

/// Project every atom row of `uv` onto the ℓ₂ unit ball.
///
/// Returns a new array; the input is never mutated. Rows with
/// `‖row‖₂ <= 1` are bit-identical in the output.
pub fn project_unit_ball(uv: &AtomParams) -> AtomParams {
    let mut out = uv.to_owned();
    for mut row in out.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 1.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    out
}
