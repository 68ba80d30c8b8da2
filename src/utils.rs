//! Small conversion helpers shared by the crate surface.

use ndarray::Array2;

/// Convert a dense matrix into row-major nested vectors.
///
/// Used at the Python boundary to hand matrices back as plain lists; kept
/// feature-independent so native callers can use it for serialization too.
pub fn rows_to_vecs(arr: &Array2<f64>) -> Vec<Vec<f64>> {
    let mut out = Vec::with_capacity(arr.nrows());
    for row in arr.rows() {
        out.push(row.to_vec());
    }
    out
}
