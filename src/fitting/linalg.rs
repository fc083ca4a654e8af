//! Small dense linear algebra for the fitter

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting
///
/// Returns `None` when a pivot falls below `1e-12` in magnitude.
pub(crate) fn invert<const N: usize>(matrix: [[f64; N]; N]) -> Option<[[f64; N]; N]> {
    let mut a = matrix;
    let mut inv = [[0.0; N]; N];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..N {
        let pivot_row = (col..N).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot_row][col].abs() < 1e-12 || !a[pivot_row][col].is_finite() {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for k in 0..N {
            a[col][k] /= pivot;
            inv[col][k] /= pivot;
        }

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..N {
                a[row][k] -= factor * a[col][k];
                inv[row][k] -= factor * inv[col][k];
            }
        }
    }

    Some(inv)
}

/// `matrix * vector`
pub(crate) fn mat_vec<const N: usize>(matrix: &[[f64; N]; N], vector: &[f64; N]) -> [f64; N] {
    let mut out = [0.0; N];
    for (slot, row) in out.iter_mut().zip(matrix) {
        *slot = row.iter().zip(vector).map(|(a, b)| a * b).sum();
    }
    out
}

/// Dot product
pub(crate) fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Largest absolute component
pub(crate) fn max_abs<const N: usize>(v: &[f64; N]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}
