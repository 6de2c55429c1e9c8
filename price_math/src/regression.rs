//! Ordinary least squares for small design matrices
//!
//! Used for deterministic trend terms, so the number of columns is tiny and
//! the normal equations are solved directly.

use crate::{MathError, Result};

/// Solve `min ||y - X b||^2` where `rows` are the rows of `X`.
pub fn least_squares(rows: &[Vec<f64>], y: &[f64]) -> Result<Vec<f64>> {
    if rows.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            rows.len(),
            y.len()
        )));
    }
    let k = match rows.first() {
        Some(row) => row.len(),
        None => {
            return Err(MathError::InsufficientData(
                "Least squares needs at least one observation".to_string(),
            ))
        }
    };
    if k == 0 {
        return Ok(Vec::new());
    }
    if rows.len() < k {
        return Err(MathError::InsufficientData(format!(
            "Least squares with {} columns needs at least {} rows, have {}",
            k,
            k,
            rows.len()
        )));
    }

    // Normal equations: (X'X) b = X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &target) in rows.iter().zip(y.iter()) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    solve_linear_system(xtx, xty)
}

/// Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "Linear system must be square and match the right-hand side".to_string(),
        ));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(MathError::CalculationError(
                "Linear system is singular".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for c in col..n {
                let delta = factor * a[col][c];
                a[row][c] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|c| a[row][c] * x[c]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}
