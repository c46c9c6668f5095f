use thiserror::Error;

use crate::error::{NowcastError, Result};
use crate::tolerance::{ELIMINATION_SKIP_EPS, PIVOT_EPS};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no usable pivot in column {column}")]
pub struct SingularPivot {
    pub column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Jacobi-scale the system by `sqrt(diag A)` before eliminating.
    pub scale_columns: bool,
}

/// Running `Σ x xᵗ` / `Σ x y` for an unweighted least-squares fit.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    dim: usize,
    xtx: Vec<Vec<f64>>,
    xty: Vec<f64>,
    samples: usize,
}

impl NormalEquations {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            xtx: vec![vec![0.0; dim]; dim],
            xty: vec![0.0; dim],
            samples: 0,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Add one row. Rows of the wrong length are a programming error.
    pub fn add(&mut self, x: &[f64], y: f64) {
        assert_eq!(x.len(), self.dim, "feature row dimension mismatch");
        for i in 0..self.dim {
            self.xty[i] += x[i] * y;
            let row = &mut self.xtx[i];
            for j in 0..self.dim {
                row[j] += x[i] * x[j];
            }
        }
        self.samples += 1;
    }

    pub fn xtx(&self) -> &[Vec<f64>] {
        &self.xtx
    }

    pub fn xty(&self) -> &[f64] {
        &self.xty
    }

    /// Least-squares coefficients for everything added so far.
    pub fn solve(&self, opts: SolveOptions) -> Result<Vec<f64>> {
        let solved = if opts.scale_columns {
            self.solve_scaled()
        } else {
            solve_linear(self.xtx.clone(), self.xty.clone())
        };
        solved.map_err(|e| NowcastError::SingularSystem {
            n_samples: self.samples,
            dim: self.dim,
            column: e.column,
        })
    }

    fn solve_scaled(&self) -> std::result::Result<Vec<f64>, SingularPivot> {
        let mut scale = Vec::with_capacity(self.dim);
        for i in 0..self.dim {
            let d = self.xtx[i][i].max(0.0).sqrt();
            if !d.is_finite() || d <= f64::MIN_POSITIVE {
                return Err(SingularPivot { column: i });
            }
            scale.push(d);
        }
        let a: Vec<Vec<f64>> = self
            .xtx
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, v)| v / (scale[i] * scale[j]))
                    .collect()
            })
            .collect();
        let b: Vec<f64> = self.xty.iter().zip(&scale).map(|(v, d)| v / d).collect();
        let z = solve_linear(a, b)?;
        Ok(z.iter().zip(&scale).map(|(v, d)| v / d).collect())
    }
}

/// Solve `A x = b` by Gauss-Jordan elimination with partial pivoting.
///
/// A pivot is rejected when it falls below [`PIVOT_EPS`] relative to the
/// largest magnitude its column had before elimination.
pub fn solve_linear(mut a: Vec<Vec<f64>>, b: Vec<f64>) -> std::result::Result<Vec<f64>, SingularPivot> {
    let n = a.len();
    let col_scale: Vec<f64> = (0..n)
        .map(|c| a.iter().map(|row| row[c].abs()).fold(0.0, f64::max))
        .collect();
    for (row, rhs) in a.iter_mut().zip(b) {
        row.push(rhs);
    }

    for col in 0..n {
        let mut piv = col;
        let mut best = a[col][col].abs();
        for (r, row) in a.iter().enumerate().skip(col + 1) {
            let v = row[col].abs();
            if v > best {
                best = v;
                piv = r;
            }
        }
        if !best.is_finite() || best < pivot_floor(col_scale[col]) {
            return Err(SingularPivot { column: col });
        }
        a.swap(piv, col);

        let div = a[col][col];
        for v in a[col][col..].iter_mut() {
            *v /= div;
        }
        let pivot_row = a[col].clone();
        for (r, row) in a.iter_mut().enumerate() {
            if r == col {
                continue;
            }
            let factor = row[col];
            if factor.abs() < ELIMINATION_SKIP_EPS {
                continue;
            }
            for j in col..=n {
                row[j] -= factor * pivot_row[j];
            }
        }
    }

    Ok(a.into_iter().map(|row| row[n]).collect())
}

fn pivot_floor(col_scale: f64) -> f64 {
    PIVOT_EPS * col_scale.max(1.0)
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
