//! Numeric tolerances shared by the estimator, the series store and the solver.
//!
//! All of them are tied to IEEE double precision and the magnitudes seen in tick
//! data (prices around 1e0..1e5, timestamps in epoch seconds around 1e9).

/// Two trade times closer than this (seconds) are the same instant: one
/// nanosecond, the resolution of the source timestamps.
pub const DEDUP_TIME_EPS: f64 = 1e-9;

/// Pivot magnitude under which a column is treated as linearly dependent
/// during Gaussian elimination. Relative: it is multiplied by the column's
/// largest pre-elimination magnitude (floored at 1), since `Σ x xᵗ` grows
/// with price² and so does the rounding left in a dependent column.
pub const PIVOT_EPS: f64 = 1e-14;

/// Determinant of the centered 2x2 time covariance under which a regression
/// window is considered degenerate (all times coincide).
pub const COVARIANCE_DET_EPS: f64 = 1e-18;

/// Label variance under which R² is reported as 0 instead of dividing.
pub const LABEL_VARIANCE_EPS: f64 = 1e-18;

/// Eliminations with a factor below this are skipped.
pub const ELIMINATION_SKIP_EPS: f64 = 1e-15;

pub fn same_instant(a: f64, b: f64) -> bool {
    (a - b).abs() < DEDUP_TIME_EPS
}
