use thiserror::Error;

use crate::series::TradeSeries;
use crate::tolerance::COVARIANCE_DET_EPS;

/// Why a window could not be fitted. Both cases mean "not enough history
/// here", not a failure of the run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("insufficient data: {have} trades available, window needs {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("degenerate window: trade times have no spread")]
    DegenerateWindow,
}

/// Straight line fitted over a trade window, evaluated at the query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFit {
    /// Line value at the query time (extrapolated from the window).
    pub level: f64,
    /// Price change per second.
    pub slope: f64,
}

/// Least-squares line over the last `k` trades at or before `t`.
///
/// Times are centered on the window mean before solving the 2x2 normal
/// equations, so epoch-second timestamps do not swamp the slope.
pub fn fit_last_k(series: &TradeSeries, t: f64, k: usize) -> Result<LocalFit, FitError> {
    let need = k.max(1);
    if series.len() < need {
        return Err(FitError::InsufficientData {
            have: series.len(),
            need,
        });
    }
    let Some(end) = series.last_index_at_or_before(t) else {
        return Err(FitError::InsufficientData { have: 0, need });
    };
    if end + 1 < need {
        return Err(FitError::InsufficientData {
            have: end + 1,
            need,
        });
    }
    let window = &series.points()[end + 1 - need..=end];

    let n = need as f64;
    let t_mean = window.iter().map(|p| p.time).sum::<f64>() / n;
    let mut s01 = 0.0;
    let mut s11 = 0.0;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    for p in window {
        let tc = p.time - t_mean;
        s01 += tc;
        s11 += tc * tc;
        b0 += p.price;
        b1 += tc * p.price;
    }
    let det = n * s11 - s01 * s01;
    if det.abs() < COVARIANCE_DET_EPS {
        return Err(FitError::DegenerateWindow);
    }
    let intercept = (b0 * s11 - s01 * b1) / det;
    let slope = (n * b1 - s01 * b0) / det;
    Ok(LocalFit {
        level: intercept + slope * (t - t_mean),
        slope,
    })
}
