use serde::Serialize;

use crate::metrics::FitMetrics;
use crate::sample::Sample;
use crate::series::TradeSeries;
use crate::solver::dot;

/// `dt_hat` when the target has no inter-arrival history at all.
pub const DEFAULT_DT_HAT_SEC: f64 = 1.0;

/// One-step-ahead projection from the latest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub p0: f64,
    pub m_hat: f64,
    pub dt_hat: f64,
    pub p_next_hat: f64,
}

/// Terminal output of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub selected_instruments: Vec<String>,
    pub n_samples: usize,
    pub last_t0: f64,
    pub p0: f64,
    pub m_hat: f64,
    pub dt_hat_sec: f64,
    pub p_next_hat: f64,
    pub xy_out: String,
    pub coefficients: Vec<Coefficient>,
    pub fit: FitMetrics,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coefficient {
    pub feature: String,
    pub beta: f64,
}

/// Standard median of the last `window` values (all of them if fewer).
/// Returns `None` on empty input.
pub fn tail_median(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = window.clamp(1, values.len());
    let mut w = values[values.len() - m..].to_vec();
    w.sort_by(|a, b| a.total_cmp(b));
    let mid = m / 2;
    if m % 2 == 1 {
        Some(w[mid])
    } else {
        Some(0.5 * (w[mid - 1] + w[mid]))
    }
}

/// Typical spacing between target trades up to (and including) `t0`.
pub fn typical_interval(target: &TradeSeries, t0: f64, window: usize) -> f64 {
    let Some(end) = target.last_index_at_or_before(t0) else {
        return DEFAULT_DT_HAT_SEC;
    };
    let intervals = target.intervals_through(end.max(1));
    tail_median(&intervals, window).unwrap_or(DEFAULT_DT_HAT_SEC)
}

/// Apply `beta` to the last sample and step one typical interval ahead.
pub fn project(beta: &[f64], last: &Sample, target: &TradeSeries, window: usize) -> Projection {
    let m_hat = dot(beta, &last.features());
    let dt_hat = typical_interval(target, last.t0, window);
    let p0 = last.level_now;
    Projection {
        p0,
        m_hat,
        dt_hat,
        p_next_hat: p0 + m_hat * dt_hat,
    }
}
