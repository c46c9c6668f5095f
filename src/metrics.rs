use serde::Serialize;

use crate::tolerance::LABEL_VARIANCE_EPS;

/// R² is not reported below this many samples.
pub const FIT_R2_MIN_SAMPLES: usize = 10;

/// How well the fitted coefficients reproduce the labels they were fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FitMetrics {
    pub samples: usize,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    /// Share of samples where fitted and realized momentum share a sign.
    pub hit_rate: Option<f64>,
    pub r2: Option<f64>,
}

/// Residual sums over the training samples, one `record` per sample.
///
/// Label variance is tracked with Welford's update so a near-constant label
/// (a clean trend) does not cancel catastrophically.
#[derive(Debug, Clone, Copy, Default)]
pub struct InSampleFit {
    n: usize,
    abs_resid: f64,
    sq_resid: f64,
    same_sign: usize,
    label_mean: f64,
    label_m2: f64,
}

impl InSampleFit {
    pub fn record(&mut self, label: f64, fitted: f64) {
        if !label.is_finite() || !fitted.is_finite() {
            return;
        }
        let resid = label - fitted;
        self.n += 1;
        self.abs_resid += resid.abs();
        self.sq_resid += resid * resid;
        if label * fitted > 0.0 {
            self.same_sign += 1;
        }
        let delta = label - self.label_mean;
        self.label_mean += delta / self.n as f64;
        self.label_m2 += delta * (label - self.label_mean);
    }

    pub fn samples(&self) -> usize {
        self.n
    }

    pub fn metrics(&self) -> FitMetrics {
        if self.n == 0 {
            return FitMetrics::default();
        }
        let n = self.n as f64;
        let r2 = (self.n >= FIT_R2_MIN_SAMPLES).then(|| {
            if self.label_m2 <= LABEL_VARIANCE_EPS {
                0.0
            } else {
                1.0 - self.sq_resid / self.label_m2
            }
        });
        FitMetrics {
            samples: self.n,
            mae: Some(self.abs_resid / n),
            rmse: Some((self.sq_resid / n).sqrt()),
            hit_rate: Some(self.same_sign as f64 / n),
            r2,
        }
    }
}
