use crate::error::{NowcastError, Result};
use crate::regression::{fit_last_k, FitError};
use crate::series::{TradeSeries, TradeSeriesStore};

/// One synchronized observation across the selected instruments.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Target index of `t0` within its series.
    pub index: usize,
    pub t0: f64,
    pub t1: f64,
    /// Target first. The target level is its observed trade price at `t0`;
    /// peer levels are regression values.
    pub levels: Vec<f64>,
    pub slopes: Vec<f64>,
    /// Target regression slope at `t1`.
    pub label_slope: f64,
    pub dt: f64,
    pub level_now: f64,
}

impl Sample {
    /// `[levels.., slopes..]`, the design-matrix row.
    pub fn features(&self) -> Vec<f64> {
        let mut x = Vec::with_capacity(self.levels.len() * 2);
        x.extend_from_slice(&self.levels);
        x.extend_from_slice(&self.slopes);
        x
    }

    pub fn dim(&self) -> usize {
        self.levels.len() + self.slopes.len()
    }
}

/// Walks the target's trades and pairs each with the next trade's momentum.
#[derive(Debug, Clone)]
pub struct SampleBuilder<'a> {
    target: &'a TradeSeries,
    series: Vec<&'a TradeSeries>,
    k: usize,
}

impl<'a> SampleBuilder<'a> {
    /// `selected` must list the target first.
    pub fn new(store: &'a TradeSeriesStore, selected: &[String], k: usize) -> Result<Self> {
        let mut series = Vec::with_capacity(selected.len());
        for (j, name) in selected.iter().enumerate() {
            let s = store.get(name).ok_or_else(|| {
                if j == 0 {
                    NowcastError::TargetNotFound(name.clone())
                } else {
                    NowcastError::UnknownInstrument(name.clone())
                }
            })?;
            series.push(s);
        }
        let Some(&target) = series.first() else {
            return Err(NowcastError::Config("no instruments selected".to_string()));
        };
        let need = k.max(2);
        if target.len() < need {
            return Err(NowcastError::TooFewTargetPoints {
                have: target.len(),
                need,
            });
        }
        Ok(Self {
            target,
            series,
            k: k.max(1),
        })
    }

    /// Number of target trades that could yield a sample.
    pub fn candidates(&self) -> usize {
        self.target.len().saturating_sub(self.k)
    }

    /// Feature dimension `2K`.
    pub fn dim(&self) -> usize {
        2 * self.series.len()
    }

    /// Build the sample anchored at target trade `i`. Needs `i + 1` to exist
    /// for the label.
    pub fn sample_at(&self, i: usize) -> std::result::Result<Sample, FitError> {
        let pts = self.target.points();
        let (Some(now), Some(next)) = (pts.get(i), pts.get(i + 1)) else {
            return Err(FitError::InsufficientData {
                have: pts.len(),
                need: i + 2,
            });
        };
        let (t0, t1) = (now.time, next.time);

        let k = self.series.len();
        let mut levels = Vec::with_capacity(k);
        let mut slopes = Vec::with_capacity(k);
        for (j, s) in self.series.iter().enumerate() {
            let fit = fit_last_k(s, t0, self.k)?;
            if j == 0 {
                levels.push(now.price);
            } else {
                levels.push(fit.level);
            }
            slopes.push(fit.slope);
        }
        let label = fit_last_k(self.target, t1, self.k)?;

        Ok(Sample {
            index: i,
            t0,
            t1,
            level_now: levels[0],
            levels,
            slopes,
            label_slope: label.slope,
            dt: t1 - t0,
        })
    }

    /// Valid samples in increasing time order; windows that cannot be fitted
    /// are skipped.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        let start = self.k - 1;
        let stop = self.target.len().saturating_sub(1);
        (start..stop).filter_map(move |i| match self.sample_at(i) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::debug!(index = i, reason = %e, "Skipping sample");
                None
            }
        })
    }
}
