use std::collections::HashMap;

use crate::model::{DfRow, TradePoint};
use crate::tolerance::same_instant;

/// Time-ordered, de-duplicated trades of one instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSeries {
    points: Vec<TradePoint>,
}

impl TradeSeries {
    /// Sort by time and collapse trades at the same instant, keeping the one
    /// seen last.
    pub fn from_points(mut points: Vec<TradePoint>) -> Self {
        // Stable: among identical times the input order survives, so the
        // last one wins below.
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        let mut out: Vec<TradePoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(last) if same_instant(last.time, p.time) => *last = p,
                _ => out.push(p),
            }
        }
        Self { points: out }
    }

    pub fn points(&self) -> &[TradePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&TradePoint> {
        self.points.get(idx)
    }

    /// Index of the latest trade at or before `t`.
    pub fn last_index_at_or_before(&self, t: f64) -> Option<usize> {
        let n = self.points.partition_point(|p| p.time <= t);
        n.checked_sub(1)
    }

    /// Inter-arrival times `time[i] - time[i-1]` for `i` in `1..=end`.
    pub fn intervals_through(&self, end: usize) -> Vec<f64> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let end = end.min(self.points.len().saturating_sub(1));
        self.points[..=end]
            .windows(2)
            .map(|w| w[1].time - w[0].time)
            .collect()
    }
}

/// Owner of every instrument's trade series for one run.
///
/// Instruments keep the order in which they first appear in the input rows;
/// that order is the deterministic tie-break for peer ranking.
#[derive(Debug, Clone, Default)]
pub struct TradeSeriesStore {
    instruments: Vec<String>,
    series: Vec<TradeSeries>,
    index: HashMap<String, usize>,
}

impl TradeSeriesStore {
    pub fn from_rows(rows: &[DfRow]) -> Self {
        let mut instruments: Vec<String> = Vec::new();
        let mut raw: Vec<Vec<TradePoint>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in rows {
            if row.instrument.is_empty() {
                continue;
            }
            let slot = *index.entry(row.instrument.clone()).or_insert_with(|| {
                instruments.push(row.instrument.clone());
                raw.push(Vec::new());
                instruments.len() - 1
            });
            if let Some(p) = row.trade_point() {
                raw[slot].push(p);
            }
        }

        let series = raw.into_iter().map(TradeSeries::from_points).collect();
        Self {
            instruments,
            series,
            index,
        }
    }

    /// Series for `instrument`; empty when it had no usable trade rows.
    pub fn get(&self, instrument: &str) -> Option<&TradeSeries> {
        self.index.get(instrument).map(|&i| &self.series[i])
    }

    pub fn trade_count(&self, instrument: &str) -> usize {
        self.get(instrument).map(TradeSeries::len).unwrap_or(0)
    }

    /// `(instrument, trade count)` in first-seen order.
    pub fn trade_counts(&self) -> Vec<(&str, usize)> {
        self.instruments
            .iter()
            .zip(&self.series)
            .map(|(name, s)| (name.as_str(), s.len()))
            .collect()
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
