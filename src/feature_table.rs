use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sample::Sample;

/// Significant digits kept for every value in the table.
pub const FEATURE_TABLE_SIG_DIGITS: i32 = 12;
/// Fixed decimals never drop below this, so prices keep their usual shape.
pub const FEATURE_TABLE_MIN_DECIMALS: usize = 12;
/// Upper bound on decimals for values very close to zero.
pub const FEATURE_TABLE_MAX_DECIMALS: usize = 24;

/// Column names: `p__<inst>` for each level, `m__<inst>` for each slope,
/// then `y`.
pub fn feature_columns(instruments: &[String]) -> Vec<String> {
    let mut cols: Vec<String> = instruments.iter().map(|i| format!("p__{}", i)).collect();
    cols.extend(instruments.iter().map(|i| format!("m__{}", i)));
    cols
}

/// Fixed-point text with at least [`FEATURE_TABLE_SIG_DIGITS`] significant
/// digits: small slopes get more decimals instead of losing digits.
pub fn format_value(v: f64) -> String {
    let decimals = if v == 0.0 || !v.is_finite() {
        FEATURE_TABLE_MIN_DECIMALS
    } else {
        let magnitude = v.abs().log10().floor() as i32;
        (FEATURE_TABLE_SIG_DIGITS - 1 - magnitude).clamp(
            FEATURE_TABLE_MIN_DECIMALS as i32,
            FEATURE_TABLE_MAX_DECIMALS as i32,
        ) as usize
    };
    format!("{:.*}", decimals, v)
}

/// Streams samples into the supervised CSV consumed by the offline
/// network trainer/inference tools.
pub struct FeatureTableWriter<W: Write> {
    inner: csv::Writer<W>,
    dim: usize,
    rows: usize,
}

impl FeatureTableWriter<std::fs::File> {
    pub fn create<P: AsRef<Path>>(path: P, instruments: &[String]) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Self::new(file, instruments)
    }
}

impl<W: Write> FeatureTableWriter<W> {
    pub fn new(writer: W, instruments: &[String]) -> Result<Self> {
        let mut inner = csv::Writer::from_writer(writer);
        let mut header = feature_columns(instruments);
        header.push("y".to_string());
        inner.write_record(&header)?;
        Ok(Self {
            inner,
            dim: 2 * instruments.len(),
            rows: 0,
        })
    }

    pub fn write_sample(&mut self, sample: &Sample) -> Result<()> {
        debug_assert_eq!(sample.dim(), self.dim);
        let record: Vec<String> = sample
            .features()
            .iter()
            .chain(std::iter::once(&sample.label_slope))
            .map(|&v| format_value(v))
            .collect();
        self.inner.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}
