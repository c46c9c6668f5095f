use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{NowcastError, Result};
use crate::model::DfRow;

/// Columns the aggregated market table must carry, in any order.
pub const DF_ALL_REQUIRED_COLUMNS: [&str; 5] = ["instrument", "side", "fecha_nano", "ts_sec", "vwap"];

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    instrument: usize,
    side: usize,
    fecha_nano: usize,
    ts_sec: usize,
    vwap: usize,
}

impl ColumnIndex {
    fn from_header(header: &StringRecord, source: &str) -> Result<Self> {
        let find = |name: &str| header.iter().position(|c| c.trim() == name);
        let missing: Vec<String> = DF_ALL_REQUIRED_COLUMNS
            .iter()
            .filter(|&&c| find(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(NowcastError::MissingColumns {
                path: source.to_string(),
                missing,
            });
        }
        // Presence checked above.
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            instrument: at("instrument"),
            side: at("side"),
            fecha_nano: at("fecha_nano"),
            ts_sec: at("ts_sec"),
            vwap: at("vwap"),
        })
    }
}

/// Read every row of `df_all.csv`. The header is validated before any data
/// row is parsed.
pub fn read_df_all<P: AsRef<Path>>(path: P) -> Result<Vec<DfRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    read_df_rows(file, &path.display().to_string())
}

/// Parse aggregated rows from any reader; `source` names it in errors.
pub fn read_df_rows<R: Read>(reader: R, source: &str) -> Result<Vec<DfRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    let cols = ColumnIndex::from_header(&header, source)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let field = |i: usize| record.get(i).map(str::trim).unwrap_or("");
        rows.push(DfRow {
            instrument: field(cols.instrument).to_string(),
            side: field(cols.side).to_string(),
            fecha_nano: parse_i64(field(cols.fecha_nano)),
            ts_sec: parse_f64(field(cols.ts_sec)),
            vwap: parse_f64(field(cols.vwap)),
        });
    }
    tracing::debug!(source, rows = rows.len(), "Read aggregated market rows");
    Ok(rows)
}

fn parse_f64(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_i64(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}
