use std::path::Path;

use crate::config::RunConfig;
use crate::data::read_df_all;
use crate::error::{NowcastError, Result};
use crate::feature_table::{feature_columns, FeatureTableWriter};
use crate::forecast::{project, Coefficient, ForecastResult};
use crate::metrics::InSampleFit;
use crate::model::DfRow;
use crate::peers::select_peers;
use crate::sample::{Sample, SampleBuilder};
use crate::series::TradeSeriesStore;
use crate::solver::{dot, NormalEquations};

/// Full batch run: read the table, fit, project.
pub fn run(cfg: &RunConfig) -> Result<ForecastResult> {
    cfg.validate()?;
    let rows = read_df_all(&cfg.df_path)?;
    run_on_rows(&rows, cfg)
}

/// Same as [`run`] on rows already in memory. The feature table is still
/// written to `cfg.xy_out`.
pub fn run_on_rows(rows: &[DfRow], cfg: &RunConfig) -> Result<ForecastResult> {
    cfg.validate()?;
    tracing::info!(
        target_instrument = %cfg.target,
        k_last = cfg.k_last,
        top_others = cfg.top_others,
        dt_median_window = cfg.dt_median_window,
        rows = rows.len(),
        "Starting nowcast run"
    );

    let store = TradeSeriesStore::from_rows(rows);
    tracing::info!(instruments = store.len(), "Built trade series");

    let selected = select_peers(&store.trade_counts(), &cfg.target, cfg.top_others)?;
    tracing::info!(selected = ?selected, "Selected instruments");

    let builder = SampleBuilder::new(&store, &selected, cfg.k_last)?;
    let mut system = NormalEquations::new(builder.dim());
    let mut samples: Vec<Sample> = Vec::with_capacity(builder.candidates());
    // Opened on the first valid sample so a run without samples leaves no file.
    let mut table: Option<FeatureTableWriter<std::fs::File>> = None;

    for sample in builder.samples() {
        let writer = match table.as_mut() {
            Some(w) => w,
            None => table.insert(FeatureTableWriter::create(&cfg.xy_out, &selected)?),
        };
        writer.write_sample(&sample)?;
        system.add(&sample.features(), sample.label_slope);
        samples.push(sample);
    }
    if let Some(writer) = table {
        writer.finish()?;
    }
    tracing::info!(
        kept = samples.len(),
        skipped = builder.candidates() - samples.len(),
        path = %cfg.xy_out.display(),
        "Wrote feature table"
    );

    let Some(last) = samples.last() else {
        return Err(NowcastError::NoValidSamples {
            candidates: builder.candidates(),
        });
    };

    let beta = system.solve(cfg.solve_options())?;
    tracing::info!(dim = system.dim(), samples = system.samples(), "Solved normal equations");

    let mut fit = InSampleFit::default();
    for s in &samples {
        fit.record(s.label_slope, dot(&beta, &s.features()));
    }

    let target_series = store
        .get(&cfg.target)
        .ok_or_else(|| NowcastError::TargetNotFound(cfg.target.clone()))?;
    let proj = project(&beta, last, target_series, cfg.dt_median_window);
    tracing::info!(
        p0 = proj.p0,
        m_hat = proj.m_hat,
        dt_hat = proj.dt_hat,
        p_next_hat = proj.p_next_hat,
        "Forecast ready"
    );

    let coefficients = feature_columns(&selected)
        .into_iter()
        .zip(&beta)
        .map(|(feature, &beta)| Coefficient { feature, beta })
        .collect();

    Ok(ForecastResult {
        selected_instruments: selected,
        n_samples: samples.len(),
        last_t0: last.t0,
        p0: proj.p0,
        m_hat: proj.m_hat,
        dt_hat_sec: proj.dt_hat,
        p_next_hat: proj.p_next_hat,
        xy_out: path_string(&cfg.xy_out),
        coefficients,
        fit: fit.metrics(),
    })
}

fn path_string(p: &Path) -> String {
    p.display().to_string()
}
