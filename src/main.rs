use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tick_nowcast::config::RunConfig;
use tick_nowcast::pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "tick-nowcast",
    about = "Forecast the next trade price of an instrument from tick data"
)]
struct Cli {
    /// TOML run config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Aggregated market table (instrument, side, fecha_nano, ts_sec, vwap)
    #[arg(long = "df")]
    df_path: Option<PathBuf>,
    #[arg(long)]
    target: Option<String>,
    /// Trades per local regression window
    #[arg(long = "k-last", alias = "k_last")]
    k_last: Option<usize>,
    /// Most active peers to add next to the target
    #[arg(long = "top-others", alias = "top_others")]
    top_others: Option<usize>,
    /// Inter-arrival times used for the dt median
    #[arg(long = "dt-median-window", alias = "dt_median_window")]
    dt_median_window: Option<usize>,
    /// Feature table output path
    #[arg(long = "xy-out", alias = "xy_out")]
    xy_out: Option<PathBuf>,
    /// Jacobi-scale the normal equations before solving
    #[arg(long)]
    scale_columns: bool,
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => {
                dotenvy::dotenv().ok();
                RunConfig::default()
            }
        };
        if let Some(v) = self.df_path {
            cfg.df_path = v;
        }
        if let Some(v) = self.target {
            cfg.target = v;
        }
        if let Some(v) = self.k_last {
            cfg.k_last = v;
        }
        if let Some(v) = self.top_others {
            cfg.top_others = v;
        }
        if let Some(v) = self.dt_median_window {
            cfg.dt_median_window = v;
        }
        if let Some(v) = self.xy_out {
            cfg.xy_out = v;
        }
        cfg.scale_columns |= self.scale_columns;
        cfg.logging.json |= self.log_json;
        cfg.validate().context("invalid run parameters")?;
        Ok(cfg)
    }
}

fn init_tracing(cfg: &RunConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::try_new(&cfg.logging.level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cfg.logging.json {
        builder.with_ansi(false).json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cfg = match Cli::parse().into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load run parameters: {:#}", e);
            std::process::exit(2);
        }
    };
    init_tracing(&cfg);

    let result = pipeline::run(&cfg)
        .with_context(|| format!("nowcast failed for target {}", cfg.target))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
