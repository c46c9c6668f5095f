use thiserror::Error;

#[derive(Error, Debug)]
pub enum NowcastError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path} is missing required columns: {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },

    #[error("target instrument not found among trade rows: {0}")]
    TargetNotFound(String),

    #[error("selected instrument has no trade series: {0}")]
    UnknownInstrument(String),

    #[error("too few target trades: have {have}, need at least {need}")]
    TooFewTargetPoints { have: usize, need: usize },

    #[error("no valid samples generated from {candidates} candidate target trades")]
    NoValidSamples { candidates: usize },

    #[error(
        "normal equations are singular at column {column} (samples={n_samples}, dim={dim})"
    )]
    SingularSystem {
        n_samples: usize,
        dim: usize,
        column: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NowcastError>;
