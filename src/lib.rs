pub mod config;
pub mod data;
pub mod error;
pub mod feature_table;
pub mod forecast;
pub mod metrics;
pub mod model;
pub mod peers;
pub mod pipeline;
pub mod regression;
pub mod sample;
pub mod series;
pub mod solver;
pub mod tolerance;

pub use error::{NowcastError, Result};
