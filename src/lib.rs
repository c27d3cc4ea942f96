pub mod chained;
pub mod chart;
pub mod open;
pub mod workload;

use collections::TableError;
use thiserror::{self, Error};

pub use chained::ChainedBenchConfig;
pub use chart::{ChartData, Series};
pub use open::OpenBenchConfig;

#[derive(Debug, Error)]
pub enum BenchError {
    /// A benchmark config value is out of range
    #[error("Invalid config, {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// No experiment produces a chart with this title
    #[error("Unknown chart title: {0}")]
    UnknownChart(String),

    /// Derived table error
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Titles of every chart, chaining first, under the default configs
pub fn titles() -> Vec<String> {
    let mut all = chained::titles(&ChainedBenchConfig::default());
    all.extend(open::titles(&OpenBenchConfig::default()));
    all
}

/// Runs the experiment behind `title` with the default configs
pub fn build(title: &str) -> Result<ChartData, BenchError> {
    if let Some(chart) = chained::try_build(title, &ChainedBenchConfig::default())? {
        return Ok(chart);
    }
    if let Some(chart) = open::try_build(title, &OpenBenchConfig::default())? {
        return Ok(chart);
    }
    Err(BenchError::UnknownChart(title.into()))
}
