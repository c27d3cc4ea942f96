//! Experiments on [`ChainedHashTable`] across the hash strategies

use collections::{
    BitMix, ChainedHashTable, Division, FnvLike, HashStrategy, Multiplication, XorShift,
    hashmap::DEFAULT_MAX_LOAD_FACTOR,
};
use log::{debug, info};

use crate::{
    BenchError,
    chart::{ChartData, Series},
    workload::{self, MAX_ELEMENTS},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChainedBenchConfig {
    pub element_count: usize,
    pub capacity: usize,
    pub trials: usize,
    pub seed: u64,
}

impl Default for ChainedBenchConfig {
    fn default() -> Self {
        Self {
            element_count: 100_000,
            capacity: 1000,
            trials: 20,
            seed: 42,
        }
    }
}

impl ChainedBenchConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.element_count == 0 || self.element_count > MAX_ELEMENTS {
            return Err(BenchError::InvalidConfig {
                field: "element_count",
                reason: "must be positive and fit an i32",
            });
        }
        if self.capacity == 0 {
            return Err(BenchError::InvalidConfig {
                field: "capacity",
                reason: "must be positive",
            });
        }
        if self.trials == 0 {
            return Err(BenchError::InvalidConfig {
                field: "trials",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

type Table<'h> = ChainedHashTable<i32, i32, &'h dyn HashStrategy<i32>>;

type HashCase = (&'static str, Box<dyn HashStrategy<i32>>);

fn hash_cases() -> Vec<HashCase> {
    vec![
        ("Division", Box::new(Division)),
        ("Multiplication", Box::new(Multiplication)),
        ("BitMix", Box::new(BitMix)),
        ("FNV-like", Box::new(FnvLike)),
        ("XorShift", Box::new(XorShift)),
    ]
}

/// What gets recorded for a filled table
#[derive(Debug, Clone, Copy)]
enum Metric {
    Millis,
    LoadFactor,
    MaxChain,
    MinChain,
    MinNonEmptyChain,
}

impl Metric {
    fn read(self, table: &Table<'_>, ms: f64) -> f64 {
        match self {
            Metric::Millis => ms,
            Metric::LoadFactor => table.load_factor(),
            Metric::MaxChain => table.chain_length_stats(false).max as f64,
            Metric::MinChain => table.chain_length_stats(false).min as f64,
            Metric::MinNonEmptyChain => table.chain_length_stats(true).min as f64,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Experiment {
    KeyGeneration,
    Insert,
    LoadFactor,
    AverageLoadFactor,
    MaxChain,
    MinChain,
    MinNonEmptyChain,
}

impl Experiment {
    const ALL: [Experiment; 7] = [
        Experiment::KeyGeneration,
        Experiment::Insert,
        Experiment::LoadFactor,
        Experiment::AverageLoadFactor,
        Experiment::MaxChain,
        Experiment::MinChain,
        Experiment::MinNonEmptyChain,
    ];

    fn title(self, c: &ChainedBenchConfig) -> String {
        let n = c.element_count;
        match self {
            Experiment::KeyGeneration => format!("Chaining: generating {n} keys"),
            Experiment::Insert => format!("Chaining: inserting {n} elements"),
            Experiment::LoadFactor => format!("Chaining: load factor n/m ({n} elements)"),
            Experiment::AverageLoadFactor => {
                format!("Chaining: average load factor ({} trials)", c.trials)
            }
            Experiment::MaxChain => format!("Chaining: max chain length ({n} elements)"),
            Experiment::MinChain => "Chaining: min chain length (empty buckets included)".into(),
            Experiment::MinNonEmptyChain => {
                "Chaining: min chain length (empty buckets ignored)".into()
            }
        }
    }

    fn run(self, c: &ChainedBenchConfig) -> Result<ChartData, BenchError> {
        let (series, total_ms) = match self {
            Experiment::KeyGeneration => {
                let mut s = Series::new("Generation");
                let mut total = 0f64;
                for t in 1..=c.trials {
                    let seed = workload::trial_seed(c.seed, t);
                    let (_, ms) = workload::timed(|| workload::keys(c.element_count, seed));
                    total += ms;
                    s.push(t as f64, ms);
                }
                (vec![s], total)
            }
            Experiment::Insert => per_case(c, Metric::Millis)?,
            Experiment::LoadFactor => per_case(c, Metric::LoadFactor)?,
            Experiment::AverageLoadFactor => {
                let (series, total) = per_case(c, Metric::LoadFactor)?;
                let averaged = series
                    .into_iter()
                    .map(|s| {
                        let mut avg = Series::new(s.name.clone());
                        avg.push(1f64, s.mean());
                        avg
                    })
                    .collect();
                (averaged, total)
            }
            Experiment::MaxChain => per_case(c, Metric::MaxChain)?,
            Experiment::MinChain => per_case(c, Metric::MinChain)?,
            Experiment::MinNonEmptyChain => per_case(c, Metric::MinNonEmptyChain)?,
        };

        let (x_axis, y_axis) = match self {
            Experiment::KeyGeneration | Experiment::Insert => ("Trial", "Time, ms"),
            Experiment::LoadFactor => ("Trial", "Load factor"),
            Experiment::AverageLoadFactor => ("Strategy (point = mean)", "Mean load factor"),
            Experiment::MaxChain | Experiment::MinChain | Experiment::MinNonEmptyChain => {
                ("Trial", "Chain length")
            }
        };

        Ok(ChartData {
            title: self.title(c),
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
            series,
            total_seconds: total_ms / 1000.0,
        })
    }
}

/// Titles of every chaining chart under `config`
pub fn titles(config: &ChainedBenchConfig) -> Vec<String> {
    Experiment::ALL.iter().map(|e| e.title(config)).collect()
}

/// Runs the chart named `title`, `None` if no chaining chart has that title
pub fn try_build(
    title: &str,
    config: &ChainedBenchConfig,
) -> Result<Option<ChartData>, BenchError> {
    config.validate()?;

    let Some(experiment) = Experiment::ALL.into_iter().find(|e| e.title(config) == title) else {
        return Ok(None);
    };

    info!(target: "chained", "running {experiment:?} with {config:?}");
    experiment.run(config).map(Some)
}

/// Inserts `keys` into a fresh table, returning it with the elapsed milliseconds
fn fill<'h>(
    hash: &'h dyn HashStrategy<i32>,
    keys: &[i32],
    capacity: usize,
) -> Result<(Table<'h>, f64), BenchError> {
    let mut table = ChainedHashTable::new(hash, capacity, DEFAULT_MAX_LOAD_FACTOR)?;
    let (_, ms) = workload::timed(|| {
        for &k in keys {
            table.add_or_update(k, k);
        }
    });
    Ok((table, ms))
}

fn warm_up(c: &ChainedBenchConfig, cases: &[HashCase]) -> Result<(), BenchError> {
    let keys = workload::keys(c.element_count.min(10_000), c.seed);
    for (_, hash) in cases {
        fill(hash.as_ref(), &keys, c.capacity)?;
    }
    Ok(())
}

/// One series per hash strategy, one point per trial
fn per_case(c: &ChainedBenchConfig, metric: Metric) -> Result<(Vec<Series>, f64), BenchError> {
    let cases = hash_cases();
    warm_up(c, &cases)?;

    let mut series: Vec<Series> = cases.iter().map(|(name, _)| Series::new(*name)).collect();
    let mut total = 0f64;

    for t in 1..=c.trials {
        let keys = workload::keys(c.element_count, workload::trial_seed(c.seed, t));
        for ((name, hash), s) in cases.iter().zip(series.iter_mut()) {
            let (table, ms) = fill(hash.as_ref(), &keys, c.capacity)?;
            debug!(
                target: "chained",
                "trial {t} {name}: {} buckets, load factor {:.3}",
                table.capacity(),
                table.load_factor()
            );
            s.push(t as f64, metric.read(&table, ms));
            total += ms;
        }
    }

    Ok((series, total))
}
