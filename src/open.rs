//! Experiments on [`OpenAddressingHashTable`] across the probing strategies

use collections::{
    Division, DoubleHashing, Linear, Multiplication, OpenAddressingHashTable, ProbingStrategy,
    PseudoRandom, Quadratic, QuadraticShift,
};
use log::{debug, info, warn};

use crate::{
    BenchError,
    chart::{ChartData, Series},
    workload::{self, MAX_ELEMENTS},
};

#[derive(Debug, Clone, PartialEq)]
pub struct OpenBenchConfig {
    pub element_count: usize,
    pub capacity: usize,
    /// Capacity of the tables in the overflow experiment
    pub overflow_capacity: usize,
    pub trials: usize,
    pub seed: u64,
}

impl Default for OpenBenchConfig {
    fn default() -> Self {
        Self {
            element_count: 10_000,
            capacity: 10_000,
            overflow_capacity: 9_000,
            trials: 20,
            seed: 42,
        }
    }
}

impl OpenBenchConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        let invalid = |field, reason| Err(BenchError::InvalidConfig { field, reason });

        if self.element_count == 0 || self.element_count > MAX_ELEMENTS {
            return invalid("element_count", "must be positive and fit an i32");
        }
        if self.capacity == 0 {
            return invalid("capacity", "must be positive");
        }
        if self.overflow_capacity == 0 {
            return invalid("overflow_capacity", "must be positive");
        }
        if self.trials == 0 {
            return invalid("trials", "must be positive");
        }
        if self.overflow_capacity >= self.capacity {
            return invalid("overflow_capacity", "must be smaller than capacity");
        }
        // the non-overflow experiments keep the load factor at or below 1
        if self.element_count > self.capacity {
            return invalid("capacity", "must be at least element_count");
        }
        Ok(())
    }
}

type Table<'p> = OpenAddressingHashTable<i32, i32, &'p dyn ProbingStrategy<i32>>;

fn probe_cases() -> Vec<(&'static str, Box<dyn ProbingStrategy<i32>>)> {
    vec![
        ("Linear (h = division)", Box::new(Linear::new(Division))),
        (
            "Quadratic c1=1 c2=3 (h = division)",
            Box::new(Quadratic::new(Division, 1, 3)),
        ),
        (
            "Double (h1 = division, h2 = multiplication)",
            Box::new(DoubleHashing::new(Division, Multiplication)),
        ),
        ("Pseudo-random (h = division)", Box::new(PseudoRandom::new(Division))),
        (
            "Quadratic + shift=7 (h = division)",
            Box::new(QuadraticShift::new(Division, 7)),
        ),
    ]
}

/// A table after inserting a key sequence until done or full
struct Filled<'p> {
    table: Table<'p>,
    inserted: usize,
    ms: f64,
}

/// Inserts `keys` into a fresh table, stopping at the first overflow
fn fill<'p>(
    probe: &'p dyn ProbingStrategy<i32>,
    keys: &[i32],
    capacity: usize,
) -> Result<Filled<'p>, BenchError> {
    let mut table = OpenAddressingHashTable::new(probe, capacity)?;
    let (inserted, ms) = workload::timed(|| {
        let mut inserted = 0;
        for &k in keys {
            match table.add_or_update(k, k) {
                Ok(_) => inserted += 1,
                Err(e) if e.is_overflow() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(inserted)
    });

    Ok(Filled {
        table,
        inserted: inserted?,
        ms,
    })
}

#[derive(Debug, Clone, Copy)]
enum Experiment {
    KeyGeneration,
    Insert,
    Overflow,
    MaxCluster,
}

impl Experiment {
    const ALL: [Experiment; 4] = [
        Experiment::KeyGeneration,
        Experiment::Insert,
        Experiment::Overflow,
        Experiment::MaxCluster,
    ];

    fn title(self, c: &OpenBenchConfig) -> String {
        let n = c.element_count;
        match self {
            Experiment::KeyGeneration => format!("Open addressing: generating {n} keys"),
            Experiment::Insert => format!("Open addressing: inserting {n} elements"),
            Experiment::Overflow => {
                format!("Open addressing: overflow (m={})", c.overflow_capacity)
            }
            Experiment::MaxCluster => format!("Open addressing: max cluster ({n} elements)"),
        }
    }

    fn axes(self) -> (&'static str, &'static str) {
        match self {
            Experiment::KeyGeneration | Experiment::Insert => ("Trial", "Time, ms"),
            Experiment::Overflow => ("Trial", "Inserted before overflow"),
            Experiment::MaxCluster => ("Trial", "Max cluster length"),
        }
    }

    fn run(self, c: &OpenBenchConfig) -> Result<ChartData, BenchError> {
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
            Experiment::Insert => per_case(c, c.capacity, |f| f.ms)?,
            Experiment::Overflow => per_case(c, c.overflow_capacity, |f| f.inserted as f64)?,
            Experiment::MaxCluster => {
                per_case(c, c.capacity, |f| f.table.max_cluster_length() as f64)?
            }
        };

        let (x_axis, y_axis) = self.axes();
        Ok(ChartData {
            title: self.title(c),
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
            series,
            total_seconds: total_ms / 1000.0,
        })
    }
}

/// Titles of every open addressing chart under `config`
pub fn titles(config: &OpenBenchConfig) -> Vec<String> {
    Experiment::ALL.iter().map(|e| e.title(config)).collect()
}

/// Runs the chart named `title`, `None` if no open addressing chart has that title
pub fn try_build(title: &str, config: &OpenBenchConfig) -> Result<Option<ChartData>, BenchError> {
    config.validate()?;

    let Some(experiment) = Experiment::ALL.into_iter().find(|e| e.title(config) == title) else {
        return Ok(None);
    };

    info!(target: "open", "running {experiment:?} with {config:?}");
    experiment.run(config).map(Some)
}

/// One series per probing strategy, one point per trial
fn per_case(
    c: &OpenBenchConfig,
    capacity: usize,
    metric: fn(&Filled<'_>) -> f64,
) -> Result<(Vec<Series>, f64), BenchError> {
    let cases = probe_cases();
    let mut series: Vec<Series> = cases.iter().map(|(name, _)| Series::new(*name)).collect();
    let mut total = 0f64;

    for t in 1..=c.trials {
        let keys = workload::keys(c.element_count, workload::trial_seed(c.seed, t));
        for ((name, probe), s) in cases.iter().zip(series.iter_mut()) {
            let filled = fill(probe.as_ref(), &keys, capacity)?;
            if filled.inserted < keys.len() && capacity >= keys.len() {
                warn!(
                    target: "open",
                    "trial {t} {name}: overflow after {} of {} keys with free slots left",
                    filled.inserted,
                    keys.len()
                );
            }
            debug!(
                target: "open",
                "trial {t} {name}: {} inserted, {} slots",
                filled.inserted,
                filled.table.capacity()
            );

            s.push(t as f64, metric(&filled));
            total += filled.ms;
        }
    }

    Ok((series, total))
}

#[cfg(test)]
mod test {
    use super::{OpenBenchConfig, titles, try_build};
    use crate::BenchError;

    fn small() -> OpenBenchConfig {
        OpenBenchConfig {
            element_count: 100,
            capacity: 100,
            overflow_capacity: 60,
            trials: 2,
            seed: 3,
        }
    }

    #[test]
    fn validate() {
        assert!(OpenBenchConfig::default().validate().is_ok());

        let too_many = OpenBenchConfig {
            element_count: 101,
            ..small()
        };
        assert!(matches!(
            too_many.validate(),
            Err(BenchError::InvalidConfig { field: "capacity", .. })
        ));

        let overflow_not_smaller = OpenBenchConfig {
            overflow_capacity: 100,
            ..small()
        };
        assert!(matches!(
            overflow_not_smaller.validate(),
            Err(BenchError::InvalidConfig {
                field: "overflow_capacity",
                ..
            })
        ));
    }

    #[test]
    fn every_title_builds() {
        let c = small();
        for title in titles(&c) {
            let chart = try_build(&title, &c).unwrap().unwrap();
            assert_eq!(chart.title, title);
        }
        assert!(try_build("nope", &c).unwrap().is_none());
    }

    #[test]
    fn overflow_counts() {
        let c = small();
        let chart = try_build(&titles(&c)[2], &c).unwrap().unwrap();
        assert_eq!(chart.series.len(), 5);

        for s in &chart.series {
            for (_, inserted) in &s.points {
                assert!(*inserted <= c.overflow_capacity as f64, "{}", s.name);
            }
        }

        // linear probing fills every slot before overflowing
        let linear = &chart.series[0];
        assert!(linear.points.iter().all(|(_, n)| *n == c.overflow_capacity as f64));
    }

    #[test]
    fn linear_full_table_is_one_cluster() {
        let c = small();
        let chart = try_build(&titles(&c)[3], &c).unwrap().unwrap();
        let linear = &chart.series[0];
        assert_eq!(linear.points.len(), c.trials);
        assert!(linear.points.iter().all(|(_, len)| *len == c.capacity as f64));
    }
}
