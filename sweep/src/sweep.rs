//! Runs the analysis over a range of bucket counts.

use std::{collections::BTreeMap, fmt, ops::RangeInclusive, sync::mpsc, thread};

use jump_bucketing::{analyze, ConsistentHashing, Error, MigrationResult, ModuloArithmetic};
use tracing::info;

pub const DEFAULT_ALGORITHMS: [Algorithm; 2] = [Algorithm::Consistent, Algorithm::Modulo];

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Consistent,
    Modulo,
}

impl Algorithm {
    fn analyze<S: AsRef<str>>(
        self,
        ids: &[S],
        old_count: u32,
        delta: i64,
    ) -> Result<MigrationResult, Error> {
        match self {
            Algorithm::Consistent => analyze(ids, old_count, delta, &ConsistentHashing),
            Algorithm::Modulo => analyze(ids, old_count, delta, &ModuloArithmetic),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Consistent => write!(f, "{}", ConsistentHashing),
            Algorithm::Modulo => write!(f, "{}", ModuloArithmetic),
        }
    }
}

/// Errors returned when planning or running a sweep.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    /// The range of starting bucket counts holds no value.
    #[error("empty bucket count range: from {from} to {to}")]
    EmptyRange {
        /// First starting bucket count.
        from: u32,
        /// Last starting bucket count, lower than `from`.
        to: u32,
    },

    /// No algorithm to compare.
    #[error("no algorithm selected")]
    NoAlgorithm,

    #[error(transparent)]
    Analysis(#[from] Error),
}

/// Which bucket counts to start from, by how much to change them, and with
/// which algorithms.
#[derive(Clone, Debug)]
pub struct SweepPlan {
    pub bucket_counts: RangeInclusive<u32>,
    pub delta: i64,
    pub algorithms: Vec<Algorithm>,
}

impl SweepPlan {
    /// Checks that the sweep has at least one case and one algorithm and that
    /// every case keeps a positive bucket count, so that a sweep either runs
    /// entirely or not at all.
    pub fn validate(&self) -> Result<(), SweepError> {
        let (from, to) = (*self.bucket_counts.start(), *self.bucket_counts.end());
        if from > to {
            return Err(SweepError::EmptyRange { from, to });
        }
        if self.algorithms.is_empty() {
            return Err(SweepError::NoAlgorithm);
        }
        // The new count grows with the old one, checking both ends is enough.
        for old_count in [from, to] {
            if old_count == 0 {
                return Err(Error::InvalidBucketCount(old_count).into());
            }
            let new_count = i64::from(old_count).checked_add(self.delta);
            if !matches!(new_count, Some(n) if n > 0 && n <= i64::from(u32::MAX)) {
                return Err(Error::InvalidDelta {
                    old_count,
                    delta: self.delta,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// The results of all algorithms for one starting bucket count.
#[derive(Clone, Debug)]
pub struct Case {
    pub old_count: u32,
    pub delta: i64,
    pub outcomes: Vec<Outcome>,
}

impl Case {
    pub fn new_count(&self) -> i64 {
        i64::from(self.old_count) + self.delta
    }
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub algorithm: Algorithm,
    pub result: MigrationResult,
}

/// Analyzes every case of `plan`, spreading the starting bucket counts over
/// as many threads as there is available parallelism.
///
/// Cases are returned in increasing bucket count order whatever order the
/// threads finish in.
pub fn run<S>(ids: &[S], plan: &SweepPlan) -> Result<Vec<Case>, SweepError>
where
    S: AsRef<str> + Sync,
{
    plan.validate()?;
    if ids.is_empty() {
        return Err(Error::EmptyInput.into());
    }

    let num_cases = plan.bucket_counts.size_hint().0;
    let num_threads = thread::available_parallelism()
        .map_or(1, usize::from)
        .min(num_cases);
    let (tx, rx) = mpsc::channel();
    thread::scope(|s| {
        for thread_index in 0..num_threads {
            let thread_tx = tx.clone();
            s.spawn(move || {
                let old_counts = plan
                    .bucket_counts
                    .clone()
                    .skip(thread_index)
                    .step_by(num_threads);
                for old_count in old_counts {
                    let outcomes = plan
                        .algorithms
                        .iter()
                        .map(|&algorithm| {
                            algorithm
                                .analyze(ids, old_count, plan.delta)
                                .map(|result| Outcome { algorithm, result })
                        })
                        .collect::<Result<Vec<_>, _>>();
                    if thread_tx.send((old_count, outcomes)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut cases = BTreeMap::new();
    for (old_count, outcomes) in rx {
        let outcomes = outcomes?;
        info!(old_count, delta = plan.delta, "case analyzed");
        cases.insert(
            old_count,
            Case {
                old_count,
                delta: plan.delta,
                outcomes,
            },
        );
    }
    Ok(cases.into_values().collect())
}
