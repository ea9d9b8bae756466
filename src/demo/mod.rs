//! small consumers of `LinkedSequence` that exercise its public surface:
//! integer statistics, a string insert/erase walk, a sort check followed by a
//! shuffle, and splitting person records by age.

pub mod numbers;
pub mod people;
pub mod strings;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collections::{LinkedSequence, SequenceResult};

/// knobs for a full demo run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// how many random integers to summarize
    pub count: usize,
    /// how many "old" strings to fill before the insert/erase walk
    pub strings: usize,
    /// where "new" is inserted and then erased
    pub insert_index: usize,
    /// how many person records to generate
    pub people: usize,
    /// how many integers the sort check runs over
    pub sort_count: usize,
    /// seed for the data generator, entropy when None. `shuffle` always
    /// seeds itself
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            strings: 10,
            insert_index: 5,
            people: 100,
            sort_count: 1000,
            seed: None,
        }
    }
}

impl DemoConfig {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// the list 1, 10, 3, 8 built with `push_back`
pub fn fixed_sample() -> LinkedSequence<i32> {
    let mut seq = LinkedSequence::new();
    for value in [1, 10, 3, 8] {
        seq.push_back(value);
    }
    seq
}

/// run every demo in order, logging each report
pub fn run(config: &DemoConfig) -> SequenceResult<()> {
    let mut rng = config.rng();

    let integers = numbers::random_integers(config.count, &mut rng);
    match numbers::integer_stats(&integers) {
        Some(stats) => tracing::info!(
            sum = stats.sum,
            average = stats.average,
            min = stats.min,
            max = stats.max,
            "integer statistics"
        ),
        None => tracing::info!("no integers to summarize"),
    }

    strings::string_insert_erase(config.strings, config.insert_index)?;

    let records = people::random_people(config.people, &mut rng);
    people::partition_people(&records);

    numbers::sort_check(config.sort_count, &mut rng);

    let sample = fixed_sample();
    for value in &sample {
        tracing::info!(value, "sample");
    }
    tracing::info!(length = sample.len(), "sample length");

    Ok(())
}
