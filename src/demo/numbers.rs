use core::ops::RangeInclusive;

use rand::Rng;

use crate::collections::LinkedSequence;

/// the range every generated integer is drawn from
pub const VALUE_RANGE: RangeInclusive<i32> = -1000..=1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegerStats {
    pub sum: i64,
    pub average: f64,
    pub min: i32,
    pub max: i32,
}

/// `n` integers drawn uniformly from `VALUE_RANGE`, pushed to the back
pub fn random_integers<R: Rng + ?Sized>(n: usize, rng: &mut R) -> LinkedSequence<i32> {
    let mut seq = LinkedSequence::new();
    for _ in 0..n {
        seq.push_back(rng.gen_range(VALUE_RANGE));
    }
    seq
}

/// sum, average, min and max in one forward pass. None for an empty sequence
pub fn integer_stats(seq: &LinkedSequence<i32>) -> Option<IntegerStats> {
    if seq.is_empty() {
        return None;
    }

    let mut sum = 0i64;
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for &value in seq {
        sum += i64::from(value);
        min = min.min(value);
        max = max.max(value);
    }

    Some(IntegerStats {
        sum,
        average: sum as f64 / seq.len() as f64,
        min,
        max,
    })
}

#[derive(Debug)]
pub struct SortReport {
    /// positions where the selection sort disagreed with a reference sort
    pub mistakes: usize,
    pub sorted: Vec<i32>,
    pub shuffled: LinkedSequence<i32>,
}

/// selection sort `n` random integers, compare against a sorted snapshot,
/// then shuffle the sorted sequence
#[tracing::instrument(skip(rng))]
pub fn sort_check<R: Rng + ?Sized>(n: usize, rng: &mut R) -> SortReport {
    let mut seq = random_integers(n, rng);
    let mut snapshot: Vec<i32> = seq.iter().copied().collect();
    snapshot.sort_unstable();

    seq.selection_sort();
    let sorted: Vec<i32> = seq.iter().copied().collect();
    let mistakes = sorted
        .iter()
        .zip(snapshot.iter())
        .filter(|(a, b)| a != b)
        .count();

    for value in &sorted {
        tracing::debug!(value, "sorted");
    }
    tracing::info!(mistakes, "number of mistakes");

    seq.shuffle();
    for value in &seq {
        tracing::debug!(value, "shuffled");
    }

    SortReport {
        mistakes,
        sorted,
        shuffled: seq,
    }
}
