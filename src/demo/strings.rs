use crate::collections::{LinkedSequence, SequenceResult};

pub const FILLER: &str = "old";
pub const INSERTED: &str = "new";

/// the sequence as it looked at each step of the insert/erase walk
#[derive(Clone, Debug, PartialEq)]
pub struct InsertEraseReport {
    pub before: Vec<String>,
    pub after_insert: Vec<String>,
    pub after_erase: Vec<String>,
}

fn snapshot(seq: &LinkedSequence<String>) -> Vec<String> {
    seq.iter().cloned().collect()
}

/// fill a sequence with `n` copies of "old", insert "new" at `index`, then
/// erase it again
#[tracing::instrument]
pub fn string_insert_erase(n: usize, index: usize) -> SequenceResult<InsertEraseReport> {
    let mut seq: LinkedSequence<String> = (0..n).map(|_| FILLER.to_string()).collect();
    let before = snapshot(&seq);
    tracing::info!("before inserting at {}: {}", index, before.join(" "));

    seq.insert(index, INSERTED.to_string())?;
    let after_insert = snapshot(&seq);
    tracing::info!("after inserting at {}: {}", index, after_insert.join(" "));

    seq.erase(index)?;
    let after_erase = snapshot(&seq);
    tracing::info!("after erasing at {}: {}", index, after_erase.join(" "));

    Ok(InsertEraseReport {
        before,
        after_insert,
        after_erase,
    })
}
