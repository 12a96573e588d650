//! Fan-out/fan-in over the records of one family.

use futures::future::join_all;
use std::future::Future;
use tracing::error;

use super::Family;
use super::error::SeedError;

/// Successful results of a family plus the number of skipped records.
#[derive(Debug)]
pub struct FamilyOutcome<T> {
    pub created: Vec<T>,
    pub failed: usize,
}

impl<T> FamilyOutcome<T> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            created: Vec::new(),
            failed: 0,
        }
    }
}

/// Runs every task concurrently and waits for all of them. A failed task is
/// logged under its label and counted; it never affects its siblings.
pub async fn fan_out<T, Fut>(family: Family, tasks: Vec<(String, Fut)>) -> FamilyOutcome<T>
where
    Fut: Future<Output = Result<T, SeedError>>,
{
    let (labels, futures): (Vec<String>, Vec<Fut>) = tasks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut outcome = FamilyOutcome::empty();
    for (label, result) in labels.into_iter().zip(results) {
        match result {
            Ok(value) => outcome.created.push(value),
            Err(e) => {
                error!(family = %family, item = %label, error = %e, "Failed to create record");
                outcome.failed += 1;
            }
        }
    }

    metrics::counter!("seed_records_created_total", "family" => family.as_str())
        .increment(outcome.created.len() as u64);
    metrics::counter!("seed_records_failed_total", "family" => family.as_str())
        .increment(outcome.failed as u64);

    outcome
}
