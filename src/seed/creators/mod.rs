//! One creator routine per family, each an `impl Seeder` block.

mod catalog;
mod challenges;
mod feedback;
mod shop;
mod users;

use serde::de::DeserializeOwned;
use tracing::error;

use super::error::SeedError;
use super::{CachedUser, Family, FamilyOutcome, SeedContext};
use crate::fixtures::FixtureRecord;

/// Where uploaded images live, relative to the application root.
const UPLOADS_PATH: &str = "assets/public/images/uploads";

/// Result type of a creator: `(created, failed)` or a fixture loading error.
type FamilyResult = Result<(usize, usize), SeedError>;

/// Counts of a joined family.
fn counts<T>(outcome: &FamilyOutcome<T>) -> (usize, usize) {
    (outcome.created.len(), outcome.failed)
}

fn fixtures<T>(loaded: anyhow::Result<Vec<T>>) -> Result<Vec<T>, SeedError> {
    loaded.map_err(SeedError::Fixture)
}

/// Decodes one fixture entry. A malformed entry fails only its own task.
fn decode<T: DeserializeOwned>(record: &FixtureRecord<T>) -> Result<T, SeedError> {
    record.decode().map_err(SeedError::MalformedRecord)
}

/// Record id for a 1-based fixture position.
fn positional_id(index: usize) -> Result<i32, SeedError> {
    index
        .checked_add(1)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or(SeedError::IndexOutOfRange(index))
}

fn cached_user<'a>(ctx: &'a SeedContext, key: &str) -> Result<&'a CachedUser, SeedError> {
    ctx.users
        .get(key)
        .ok_or_else(|| SeedError::missing("user", key))
}

/// Logs a failed dependent record without failing its parent.
fn log_nested<T>(family: Family, item: &str, what: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(family = %family, item, error = %format!("{e:#}"), "Failed to create {}", what);
            None
        }
    }
}
