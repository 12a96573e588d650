use thiserror::Error;

/// Why a single fixture record was skipped.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Unknown {kind} reference: {key}")]
    MissingReference { kind: &'static str, key: String },

    #[error("Fixture position {0} does not fit a record id")]
    IndexOutOfRange(usize),

    #[error("Malformed fixture record: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    #[error("Failed to load fixtures: {0:#}")]
    Fixture(anyhow::Error),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl SeedError {
    pub fn missing(kind: &'static str, key: impl Into<String>) -> Self {
        Self::MissingReference {
            kind,
            key: key.into(),
        }
    }
}
