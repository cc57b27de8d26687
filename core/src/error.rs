use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Identifier space exhausted for {kind}: gave up after {attempts} attempts \
         with {allocated} ids already in use (range holds {capacity})"
    )]
    IdSpaceExhausted {
        kind: &'static str,
        attempts: usize,
        allocated: usize,
        capacity: u64,
    },

    #[error(
        "Key space exhausted for {kind}: gave up after {attempts} attempts \
         with {claimed} keys already claimed"
    )]
    KeySpaceExhausted {
        kind: &'static str,
        attempts: usize,
        claimed: usize,
    },

    #[error("Unknown {kind} '{value}'")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("Cannot simulate orders without customers")]
    EmptyCustomerPool,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;
