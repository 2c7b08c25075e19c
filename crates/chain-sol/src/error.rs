use thiserror::Error;

/// Solana primitive errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("no viable program address for the given seeds")]
    NoViableBump,

    #[error("seed too long: {len} bytes (max {max})")]
    SeedTooLong { len: usize, max: usize },

    #[error("too many seeds: {count} (max {max})")]
    TooManySeeds { count: usize, max: usize },

    #[error("message compile error: {0}")]
    CompileError(String),

    #[error("signing error: {0}")]
    SigningError(String),
}
