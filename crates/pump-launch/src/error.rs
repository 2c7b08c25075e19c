use std::time::Duration;

use chain_sol::SolError;
use thiserror::Error;

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

fn sol(lamports: &u64) -> f64 {
    *lamports as f64 / LAMPORTS_PER_SOL
}

/// Everything that can stop a deployment.
///
/// Variants before [`DeployError::SubmissionFailed`] happen before anything is
/// sent to the chain. `SubmissionOutcomeUnknown` and `ConfirmationTimeout`
/// are the outcomes where the transaction may or may not have landed.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid private key: use base58 or JSON array format")]
    InvalidSecretFormat,

    #[error("need {:.4} SOL, have {:.4} SOL", sol(.required), sol(.available))]
    InsufficientFunds { required: u64, available: u64 },

    #[error("metadata upload failed: HTTP {status}")]
    MetadataUploadFailed { status: u16 },

    #[error("metadata upload failed: {0}")]
    MetadataUnreachable(String),

    #[error("metadata response invalid: {0}")]
    MetadataDecode(String),

    #[error("address derivation failed: {0}")]
    AddressDerivationFailure(String),

    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("transaction build failed: {0}")]
    Transaction(#[from] SolError),

    #[error("instruction payload encoding failed: {0}")]
    PayloadEncoding(String),

    /// The node answered with a JSON-RPC error: the transaction was rejected.
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// The submit call broke before the node answered. The transaction may
    /// still have been accepted.
    #[error("transaction submission outcome unknown: {0}")]
    SubmissionOutcomeUnknown(String),

    #[error("transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error(
        "transaction {signature} not confirmed within {}s; look it up before resubmitting",
        .waited.as_secs()
    )]
    ConfirmationTimeout { signature: String, waited: Duration },
}

impl DeployError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidSecretFormat => "INVALID_SECRET_FORMAT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::MetadataUploadFailed { .. }
            | Self::MetadataUnreachable(_)
            | Self::MetadataDecode(_) => "METADATA_UPLOAD_FAILED",
            Self::AddressDerivationFailure(_) => "ADDRESS_DERIVATION_FAILURE",
            Self::Rpc(_) => "RPC_ERROR",
            Self::Transaction(_) => "TRANSACTION_BUILD_FAILED",
            Self::PayloadEncoding(_) => "PAYLOAD_ENCODING_FAILED",
            Self::SubmissionFailed(_) => "SUBMISSION_FAILED",
            Self::SubmissionOutcomeUnknown(_) => "SUBMISSION_OUTCOME_UNKNOWN",
            Self::TransactionFailed { .. } => "TRANSACTION_FAILED",
            Self::ConfirmationTimeout { .. } => "CONFIRMATION_TIMEOUT",
        }
    }

    /// Whether the whole deployment can be rerun without risking a duplicate
    /// token: nothing reached the chain.
    pub fn is_retryable_from_scratch(&self) -> bool {
        matches!(
            self,
            Self::MetadataUploadFailed { .. }
                | Self::MetadataUnreachable(_)
                | Self::Rpc(_)
                | Self::SubmissionFailed(_)
        )
    }
}
