//! Solana JSON-RPC access.
//!
//! [`SolanaRpc`] is the seam the deployer talks to; [`HttpRpcClient`] is the
//! JSON-RPC 2.0 over HTTP implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chain_sol::Pubkey;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::DeployConfig;
use crate::error::DeployError;

/// How settled a piece of chain state must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Result of `getLatestBlockhash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: [u8; 32],
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the slot is rooted.
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction landed but failed.
    pub err: Option<Value>,
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Whether the transaction is at least as settled as `level`.
    pub fn has_reached(&self, level: Commitment) -> bool {
        match self.confirmation_status {
            Some(status) => status >= level,
            // Nodes that predate `confirmationStatus` report rooted slots
            // with `confirmations: null`.
            None => self.confirmations.is_none(),
        }
    }
}

/// The RPC calls a deployment needs.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Balance in lamports.
    async fn get_balance(&self, pubkey: &Pubkey, commitment: Commitment)
        -> Result<u64, DeployError>;

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, DeployError>;

    /// Submit a signed wire transaction, returning its Base58 signature.
    /// Rejections surface as [`DeployError::SubmissionFailed`]; a call that
    /// broke before the node answered surfaces as
    /// [`DeployError::SubmissionOutcomeUnknown`].
    async fn send_transaction(
        &self,
        wire: &[u8],
        preflight_commitment: Commitment,
    ) -> Result<String, DeployError>;

    /// `None` when the node has no record of the signature.
    async fn get_signature_status(
        &self,
        signature: &str,
        search_transaction_history: bool,
    ) -> Result<Option<SignatureStatus>, DeployError>;
}

#[async_trait]
impl<T: SolanaRpc + ?Sized> SolanaRpc for Arc<T> {
    async fn get_balance(
        &self,
        pubkey: &Pubkey,
        commitment: Commitment,
    ) -> Result<u64, DeployError> {
        (**self).get_balance(pubkey, commitment).await
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, DeployError> {
        (**self).get_latest_blockhash(commitment).await
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        preflight_commitment: Commitment,
    ) -> Result<String, DeployError> {
        (**self).send_transaction(wire, preflight_commitment).await
    }

    async fn get_signature_status(
        &self,
        signature: &str,
        search_transaction_history: bool,
    ) -> Result<Option<SignatureStatus>, DeployError> {
        (**self)
            .get_signature_status(signature, search_transaction_history)
            .await
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC over HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// `{ "context": {..}, "value": T }` wrapper used by most methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Error)]
enum RpcCallError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<RpcCallError> for DeployError {
    fn from(e: RpcCallError) -> Self {
        DeployError::Rpc(e.to_string())
    }
}

/// JSON-RPC 2.0 client over HTTP.
#[derive(Debug)]
pub struct HttpRpcClient {
    client: Client,
    endpoint: String,
    request_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(config: &DeployConfig) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DeployError::Rpc(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.rpc_url.clone(),
            request_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcCallError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        tracing::trace!(method, id = request.id, "rpc request");

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcCallError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: JsonRpcResponse<T> =
            serde_json::from_str(&body).map_err(|e| RpcCallError::Decode(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(RpcCallError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| RpcCallError::Decode(format!("{method}: missing result")))
    }
}

#[async_trait]
impl SolanaRpc for HttpRpcClient {
    async fn get_balance(
        &self,
        pubkey: &Pubkey,
        commitment: Commitment,
    ) -> Result<u64, DeployError> {
        let params = json!([pubkey.to_base58(), { "commitment": commitment }]);
        let response: WithContext<u64> = self.call("getBalance", params).await?;
        Ok(response.value)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, DeployError> {
        let params = json!([{ "commitment": commitment }]);
        let response: WithContext<BlockhashValue> =
            self.call("getLatestBlockhash", params).await?;

        let blockhash = Pubkey::from_base58(&response.value.blockhash)
            .map_err(|e| DeployError::Rpc(format!("invalid blockhash: {e}")))?;

        Ok(LatestBlockhash {
            blockhash: blockhash.to_bytes(),
            last_valid_block_height: response.value.last_valid_block_height,
        })
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        preflight_commitment: Commitment,
    ) -> Result<String, DeployError> {
        let params = json!([
            general_purpose::STANDARD.encode(wire),
            { "encoding": "base64", "preflightCommitment": preflight_commitment }
        ]);

        self.call("sendTransaction", params)
            .await
            .map_err(|e| match e {
                RpcCallError::Rpc { .. } => DeployError::SubmissionFailed(e.to_string()),
                // No answer from the node; it may still have accepted the
                // transaction.
                RpcCallError::Transport(_) | RpcCallError::Status(_) | RpcCallError::Decode(_) => {
                    DeployError::SubmissionOutcomeUnknown(e.to_string())
                }
            })
    }

    async fn get_signature_status(
        &self,
        signature: &str,
        search_transaction_history: bool,
    ) -> Result<Option<SignatureStatus>, DeployError> {
        let params = json!([
            [signature],
            { "searchTransactionHistory": search_transaction_history }
        ]);
        let response: WithContext<Vec<Option<SignatureStatus>>> =
            self.call("getSignatureStatuses", params).await?;

        Ok(response.value.into_iter().next().flatten())
    }
}
