//! The deployment pipeline.

use std::time::{Duration, Instant};

use chain_sol::{compile_message, sign_transaction, Keypair, MessageVersion};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::addresses::derive_addresses;
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::instruction::{build_create_instruction, transaction_instructions};
use crate::metadata::MetadataPublisher;
use crate::payload::encode_create_payload;
use crate::rpc::{Commitment, SignatureStatus, SolanaRpc};
use crate::secret::decode_secret;
use crate::types::{DeployRequest, DeployResult};

/// Runs deployments against an RPC node and a metadata host.
pub struct Deployer<R, M> {
    rpc: R,
    publisher: M,
    config: DeployConfig,
}

impl<R: SolanaRpc, M: MetadataPublisher> Deployer<R, M> {
    pub fn new(rpc: R, publisher: M, config: DeployConfig) -> Self {
        Self {
            rpc,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Deploy a new token under a freshly generated mint.
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeployResult, DeployError> {
        self.deploy_with_mint(request, Keypair::generate()).await
    }

    /// Deploy using the given mint keypair.
    ///
    /// Steps run strictly in order and the first failure ends the attempt:
    /// decode the secret, check the balance, publish metadata, derive
    /// addresses, build, sign, submit, confirm. A submission whose outcome
    /// is unknown still goes through confirmation, so it ends as success,
    /// `TransactionFailed` or `ConfirmationTimeout`.
    #[tracing::instrument(
        name = "deploy",
        skip_all,
        fields(name = %request.name, ticker = %request.ticker)
    )]
    pub async fn deploy_with_mint(
        &self,
        request: &DeployRequest,
        mint: Keypair,
    ) -> Result<DeployResult, DeployError> {
        let decoded = decode_secret(request.secret.expose_secret())?;
        let signer = decoded.keypair;
        let payer = signer.pubkey();
        let mint_address = mint.pubkey();
        debug!(%payer, mint = %mint_address, encoding = ?decoded.encoding, "keys ready");

        let balance = self.rpc.get_balance(&payer, Commitment::Confirmed).await?;
        if balance < self.config.min_balance_lamports {
            return Err(DeployError::InsufficientFunds {
                required: self.config.min_balance_lamports,
                available: balance,
            });
        }

        let uri = self.publisher.publish(&request.metadata()).await?;
        info!(%uri, "metadata published");

        let addresses = derive_addresses(&mint_address)?;
        let data = encode_create_payload(&request.name, &request.ticker, &uri)?;
        debug!(len = data.len(), "create payload encoded");
        let create = build_create_instruction(&addresses, &payer, data);
        let instructions = transaction_instructions(&self.config, create);

        let latest = self.rpc.get_latest_blockhash(Commitment::Finalized).await?;
        let message = compile_message(
            &instructions,
            &payer,
            &latest.blockhash,
            MessageVersion::V0,
        )?;
        let signed = sign_transaction(&message, &[&signer, &mint])?;
        let wire = signed.to_wire()?;

        let signature = match self.rpc.send_transaction(&wire, Commitment::Confirmed).await {
            Ok(signature) => signature,
            // The node may hold the transaction; follow it by its signature.
            Err(DeployError::SubmissionOutcomeUnknown(reason)) => {
                let signature = signed.signature();
                warn!(%signature, %reason, "submission outcome unknown, confirming by signature");
                signature
            }
            Err(e) => return Err(e),
        };
        info!(%signature, "transaction submitted");

        self.confirm(&signature).await?;
        info!(%signature, mint = %mint_address, "token deployed");

        Ok(DeployResult::new(
            &mint_address,
            signature,
            &self.config.viewer_base_url,
        ))
    }

    /// Poll until the transaction is confirmed, fails, or the confirmation
    /// window closes. After the window, one history lookup decides between
    /// success and [`DeployError::ConfirmationTimeout`].
    async fn confirm(&self, signature: &str) -> Result<(), DeployError> {
        let started = Instant::now();
        let interval = self.config.confirmation_poll_interval;

        let poll = async {
            loop {
                match self.rpc.get_signature_status(signature, false).await {
                    Ok(Some(status)) => {
                        if let Some(outcome) = settle(signature, &status) {
                            return outcome;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(%signature, error = %e, "status poll failed"),
                }
                tokio::time::sleep(interval).await;
            }
        };

        match tokio::time::timeout(self.config.confirmation_timeout, poll).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(%signature, "confirmation window closed, checking history");
                self.final_lookup(signature, started.elapsed()).await
            }
        }
    }

    async fn final_lookup(&self, signature: &str, waited: Duration) -> Result<(), DeployError> {
        match self.rpc.get_signature_status(signature, true).await {
            Ok(Some(status)) => {
                if let Some(outcome) = settle(signature, &status) {
                    return outcome;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(%signature, error = %e, "final status lookup failed"),
        }

        Err(DeployError::ConfirmationTimeout {
            signature: signature.to_string(),
            waited,
        })
    }
}

/// `None` while the transaction is still in flight.
fn settle(signature: &str, status: &SignatureStatus) -> Option<Result<(), DeployError>> {
    if let Some(err) = &status.err {
        return Some(Err(DeployError::TransactionFailed {
            signature: signature.to_string(),
            reason: err.to_string(),
        }));
    }
    status
        .has_reached(Commitment::Confirmed)
        .then_some(Ok(()))
}
