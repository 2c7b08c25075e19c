//! Wallet secret decoding.
//!
//! Two encodings are accepted, tried in order:
//!
//! 1. Base58 of the 64-byte keypair (Phantom / Solflare export format).
//! 2. A JSON array of 64 byte values (`solana-keygen` file contents).
//!
//! Both go through [`Keypair::from_bytes`], so a secret whose public half does
//! not match its seed is rejected rather than signing for the wrong wallet.

use chain_sol::Keypair;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::DeployError;

/// Which encoding a secret was supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretEncoding {
    Base58,
    JsonArray,
}

/// A decoded signing keypair plus the encoding it came from.
#[derive(Debug)]
pub struct DecodedSecret {
    pub keypair: Keypair,
    pub encoding: SecretEncoding,
}

/// Decode a wallet secret, Base58 first, then JSON array.
///
/// Fails with [`DeployError::InvalidSecretFormat`] when neither decoder
/// accepts the input. The reasons are logged at debug level; the input is
/// not.
pub fn decode_secret(secret: &str) -> Result<DecodedSecret, DeployError> {
    let secret = secret.trim();

    let base58_reason = match decode_base58(secret) {
        Ok(keypair) => {
            return Ok(DecodedSecret {
                keypair,
                encoding: SecretEncoding::Base58,
            })
        }
        Err(reason) => reason,
    };

    match decode_json_array(secret) {
        Ok(keypair) => Ok(DecodedSecret {
            keypair,
            encoding: SecretEncoding::JsonArray,
        }),
        Err(json_reason) => {
            debug!(%base58_reason, %json_reason, "secret rejected by both decoders");
            Err(DeployError::InvalidSecretFormat)
        }
    }
}

fn decode_base58(secret: &str) -> Result<Keypair, String> {
    let bytes = Zeroizing::new(
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| format!("base58: {e}"))?,
    );
    Keypair::from_bytes(&bytes).map_err(|e| format!("base58: {e}"))
}

fn decode_json_array(secret: &str) -> Result<Keypair, String> {
    let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
        serde_json::from_str(secret).map_err(|e| format!("json: {e}"))?,
    );
    Keypair::from_bytes(&bytes).map_err(|e| format!("json: {e}"))
}
