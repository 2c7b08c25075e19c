//! Ed25519 keypairs in Solana's 64-byte layout.
//!
//! Solana tooling stores a keypair as `seed (32) || public key (32)`. The
//! public half is checked against the seed on import so a mismatched pair is
//! rejected instead of silently signing for the wrong address.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::address::Pubkey;
use crate::error::SolError;

/// Length of a serialized keypair.
pub const KEYPAIR_LENGTH: usize = 64;

/// An Ed25519 signing keypair. The secret half is wiped on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Import the 64-byte `seed || pubkey` layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        let arr: &[u8; KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            SolError::InvalidKeypair(format!(
                "expected {KEYPAIR_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(arr)
            .map_err(|_| SolError::InvalidKeypair("public key does not match secret".into()))?;

        Ok(Self { signing_key })
    }

    /// Export the 64-byte `seed || pubkey` layout.
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign arbitrary bytes, returning the raw 64-byte signature.
    pub fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.pubkey()).finish()
    }
}
