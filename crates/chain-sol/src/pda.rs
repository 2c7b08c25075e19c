//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")`, accepted only when the digest is NOT a valid
//! Ed25519 point, so no private key can ever sign for it. The canonical bump
//! is the first one, searching from 255 down, that lands off the curve.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, including the bump.
pub const MAX_SEEDS: usize = 16;

/// Find the canonical PDA and its bump for `seeds` under `program_id`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    for bump in (0u8..=255).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(SolError::NoViableBump) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(SolError::NoViableBump)
}

/// Compute the PDA for an explicit seed list (bump already included).
///
/// Returns `NoViableBump` when the digest falls on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, SolError> {
    if seeds.len() > MAX_SEEDS {
        return Err(SolError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(SolError::SeedTooLong {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return Err(SolError::NoViableBump);
    }

    Ok(Pubkey::new(hash))
}

/// Check if 32 bytes decompress to an Ed25519 curve point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
