//! Bonding-curve program addresses.
//!
//! Every account the `create` instruction touches is either a fixed program
//! ID or a PDA derived from the mint. All of it is a pure function of the
//! mint public key and the constants below.

use chain_sol::{
    find_program_address, Pubkey, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use tracing::debug;

use crate::error::DeployError;

/// pump.fun bonding-curve program: `6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P`
pub const PUMP_PROGRAM_ID: Pubkey = Pubkey::new([
    0x01, 0x56, 0xe0, 0xf6, 0x93, 0x66, 0x5a, 0xcf, 0x44, 0xdb, 0x15, 0x68, 0xbf, 0x17, 0x5b, 0xaa,
    0x51, 0x89, 0xcb, 0x97, 0xf5, 0xd2, 0xff, 0x3b, 0x65, 0x5d, 0x2b, 0xb6, 0xfd, 0x6d, 0x18, 0xb0,
]);

/// pump.fun event authority: `Ce6TQqeHC9p8KetsN6JsjHK7UTZk7nasjjnr7XxXp9F1`
pub const EVENT_AUTHORITY_ID: Pubkey = Pubkey::new([
    0xac, 0xf1, 0x36, 0xeb, 0x01, 0xfc, 0x1c, 0x4e, 0x88, 0x3d, 0x23, 0xc8, 0xb5, 0x84, 0x4a, 0xb5,
    0x9a, 0x37, 0xf6, 0x6a, 0xdd, 0x57, 0xc5, 0xe9, 0xac, 0x3b, 0x53, 0xe0, 0x59, 0xd3, 0x5c, 0x64,
]);

const MINT_AUTHORITY_SEED: &[u8] = b"mint-authority";
const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";
const GLOBAL_SEED: &[u8] = b"global";
const METADATA_SEED: &[u8] = b"metadata";

/// The program-derived accounts for one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddressSet {
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub bonding_curve: Pubkey,
    /// The bonding curve's associated token account for the mint.
    pub associated_bonding_curve: Pubkey,
    pub global: Pubkey,
    pub metadata: Pubkey,
}

/// Derive every PDA the `create` instruction needs for `mint`.
pub fn derive_addresses(mint: &Pubkey) -> Result<DerivedAddressSet, DeployError> {
    let mint_authority = pda(&[MINT_AUTHORITY_SEED], &PUMP_PROGRAM_ID, "mint-authority")?;
    let bonding_curve = pda(
        &[BONDING_CURVE_SEED, mint.as_ref()],
        &PUMP_PROGRAM_ID,
        "bonding-curve",
    )?;
    let associated_bonding_curve = pda(
        &[bonding_curve.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        "associated-bonding-curve",
    )?;
    let global = pda(&[GLOBAL_SEED], &PUMP_PROGRAM_ID, "global")?;
    let metadata = pda(
        &[METADATA_SEED, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
        "metadata",
    )?;

    let set = DerivedAddressSet {
        mint: *mint,
        mint_authority,
        bonding_curve,
        associated_bonding_curve,
        global,
        metadata,
    };
    debug!(
        mint = %set.mint,
        bonding_curve = %set.bonding_curve,
        associated_bonding_curve = %set.associated_bonding_curve,
        metadata = %set.metadata,
        "derived program addresses"
    );
    Ok(set)
}

// The bump is discarded: the program re-derives it on chain.
fn pda(seeds: &[&[u8]], program_id: &Pubkey, label: &str) -> Result<Pubkey, DeployError> {
    find_program_address(seeds, program_id)
        .map(|(address, _bump)| address)
        .map_err(|e| DeployError::AddressDerivationFailure(format!("{label}: {e}")))
}
