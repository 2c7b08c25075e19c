//! `create` instruction and transaction instruction list.

use chain_sol::{
    set_compute_unit_limit, set_compute_unit_price, AccountMeta, Instruction, Pubkey,
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};

use crate::addresses::{DerivedAddressSet, EVENT_AUTHORITY_ID, PUMP_PROGRAM_ID};
use crate::config::DeployConfig;

/// Build the bonding-curve `create` instruction.
///
/// The program reads accounts by position, so this order is the contract:
///
/// | # | account                  | flags            |
/// |---|--------------------------|------------------|
/// | 0 | mint                     | signer, writable |
/// | 1 | mint authority           |                  |
/// | 2 | bonding curve            | writable         |
/// | 3 | associated bonding curve | writable         |
/// | 4 | global                   |                  |
/// | 5 | token metadata program   |                  |
/// | 6 | metadata                 | writable         |
/// | 7 | payer                    | signer, writable |
/// | 8 | system program           |                  |
/// | 9 | token program            |                  |
/// |10 | associated token program |                  |
/// |11 | rent sysvar              |                  |
/// |12 | event authority          |                  |
/// |13 | bonding-curve program    |                  |
pub fn build_create_instruction(
    addresses: &DerivedAddressSet,
    payer: &Pubkey,
    data: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id: PUMP_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(addresses.mint, true),
            AccountMeta::new_readonly(addresses.mint_authority, false),
            AccountMeta::new(addresses.bonding_curve, false),
            AccountMeta::new(addresses.associated_bonding_curve, false),
            AccountMeta::new_readonly(addresses.global, false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new(addresses.metadata, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            AccountMeta::new_readonly(EVENT_AUTHORITY_ID, false),
            AccountMeta::new_readonly(PUMP_PROGRAM_ID, false),
        ],
        data,
    }
}

/// Priority fee, compute limit, then `create`.
pub fn transaction_instructions(config: &DeployConfig, create: Instruction) -> Vec<Instruction> {
    vec![
        set_compute_unit_price(config.compute_unit_price_micro_lamports),
        set_compute_unit_limit(config.compute_unit_limit),
        create,
    ]
}
