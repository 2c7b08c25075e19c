//! Solana primitives for building and signing program transactions.
//!
//! This crate covers the small slice of Solana needed to create an on-chain
//! token: Base58 addresses, Ed25519 keypairs, program-derived addresses,
//! compute-budget instructions and the versioned (v0) transaction wire
//! format. None of it pulls in `solana-sdk`; the binary layout is written by
//! hand on top of `ed25519-dalek`, `curve25519-dalek` and `bs58`.

pub mod address;
pub mod compute_budget;
pub mod error;
pub mod keypair;
pub mod pda;
pub mod programs;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::Pubkey;
pub use compute_budget::{set_compute_unit_limit, set_compute_unit_price};
pub use error::SolError;
pub use keypair::Keypair;
pub use pda::{create_program_address, find_program_address, is_on_curve};
pub use programs::{
    ASSOCIATED_TOKEN_PROGRAM_ID, COMPUTE_BUDGET_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID,
    TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    compile_message, encode_compact_u16, serialize_message, sign_transaction, AccountMeta,
    CompiledInstruction, Instruction, Message, MessageVersion, SignedTransaction,
};
