//! Solana message compilation, wire format and signing.
//!
//! Transactions are built by hand, no `solana-sdk` dependency. Layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     version prefix        u8 (0x80 | version), v0 only; absent for legacy
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!     num_lookup_tables     compact-u16, v0 only (always 0 here)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::address::Pubkey;
use crate::error::SolError;
use crate::keypair::Keypair;

/// High bit set on the first message byte marks a versioned message.
const VERSION_PREFIX_MASK: u8 = 0x80;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len)
        .map_err(|_| SolError::CompileError(format!("{what} length {len} exceeds u16")))?;
    Ok(encode_compact_u16(value))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a message.
///
/// `accounts` is positional: programs index into it, so its order is part of
/// each program's interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Message wire version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVersion {
    Legacy,
    V0,
}

/// A compiled message, ready to serialize and sign.
#[derive(Debug, Clone)]
pub struct Message {
    pub version: MessageVersion,

    /// All account keys referenced by the message, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Keys that must sign, in signature-slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }
}

/// An instruction with account references replaced by u8 indices into the
/// message's `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A fully signed transaction.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// One signature per required signer, in account-key order.
    pub signatures: Vec<[u8; 64]>,
    pub message_bytes: Vec<u8>,
}

impl SignedTransaction {
    /// The transaction ID: the fee payer's signature in Base58.
    pub fn signature(&self) -> String {
        self.signatures
            .first()
            .map(|s| bs58::encode(s).into_string())
            .unwrap_or_default()
    }

    /// Serialize into the wire format accepted by `sendTransaction`.
    pub fn to_wire(&self) -> Result<Vec<u8>, SolError> {
        let mut wire = Vec::with_capacity(3 + 64 * self.signatures.len() + self.message_bytes.len());
        wire.extend_from_slice(&compact_len(self.signatures.len(), "signature")?);
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&self.message_bytes);
        Ok(wire)
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile instructions into a message with a single fee payer.
///
/// Accounts appearing in several places are merged, keeping the union of
/// their signer/writable flags. The fee payer is always a writable signer at
/// index 0.
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
    version: MessageVersion,
) -> Result<Message, SolError> {
    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    // Instruction account lists are tiny, a linear scan beats hashing.
    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    // Stable sort: insertion order survives within each category, and the
    // fee payer outranks every other writable signer.
    entries.sort_by_key(|e| {
        let rank = match (e.is_signer, e.is_writable) {
            (true, true) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        (rank, e.pubkey != *fee_payer)
    });

    if entries.len() > usize::from(u8::MAX) + 1 {
        return Err(SolError::CompileError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let num_required_signatures = header_count(entries.iter().filter(|e| e.is_signer).count())?;
    let num_readonly_signed =
        header_count(entries.iter().filter(|e| e.is_signer && !e.is_writable).count())?;
    let num_readonly_unsigned =
        header_count(entries.iter().filter(|e| !e.is_signer && !e.is_writable).count())?;

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or_else(|| SolError::CompileError(format!("account {key} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id)?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Message {
        version,
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

fn header_count(n: usize) -> Result<u8, SolError> {
    u8::try_from(n).map_err(|_| SolError::CompileError(format!("header count {n} exceeds u8")))
}

// ---------------------------------------------------------------------------
// Serialization and signing
// ---------------------------------------------------------------------------

/// Serialize the message (the bytes that get signed).
pub fn serialize_message(message: &Message) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    if message.version == MessageVersion::V0 {
        buf.push(VERSION_PREFIX_MASK);
    }

    buf.push(message.num_required_signatures);
    buf.push(message.num_readonly_signed);
    buf.push(message.num_readonly_unsigned);

    buf.extend_from_slice(&compact_len(message.account_keys.len(), "account key")?);
    for key in &message.account_keys {
        buf.extend_from_slice(key.as_bytes());
    }

    buf.extend_from_slice(&message.recent_blockhash);

    buf.extend_from_slice(&compact_len(message.instructions.len(), "instruction")?);
    for ix in &message.instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction account")?);
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data")?);
        buf.extend_from_slice(&ix.data);
    }

    if message.version == MessageVersion::V0 {
        // No address lookup tables.
        buf.extend_from_slice(&encode_compact_u16(0));
    }

    Ok(buf)
}

/// Sign a message with every required signer.
///
/// `signers` may be given in any order; each signature lands in the slot of
/// the matching account key. A missing or unexpected signer is an error.
pub fn sign_transaction(
    message: &Message,
    signers: &[&Keypair],
) -> Result<SignedTransaction, SolError> {
    let message_bytes = serialize_message(message)?;
    let required = message.signer_keys();

    for signer in signers {
        let key = signer.pubkey();
        if !required.contains(&key) {
            return Err(SolError::SigningError(format!(
                "{key} is not a required signer"
            )));
        }
    }

    let signatures = required
        .iter()
        .map(|key| {
            signers
                .iter()
                .find(|s| s.pubkey() == *key)
                .map(|s| s.sign_message(&message_bytes))
                .ok_or_else(|| SolError::SigningError(format!("missing signer for {key}")))
        })
        .collect::<Result<Vec<_>, SolError>>()?;

    Ok(SignedTransaction {
        signatures,
        message_bytes,
    })
}
