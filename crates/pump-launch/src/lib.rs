//! pump.fun token deployment.
//!
//! One call to [`Deployer::deploy`] takes a [`DeployRequest`] (name, ticker,
//! description, wallet secret, optional image and social links) and:
//!
//! 1. decodes the wallet secret ([`secret`]),
//! 2. checks the wallet holds the minimum balance ([`rpc`]),
//! 3. uploads token metadata and gets back its URI ([`metadata`]),
//! 4. derives the bonding-curve program addresses for a fresh mint
//!    ([`addresses`]),
//! 5. encodes the `create` instruction payload ([`payload`]),
//! 6. assembles, signs, submits and confirms the transaction
//!    ([`instruction`], [`deploy`]).
//!
//! The network sits behind the [`SolanaRpc`] and [`MetadataPublisher`]
//! traits; [`tool`] adapts the whole flow to a loosely typed tool-call
//! boundary.

pub mod addresses;
pub mod config;
pub mod deploy;
pub mod error;
pub mod instruction;
pub mod metadata;
pub mod payload;
pub mod rpc;
pub mod secret;
pub mod tool;
pub mod types;

pub use addresses::{derive_addresses, DerivedAddressSet, EVENT_AUTHORITY_ID, PUMP_PROGRAM_ID};
pub use config::{DeployConfig, DeployConfigBuilder};
pub use deploy::Deployer;
pub use error::DeployError;
pub use metadata::{HttpMetadataPublisher, MetadataPublisher};
pub use payload::{encode_create_payload, CREATE_DISCRIMINATOR};
pub use rpc::{Commitment, HttpRpcClient, LatestBlockhash, SignatureStatus, SolanaRpc};
pub use secret::{decode_secret, DecodedSecret, SecretEncoding};
pub use tool::{execute_deploy_tool, DeployToolParams, ToolContent, ToolResponse};
pub use types::{normalize_ticker, DeployRequest, DeployResult, SocialLinks, TokenMetadata};
