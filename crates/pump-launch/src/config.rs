//! Deployment configuration.
//!
//! Endpoints, fee settings and timeouts live here. Program IDs, PDA seeds and
//! the instruction discriminator do not: they are protocol constants, see
//! [`crate::addresses`] and [`crate::payload`].

use std::time::Duration;

/// Solana mainnet-beta public RPC.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// pump.fun metadata upload endpoint.
pub const DEFAULT_METADATA_URL: &str = "https://pump.fun/api/ipfs";

/// Token pages are served at `<base><mint address>`.
pub const DEFAULT_VIEWER_BASE_URL: &str = "https://pump.fun/";

/// 0.05 SOL.
pub const DEFAULT_MIN_BALANCE_LAMPORTS: u64 = 50_000_000;

pub const DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS: u64 = 100_000;
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 250_000;

/// 5 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Settings for one [`crate::Deployer`].
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub rpc_url: String,
    pub metadata_url: String,
    pub viewer_base_url: String,
    /// Balance the wallet must hold before anything is uploaded or signed.
    pub min_balance_lamports: u64,
    pub compute_unit_price_micro_lamports: u64,
    pub compute_unit_limit: u32,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// How long to wait for `confirmed` after submission.
    pub confirmation_timeout: Duration,
    pub confirmation_poll_interval: Duration,
    /// Larger images are dropped and the token is created without one.
    pub max_image_bytes: usize,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            viewer_base_url: DEFAULT_VIEWER_BASE_URL.to_string(),
            min_balance_lamports: DEFAULT_MIN_BALANCE_LAMPORTS,
            compute_unit_price_micro_lamports: DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS,
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
            request_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(60),
            confirmation_poll_interval: Duration::from_millis(500),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl DeployConfig {
    pub fn builder() -> DeployConfigBuilder {
        DeployConfigBuilder::new()
    }
}

/// Builder for [`DeployConfig`].
#[derive(Debug, Default)]
pub struct DeployConfigBuilder {
    config: DeployConfig,
}

impl DeployConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_url = url.into();
        self
    }

    pub fn metadata_url(mut self, url: impl Into<String>) -> Self {
        self.config.metadata_url = url.into();
        self
    }

    pub fn viewer_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.viewer_base_url = url.into();
        self
    }

    pub fn min_balance_lamports(mut self, lamports: u64) -> Self {
        self.config.min_balance_lamports = lamports;
        self
    }

    pub fn compute_unit_price(mut self, micro_lamports: u64) -> Self {
        self.config.compute_unit_price_micro_lamports = micro_lamports;
        self
    }

    pub fn compute_unit_limit(mut self, units: u32) -> Self {
        self.config.compute_unit_limit = units;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.config.confirmation_timeout = timeout;
        self
    }

    pub fn confirmation_poll_interval(mut self, interval: Duration) -> Self {
        self.config.confirmation_poll_interval = interval;
        self
    }

    pub fn max_image_bytes(mut self, bytes: usize) -> Self {
        self.config.max_image_bytes = bytes;
        self
    }

    pub fn build(self) -> DeployConfig {
        self.config
    }
}
