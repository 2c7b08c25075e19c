//! `pump-launch` command-line entrypoint.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use pump_launch::config::{DEFAULT_METADATA_URL, DEFAULT_RPC_URL};
use pump_launch::{
    DeployConfig, DeployError, DeployRequest, Deployer, HttpMetadataPublisher, HttpRpcClient,
    SocialLinks,
};

#[derive(Debug, Parser)]
#[command(name = "pump-launch", version, about = "Deploy tokens on pump.fun")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new token and its bonding curve.
    Deploy(DeployArgs),
}

#[derive(Debug, Args)]
struct DeployArgs {
    #[arg(long)]
    name: String,

    /// Symbol; a leading `$` is dropped.
    #[arg(long)]
    ticker: String,

    #[arg(long)]
    description: String,

    #[arg(long)]
    image_url: Option<String>,

    #[arg(long)]
    twitter: Option<String>,

    #[arg(long)]
    telegram: Option<String>,

    #[arg(long)]
    website: Option<String>,

    /// Wallet secret, Base58 or JSON byte array.
    #[arg(long, env = "PUMP_LAUNCH_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    #[arg(long, env = "PUMP_LAUNCH_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    #[arg(long, env = "PUMP_LAUNCH_METADATA_URL", default_value = DEFAULT_METADATA_URL)]
    metadata_url: String,

    /// Seconds to wait for confirmation.
    #[arg(long, env = "PUMP_LAUNCH_CONFIRM_TIMEOUT_SECS", default_value_t = 60)]
    confirm_timeout: u64,
}

impl DeployArgs {
    fn config(&self) -> DeployConfig {
        DeployConfig::builder()
            .rpc_url(self.rpc_url.clone())
            .metadata_url(self.metadata_url.clone())
            .confirmation_timeout(Duration::from_secs(self.confirm_timeout))
            .build()
    }

    fn into_request(self) -> DeployRequest {
        let request =
            DeployRequest::new(self.name, &self.ticker, self.description, self.private_key)
                .with_socials(SocialLinks {
                    twitter: self.twitter,
                    telegram: self.telegram,
                    website: self.website,
                });
        match self.image_url {
            Some(url) => request.with_image_url(url),
            None => request,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("failed to render result: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Deploy(e) => e.code(),
            Self::Output(_) => "OUTPUT_FAILED",
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Deploy(args) => {
            let config = args.config();
            let rpc = HttpRpcClient::new(&config)?;
            let publisher = HttpMetadataPublisher::new(&config)?;
            let deployer = Deployer::new(rpc, publisher, config);

            let result = deployer.deploy(&args.into_request()).await?;
            let rendered = serde_json::to_string_pretty(&result)?;
            println!("{rendered}");
        }
    }

    Ok(())
}
