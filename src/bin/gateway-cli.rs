use std::path::PathBuf;

use alloy::primitives::{Address, TxHash};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use web3_gateway::blockchain::{client, history, transaction, wallet, BlockchainClient};
use web3_gateway::config::{load_config, GatewayConfig};
use web3_gateway::endpoint;
use web3_gateway::ipfs::IpfsClient;
use web3_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command line access to the web3 helper gateway", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint; overrides the configured one.
    #[arg(short = 'u', long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a provider endpoint URL
    Resolve {
        provider: String,
        api_key: String,
        chain_id: u64,
    },
    /// Ether balance of an address
    Balance { address: Address },
    /// Transaction count of an address
    Nonce { address: Address },
    /// Chain id reported by the endpoint
    ChainId,
    /// Latest block number
    BlockNumber,
    /// Block header and transaction hashes
    Block {
        number: u64,
        /// Include full transaction bodies
        #[arg(long)]
        full: bool,
    },
    /// Transaction by hash
    Tx { hash: TxHash },
    /// Transactions sent by an address, newest first
    History { address: Address },
    /// Wait for a transaction to be confirmed
    Wait {
        hash: TxHash,
        #[arg(short = 'n', long)]
        confirmations: Option<u64>,
    },
    /// Generate a random wallet
    NewWallet,
    /// Generate a 12-word mnemonic
    NewMnemonic,
    /// Derive a wallet from a mnemonic
    FromMnemonic { phrase: String },
    /// Sign a message; the key is read from GATEWAY_PRIVATE_KEY
    Sign {
        message: String,
        #[arg(long, env = "GATEWAY_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// Recover the signer of a message
    Verify { message: String, signature: String },
    /// Store a file on IPFS
    IpfsAdd { path: PathBuf },
    /// Print an IPFS object to stdout
    IpfsCat { cid: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    logging::init(&config.observability.log_level);

    match cli.command {
        Commands::Resolve {
            provider,
            api_key,
            chain_id,
        } => {
            print_json(&endpoint::resolve(&provider, &api_key, chain_id)?)?;
        }
        Commands::Balance { address } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            print_json(&client::get_balance(address, &url).await?)?;
        }
        Commands::Nonce { address } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            print_json(&client::get_transaction_count(address, &url).await?)?;
        }
        Commands::ChainId => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            print_json(&client::get_network_id(&url).await?)?;
        }
        Commands::BlockNumber => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            print_json(&client::get_block_number(&url).await?)?;
        }
        Commands::Block { number, full } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            let block = if full {
                client::get_block_details(number, &url).await?
            } else {
                BlockchainClient::connect(&url)?.get_block(number, false).await?
            };
            print_json(&block)?;
        }
        Commands::Tx { hash } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            print_json(&client::get_transaction(hash, &url).await?)?;
        }
        Commands::History { address } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            let txs =
                history::get_transaction_history_with(address, &url, &config.enumeration).await?;
            print_json(&txs)?;
        }
        Commands::Wait {
            hash,
            confirmations,
        } => {
            let url = rpc_url(&cli.rpc_url, &config)?;
            let client = BlockchainClient::connect(&url)?;
            let receipt = transaction::wait_for_confirmations(
                &client,
                hash,
                confirmations.unwrap_or(config.confirmations.required),
                config.confirmations.poll_interval(),
            )
            .await?;
            print_json(&receipt)?;
        }
        Commands::NewWallet => {
            print_json(&wallet::generate_random_wallet())?;
        }
        Commands::NewMnemonic => {
            print_json(&wallet::generate_mnemonic())?;
        }
        Commands::FromMnemonic { phrase } => {
            print_json(&wallet::generate_wallet_from_seed(&phrase)?)?;
        }
        Commands::Sign {
            message,
            private_key,
        } => {
            print_json(&wallet::sign_message(&private_key, &message)?)?;
        }
        Commands::Verify { message, signature } => {
            print_json(&wallet::verify_signed_message(&message, &signature)?)?;
        }
        Commands::IpfsAdd { path } => {
            let ipfs = IpfsClient::new(&config.ipfs)?;
            let data = tokio::fs::read(&path).await?;
            let cid = ipfs.add(data).await?;
            print_json(&json!({ "cid": cid }))?;
        }
        Commands::IpfsCat { cid } => {
            let ipfs = IpfsClient::new(&config.ipfs)?;
            let data = ipfs.cat(&cid).await?;
            tokio::io::stdout().write_all(&data).await?;
        }
    }

    Ok(())
}

fn rpc_url(
    flag: &Option<String>,
    config: &GatewayConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(url) = flag {
        return Ok(url.clone());
    }
    config
        .rpc
        .endpoint()?
        .ok_or_else(|| "no RPC endpoint: pass --rpc-url or set [rpc] in the config file".into())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
