use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod pda;
mod session;
mod status;
mod units;

use config::{load_config, Overrides, DEFAULT_CONFIG_PATH};
use error::CliError;
use session::{parse_pubkey, Session};

#[derive(Parser)]
#[command(name = "gsp")]
#[command(about = "Gated Sale Protocol CLI")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "GSP_CONFIG")]
    config: String,

    /// Solana RPC URL, overrides the configuration file
    #[arg(long)]
    url: Option<String>,

    /// Path to the keypair used for signing, overrides the configuration file
    #[arg(long)]
    keypair: Option<String>,

    /// Mint of the gated asset, overrides the configuration file
    #[arg(long, env = "GSP_MINT")]
    mint: Option<String>,

    /// Print machine readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Whitelist, caps and sale phase
    Gate {
        #[command(subcommand)]
        command: GateCommands,
    },
    /// Price feed used to value transfers
    Oracle {
        #[command(subcommand)]
        command: OracleCommands,
    },
    /// The gated Token-2022 asset
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },
}

#[derive(Subcommand)]
enum GateCommands {
    /// Create the gate for the configured mint, starts locked
    Init {
        /// Per-address cap in reference-unit atoms, defaults to the configured cap
        #[arg(long)]
        cap: Option<u64>,
    },
    /// Reject every gated transfer
    Lock,
    /// Start accepting gated transfers
    Unlock,
    /// Update the per-address cap (reference-unit atoms)
    SetCap { cap: u64 },
    /// Bind the price feed, defaults to the feed derived for the mint
    SetOracle { price_feed: Option<String> },
    /// Bind the AMM pool
    SetPool { pool: String },
    /// Bind the caller identity, defaults to the asset config of the mint
    SetGatedAsset { gated_asset: Option<String> },
    /// Bind asset, oracle and pool from the mint and its price feed
    Bind,
    /// Turn self whitelisting through payment on or off
    SelfWhitelist {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
    /// Only admit entries up to this whitelist index, omit to admit all
    SetTier { index: Option<u64> },
    /// Hand the gate over to a new owner
    TransferOwnership { new_authority: String },
    /// Whitelist one address
    Add { address: String },
    /// Whitelist many addresses, sent in batches
    AddBatch {
        #[arg(required = true, num_args = 1..)]
        addresses: Vec<String>,
    },
    /// Pay lamports into the gate to whitelist the signer
    Pay { lamports: u64 },
    /// Show the gate configuration
    Status,
    /// Show whitelist membership and contribution of an address
    Check { address: String },
}

#[derive(Subcommand)]
enum OracleCommands {
    /// Create the price feed for the configured mint
    Init {
        #[arg(long)]
        pool: String,
        /// Reference unit mint
        #[arg(long)]
        quote_mint: String,
        /// Pool orientation, derived from the mint ordering when omitted
        #[arg(long)]
        base_is_token0: Option<bool>,
        /// Seconds after which a price is stale, defaults to the configured value
        #[arg(long)]
        max_staleness: Option<i64>,
    },
    /// Publish a price, token1 atoms per token0 atom (e.g. 0.25)
    Update { price: String },
    /// Enable or disable quoting
    SetActive {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        active: bool,
    },
    /// Seconds after which a price is stale
    SetMaxStaleness { seconds: i64 },
    /// Point the feed at the pool it observes, clears the last price
    SetPool { pool: String },
    /// Hand the feed over, must match the gate owner
    TransferAuthority { new_authority: String },
    /// Show the price feed
    Show,
    /// Quote asset atoms into reference units with the current price
    Quote { amount: u64 },
}

#[derive(Subcommand)]
enum AssetCommands {
    /// Create a Token-2022 mint hooked to this protocol, together with its gate
    CreateMint {
        #[arg(long, default_value = "6")]
        decimals: u8,
        /// Gate cap in reference-unit atoms, defaults to the configured cap
        #[arg(long)]
        cap: Option<u64>,
        /// Also create the price feed against this reference mint
        #[arg(long)]
        quote_mint: Option<String>,
    },
    /// Register the configured mint as a gated asset
    Init {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "6")]
        decimals: u8,
    },
    /// Write the accounts Token-2022 forwards to the transfer hook
    InitHook,
    /// Mint tokens, never gated
    Mint {
        /// Owner whose associated token account receives the tokens
        #[arg(long, conflicts_with = "account")]
        to: Option<String>,
        /// Explicit token account, e.g. a pool vault
        #[arg(long)]
        account: Option<String>,
        /// UI amount, e.g. 1.5
        amount: String,
    },
    /// Burn from the signer's token account
    Burn { amount: String },
    /// Route transfers through the gate of this mint
    SetGatekeeper {
        /// Stop consulting the gate
        #[arg(long)]
        unbind: bool,
    },
    /// Update name and symbol
    SetMetadata {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
    },
    /// Hand the asset over to a new owner
    TransferAuthority { new_authority: String },
    /// Show the asset configuration
    Show,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gsp=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn pubkeys(values: &[String]) -> Result<Vec<Pubkey>, CliError> {
    values.iter().map(|v| parse_pubkey(v)).collect()
}

fn optional_pubkey(value: Option<&str>) -> Result<Option<Pubkey>, CliError> {
    value.map(parse_pubkey).transpose()
}

fn run_gate(session: &Session, command: GateCommands) -> Result<(), CliError> {
    match command {
        GateCommands::Init { cap } => {
            let cap = cap.unwrap_or(session.config.default_max_address_cap);
            commands::gate::init(session, cap)
        }
        GateCommands::Lock => commands::gate::set_locked(session, true),
        GateCommands::Unlock => commands::gate::set_locked(session, false),
        GateCommands::SetCap { cap } => commands::gate::set_cap(session, cap),
        GateCommands::SetOracle { price_feed } => {
            commands::gate::set_oracle(session, optional_pubkey(price_feed.as_deref())?)
        }
        GateCommands::SetPool { pool } => commands::gate::set_pool(session, parse_pubkey(&pool)?),
        GateCommands::SetGatedAsset { gated_asset } => {
            commands::gate::set_gated_asset(session, optional_pubkey(gated_asset.as_deref())?)
        }
        GateCommands::Bind => commands::gate::bind(session),
        GateCommands::SelfWhitelist { enabled } => {
            commands::gate::set_self_whitelist_disabled(session, !enabled)
        }
        GateCommands::SetTier { index } => commands::gate::set_tier(session, index),
        GateCommands::TransferOwnership { new_authority } => {
            commands::gate::transfer_ownership(session, parse_pubkey(&new_authority)?)
        }
        GateCommands::Add { address } => commands::gate::add(session, parse_pubkey(&address)?),
        GateCommands::AddBatch { addresses } => {
            commands::gate::add_batch(session, &pubkeys(&addresses)?)
        }
        GateCommands::Pay { lamports } => commands::gate::pay(session, lamports),
        GateCommands::Status => commands::gate::status(session),
        GateCommands::Check { address } => commands::gate::check(session, parse_pubkey(&address)?),
    }
}

fn run_oracle(session: &Session, command: OracleCommands) -> Result<(), CliError> {
    match command {
        OracleCommands::Init {
            pool,
            quote_mint,
            base_is_token0,
            max_staleness,
        } => commands::oracle::init(
            session,
            parse_pubkey(&pool)?,
            parse_pubkey(&quote_mint)?,
            base_is_token0,
            max_staleness.unwrap_or(session.config.default_max_staleness),
        ),
        OracleCommands::Update { price } => commands::oracle::update(session, &price),
        OracleCommands::SetActive { active } => commands::oracle::set_active(session, active),
        OracleCommands::SetMaxStaleness { seconds } => {
            commands::oracle::set_max_staleness(session, seconds)
        }
        OracleCommands::SetPool { pool } => commands::oracle::set_pool(session, parse_pubkey(&pool)?),
        OracleCommands::TransferAuthority { new_authority } => {
            commands::oracle::transfer_authority(session, parse_pubkey(&new_authority)?)
        }
        OracleCommands::Show => commands::oracle::show(session),
        OracleCommands::Quote { amount } => commands::oracle::quote(session, amount),
    }
}

fn run_asset(session: &Session, command: AssetCommands) -> Result<(), CliError> {
    match command {
        AssetCommands::CreateMint {
            decimals,
            cap,
            quote_mint,
        } => {
            let feed = optional_pubkey(quote_mint.as_deref())?.map(|quote_mint| {
                commands::asset::FeedParams {
                    quote_mint,
                    max_staleness: session.config.default_max_staleness,
                }
            });
            let cap = cap.unwrap_or(session.config.default_max_address_cap);
            commands::asset::create_mint(session, decimals, cap, feed)
        }
        AssetCommands::Init {
            name,
            symbol,
            decimals,
        } => commands::asset::init(session, name, symbol, decimals),
        AssetCommands::InitHook => commands::asset::init_hook(session),
        AssetCommands::Mint {
            to,
            account,
            amount,
        } => commands::asset::mint_to(
            session,
            optional_pubkey(to.as_deref())?,
            optional_pubkey(account.as_deref())?,
            &amount,
        ),
        AssetCommands::Burn { amount } => commands::asset::burn(session, &amount),
        AssetCommands::SetGatekeeper { unbind } => commands::asset::set_gatekeeper(session, unbind),
        AssetCommands::SetMetadata { name, symbol } => {
            commands::asset::set_metadata(session, name, symbol)
        }
        AssetCommands::TransferAuthority { new_authority } => {
            commands::asset::transfer_authority(session, parse_pubkey(&new_authority)?)
        }
        AssetCommands::Show => commands::asset::show(session),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?.merge(Overrides {
        rpc_url: cli.url,
        keypair_path: cli.keypair,
        asset_mint: cli.mint,
    });
    let session = Session::open(config, cli.json)?;

    match cli.command {
        Commands::Gate { command } => run_gate(&session, command)?,
        Commands::Oracle { command } => run_oracle(&session, command)?,
        Commands::Asset { command } => run_asset(&session, command)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_batch_add() {
        let a = Pubkey::new_unique().to_string();
        let b = Pubkey::new_unique().to_string();
        let cli = Cli::try_parse_from(["gsp", "gate", "add-batch", &a, &b]).expect("should parse");
        match cli.command {
            Commands::Gate {
                command: GateCommands::AddBatch { addresses },
            } => assert_eq!(addresses, vec![a, b]),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_batch_add_needs_addresses() {
        assert!(Cli::try_parse_from(["gsp", "gate", "add-batch"]).is_err());
    }

    #[test]
    fn test_parse_self_whitelist_toggle() {
        let cli = Cli::try_parse_from(["gsp", "gate", "self-whitelist", "off"]).expect("should parse");
        assert!(matches!(
            cli.command,
            Commands::Gate {
                command: GateCommands::SelfWhitelist { enabled: false }
            }
        ));
    }

    #[test]
    fn test_set_tier_without_index_clears() {
        let cli = Cli::try_parse_from(["gsp", "--json", "gate", "set-tier"]).expect("should parse");
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Gate {
                command: GateCommands::SetTier { index: None }
            }
        ));
    }

    #[test]
    fn test_mint_target_is_exclusive() {
        let owner = Pubkey::new_unique().to_string();
        let vault = Pubkey::new_unique().to_string();
        let result = Cli::try_parse_from([
            "gsp", "asset", "mint", "--to", &owner, "--account", &vault, "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pubkeys_rejects_garbage() {
        let err = pubkeys(&["not-a-key".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::InvalidPubkey(_)));
    }

    #[test]
    fn test_create_mint_with_feed() {
        let quote = Pubkey::new_unique().to_string();
        let cli = Cli::try_parse_from(["gsp", "asset", "create-mint", "--quote-mint", &quote])
            .expect("should parse");
        match cli.command {
            Commands::Asset {
                command:
                    AssetCommands::CreateMint {
                        decimals,
                        cap,
                        quote_mint,
                    },
            } => {
                assert_eq!(decimals, 6);
                assert_eq!(cap, None);
                assert_eq!(quote_mint, Some(quote));
            }
            _ => panic!("wrong command"),
        }
    }
}
