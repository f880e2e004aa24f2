//! Singularity CLI - Operate a Singularity deployment
//!
//! Deploys the oracle, factory and router into a local state file, then
//! drives admin actions, oracle pushes, liquidity and swaps against it. Every
//! command is one transaction: it commits and is saved, or it reverts and the
//! state file is left as it was.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use singularity_common::Address;
use std::path::PathBuf;

mod client;
mod config;
mod deploy;
mod liquidity;
mod oracle;
mod pool;
mod token;
mod trading;

use client::Client;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "singularity")]
#[command(about = "Singularity CLI - Single-sided oracle-priced pools", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Caller address (overrides the config)
    #[arg(short, long)]
    sender: Option<String>,

    /// Transaction time in unix seconds (defaults to now)
    #[arg(long)]
    time: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy oracle, factory and router with the sender as admin
    Init {
        /// Replace an existing deployment
        #[arg(long)]
        force: bool,
    },

    /// Test token operations
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Oracle operations
    Oracle {
        #[command(subcommand)]
        command: OracleCommands,
    },

    /// Pool creation and factory administration
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },

    /// Liquidity operations
    Liquidity {
        #[command(subcommand)]
        command: LiquidityCommands,
    },

    /// Swap an exact input amount
    Swap {
        /// Input token (symbol, address or ETH)
        from: String,

        /// Output token (symbol, address or ETH)
        to: String,

        /// Input amount (decimal)
        amount: String,

        /// Minimum output amount (decimal)
        #[arg(long)]
        min_out: Option<String>,

        /// Accepted shortfall against the quote when --min-out is not given
        #[arg(long, default_value = "50")]
        slippage_bps: u64,

        /// Recipient (defaults to the sender)
        #[arg(long)]
        recipient: Option<String>,

        /// Seconds until the deadline
        #[arg(long, default_value = "1200")]
        deadline: u64,
    },

    /// Quote a swap step by step
    Quote {
        from: String,
        to: String,
        amount: String,
    },

    /// Show deployment status
    Status,
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Deploy a test token
    Deploy {
        name: String,
        symbol: String,
        decimals: u8,
    },

    /// Mint test tokens
    Mint {
        token: String,
        to: String,
        amount: String,
    },

    /// Credit native value
    Fund {
        to: String,
        amount: String,
    },

    /// Approve a spender (`router`, an address, ...)
    Approve {
        token: String,
        spender: String,
        /// Amount (decimal) or `max`
        amount: String,
    },

    /// Show balances
    Balance {
        owner: Option<String>,
    },
}

#[derive(Subcommand)]
enum OracleCommands {
    /// Grant or revoke push rights
    SetPusher {
        pusher: String,

        #[arg(long)]
        revoke: bool,
    },

    /// Push USD prices as TOKEN=PRICE pairs
    Push {
        #[arg(required = true, value_parser = oracle::parse_price_pair)]
        prices: Vec<(String, String)>,
    },

    /// Show the last price of a token
    Price {
        token: String,
    },

    /// Set the staleness threshold (0 disables)
    SetMaxAge {
        seconds: u64,
    },
}

#[derive(Subcommand)]
enum PoolCommands {
    /// Create the pool for a token
    Create {
        token: String,

        /// Base fee as a fraction (e.g. 0.0015)
        #[arg(long)]
        fee: String,

        #[arg(long)]
        stablecoin: bool,
    },

    /// Set deposit caps as TOKEN=AMOUNT pairs (`max` is uncapped)
    SetCaps {
        #[arg(required = true, value_parser = oracle::parse_price_pair)]
        caps: Vec<(String, String)>,
    },

    /// Set base fees as TOKEN=FEE pairs
    SetFees {
        #[arg(required = true, value_parser = oracle::parse_price_pair)]
        fees: Vec<(String, String)>,
    },

    /// Pause every pool
    Pause,

    /// Unpause every pool
    Unpause,

    /// Sweep admin fees to the fee beneficiary
    CollectFees,

    /// Set the fee beneficiary
    SetFeeTo {
        fee_to: String,
    },

    /// Hand over the admin role
    SetAdmin {
        admin: String,
    },

    /// Set the minimum coverage ratio left by a swap (e.g. 0.1)
    SetCoverageFloor {
        floor: String,
    },

    /// Show pool details
    Info {
        token: String,
    },
}

#[derive(Subcommand)]
enum LiquidityCommands {
    /// Deposit into a pool (use ETH for native value)
    Add {
        token: String,
        amount: String,

        #[arg(long)]
        min_shares: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, default_value = "1200")]
        deadline: u64,
    },

    /// Redeem shares (`all` for the full balance)
    Remove {
        token: String,
        shares: String,

        #[arg(long)]
        min_amount: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, default_value = "1200")]
        deadline: u64,

        /// Authorise with a signed permit instead of an approval
        #[arg(long)]
        permit: bool,
    },

    /// Approve the router to spend claim tokens
    Approve {
        token: String,
        /// Shares (decimal) or `max`
        shares: String,
    },

    /// Show liquidity positions
    Show {
        owner: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = CliConfig::load(cli.config.as_deref())?;
    let sender = match &cli.sender {
        Some(s) => s.parse()?,
        None => config.default_sender()?,
    };
    let now = cli
        .time
        .unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);

    if cli.verbose {
        println!("{} {}", "Sender:".bright_cyan(), sender);
        println!("{} {}", "Time:".bright_cyan(), now);
        println!("{} {}", "State:".bright_cyan(), config.state_path().display());
    }

    run(&config, sender, now, cli.command)
}

fn run(config: &CliConfig, sender: Address, now: u64, command: Commands) -> Result<()> {
    let open = || Client::open(config, sender, now);
    match command {
        Commands::Init { force } => {
            deploy::init(config, sender, now, force)?;
        }
        Commands::Token { command } => {
            let client = &mut open()?;
            match command {
                TokenCommands::Deploy { name, symbol, decimals } => {
                    token::deploy_token(client, name, symbol, decimals)?;
                }
                TokenCommands::Mint { token, to, amount } => {
                    token::mint(client, token, to, amount)?;
                }
                TokenCommands::Fund { to, amount } => {
                    token::fund(client, to, amount)?;
                }
                TokenCommands::Approve { token, spender, amount } => {
                    token::approve(client, token, spender, amount)?;
                }
                TokenCommands::Balance { owner } => {
                    token::balance(client, owner)?;
                }
            }
        }
        Commands::Oracle { command } => {
            let client = &mut open()?;
            match command {
                OracleCommands::SetPusher { pusher, revoke } => {
                    oracle::set_pusher(client, pusher, revoke)?;
                }
                OracleCommands::Push { prices } => {
                    oracle::push(client, prices)?;
                }
                OracleCommands::Price { token } => {
                    oracle::price(client, token)?;
                }
                OracleCommands::SetMaxAge { seconds } => {
                    oracle::set_max_age(client, seconds)?;
                }
            }
        }
        Commands::Pool { command } => {
            let client = &mut open()?;
            match command {
                PoolCommands::Create { token, fee, stablecoin } => {
                    pool::create(client, token, fee, stablecoin)?;
                }
                PoolCommands::SetCaps { caps } => {
                    pool::set_caps(client, caps)?;
                }
                PoolCommands::SetFees { fees } => {
                    pool::set_fees(client, fees)?;
                }
                PoolCommands::Pause => {
                    pool::set_paused(client, true)?;
                }
                PoolCommands::Unpause => {
                    pool::set_paused(client, false)?;
                }
                PoolCommands::CollectFees => {
                    pool::collect_fees(client)?;
                }
                PoolCommands::SetFeeTo { fee_to } => {
                    pool::set_fee_to(client, fee_to)?;
                }
                PoolCommands::SetAdmin { admin } => {
                    pool::set_admin(client, admin)?;
                }
                PoolCommands::SetCoverageFloor { floor } => {
                    pool::set_coverage_floor(client, floor)?;
                }
                PoolCommands::Info { token } => {
                    pool::info(client, token)?;
                }
            }
        }
        Commands::Liquidity { command } => {
            let client = &mut open()?;
            match command {
                LiquidityCommands::Add { token, amount, min_shares, to, deadline } => {
                    liquidity::add(
                        client,
                        liquidity::AddArgs { token, amount, min_shares, to, deadline },
                    )?;
                }
                LiquidityCommands::Remove { token, shares, min_amount, to, deadline, permit } => {
                    liquidity::remove(
                        client,
                        config,
                        liquidity::RemoveArgs { token, shares, min_amount, to, deadline, permit },
                    )?;
                }
                LiquidityCommands::Approve { token, shares } => {
                    liquidity::approve_router(client, token, shares)?;
                }
                LiquidityCommands::Show { owner } => {
                    liquidity::show(client, owner)?;
                }
            }
        }
        Commands::Swap { from, to, amount, min_out, slippage_bps, recipient, deadline } => {
            let client = &mut open()?;
            trading::swap(
                client,
                trading::SwapArgs { from, to, amount, min_out, slippage_bps, recipient, deadline },
            )?;
        }
        Commands::Quote { from, to, amount } => {
            let client = &mut open()?;
            trading::quote(client, from, to, amount)?;
        }
        Commands::Status => {
            let client = &mut open()?;
            deploy::status(client)?;
        }
    }

    Ok(())
}
