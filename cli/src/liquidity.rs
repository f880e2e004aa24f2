//! Liquidity provider operations

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use singularity_common::eip712::{permit_digest, sign_digest, signer_address};
use singularity_common::math::format_units;
use singularity_common::{Address, U256};
use singularity_router::PermitSignature;

use crate::client::{parse_amount, Client};
use crate::config::CliConfig;

pub struct AddArgs {
    pub token: String,
    pub amount: String,
    pub min_shares: Option<String>,
    pub to: Option<String>,
    pub deadline: u64,
}

pub struct RemoveArgs {
    pub token: String,
    pub shares: String,
    pub min_amount: Option<String>,
    pub to: Option<String>,
    pub deadline: u64,
    pub permit: bool,
}

fn recipient(client: &Client, to: &Option<String>) -> Result<Address> {
    match to {
        Some(to) => client.account(to),
        None => Ok(client.sender),
    }
}

pub fn add(client: &mut Client, args: AddArgs) -> Result<()> {
    let token = client.token(&args.token)?;
    let native = args.token.eq_ignore_ascii_case("eth");
    let amount = client.amount(token, &args.amount)?;
    let min_shares = match &args.min_shares {
        Some(m) => client.amount(token, m)?,
        None => U256::ZERO,
    };
    let to = recipient(client, &args.to)?;
    let deadline = U256::from(client.now + args.deadline);
    let router = client.deployment.router;

    let shares = if native {
        client.execute_with_value(amount, |d, env| {
            router.add_liquidity_eth(&mut d.accounts(), env, min_shares, to, deadline)
        })?
    } else {
        client.execute(|d, env| {
            router.add_liquidity(&mut d.accounts(), env, token, amount, min_shares, to, deadline)
        })?
    };

    let dec = client.decimals(token)?;
    println!("{}", "=== Add Liquidity ===".bright_green().bold());
    println!("{} {} {}", "Deposited:".bright_cyan(), format_units(amount, dec), client.symbol(token));
    println!("{} {}", "Shares minted:".bright_cyan(), format_units(shares, dec));
    println!("{} {}", "Recipient:".bright_cyan(), to);
    Ok(())
}

pub fn remove(client: &mut Client, config: &CliConfig, args: RemoveArgs) -> Result<()> {
    let token = client.token(&args.token)?;
    let native = args.token.eq_ignore_ascii_case("eth");
    let dec = client.decimals(token)?;
    let pool = client
        .deployment
        .factory
        .pool(token)
        .ok_or_else(|| anyhow!("No pool for {}", args.token))?;

    let shares = if args.shares.eq_ignore_ascii_case("all") {
        pool.claim.balance_of(client.sender)
    } else {
        parse_amount(&args.shares, dec)?
    };
    let min_amount = match &args.min_amount {
        Some(m) => parse_amount(m, dec)?,
        None => U256::ZERO,
    };
    let to = recipient(client, &args.to)?;
    let deadline = U256::from(client.now + args.deadline);
    let router = client.deployment.router;

    let permit = if args.permit {
        let key = config
            .signing_key()?
            .ok_or_else(|| anyhow!("--permit needs private_key in the config"))?;
        if signer_address(&key) != client.sender {
            bail!("private_key does not belong to sender {}", client.sender);
        }
        let digest = permit_digest(
            pool.domain_separator(),
            client.sender,
            router.address,
            shares,
            pool.claim.nonce(client.sender),
            deadline,
        );
        let (v, r, s) = sign_digest(&key, digest)?;
        Some(PermitSignature { approve_max: false, v, r, s })
    } else {
        None
    };

    let amount = client.execute(|d, env| {
        let mut acc = d.accounts();
        match (native, permit) {
            (false, None) => router.remove_liquidity(&mut acc, env, token, shares, min_amount, to, deadline),
            (true, None) => router.remove_liquidity_eth(&mut acc, env, shares, min_amount, to, deadline),
            (false, Some(p)) => router
                .remove_liquidity_with_permit(&mut acc, env, token, shares, min_amount, to, deadline, p),
            (true, Some(p)) => router
                .remove_liquidity_eth_with_permit(&mut acc, env, shares, min_amount, to, deadline, p),
        }
    })?;

    println!("{}", "=== Remove Liquidity ===".bright_green().bold());
    println!("{} {}", "Shares burned:".bright_cyan(), format_units(shares, dec));
    println!("{} {} {}", "Received:".bright_cyan(), format_units(amount, dec), client.symbol(token));
    println!("{} {}", "Recipient:".bright_cyan(), to);
    Ok(())
}

/// Approve the router to spend the caller's claim tokens
pub fn approve_router(client: &mut Client, token: String, shares: String) -> Result<()> {
    let asset = client.token(&token)?;
    let shares = client.amount(asset, &shares)?;
    let router = client.deployment.router.address;
    client.execute(|d, env| {
        d.factory
            .pool_mut(asset)
            .ok_or(singularity_common::SingularityError::PoolNotFound)?
            .approve(env, router, shares)
    })?;
    println!("{} router for {} shares", "Approved".bright_green(), client.symbol(asset));
    Ok(())
}

pub fn show(client: &Client, owner: Option<String>) -> Result<()> {
    let owner = match owner {
        Some(o) => client.account(&o)?,
        None => client.sender,
    };
    println!("{} {}", "=== Liquidity Positions ===".bright_green().bold(), owner);

    let mut found = false;
    for pool in client.deployment.factory.pools() {
        let shares = pool.claim.balance_of(owner);
        if shares.is_zero() {
            continue;
        }
        found = true;
        let value = pool.preview_withdraw(shares).unwrap_or_default();
        println!(
            "  {:<24} {:>20} shares  ~{} {}",
            pool.claim.symbol.bright_cyan(),
            format_units(shares, pool.decimals),
            format_units(value, pool.decimals),
            client.symbol(pool.token)
        );
    }
    if !found {
        println!("\n{}", "No positions found".dimmed());
    }
    Ok(())
}
