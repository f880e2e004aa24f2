//! Test token operations on the deployment's token bank

use anyhow::Result;
use colored::Colorize;
use singularity_common::math::format_units;
use singularity_common::{AssetLedger, U256};

use crate::client::{parse_amount, Client};

pub fn deploy_token(client: &mut Client, name: String, symbol: String, decimals: u8) -> Result<()> {
    let token = client.execute(|d, _| Ok(d.bank.deploy_token(&name, &symbol, decimals)))?;
    println!("{} {} ({}) at {}", "Deployed".bright_green(), name, symbol, token);
    Ok(())
}

pub fn mint(client: &mut Client, token: String, to: String, amount: String) -> Result<()> {
    let token = client.token(&token)?;
    let to = client.account(&to)?;
    let amount = client.amount(token, &amount)?;
    client.execute(|d, _| d.bank.mint(token, to, amount))?;
    println!(
        "{} {} {} to {}",
        "Minted".bright_green(),
        format_units(amount, client.decimals(token)?),
        client.symbol(token),
        to
    );
    Ok(())
}

/// Credit native value (18 decimals)
pub fn fund(client: &mut Client, to: String, amount: String) -> Result<()> {
    let to = client.account(&to)?;
    let amount = parse_amount(&amount, 18)?;
    client.execute(|d, _| d.bank.fund(to, amount))?;
    println!("{} {} ETH to {}", "Funded".bright_green(), format_units(amount, 18), to);
    Ok(())
}

pub fn approve(client: &mut Client, token: String, spender: String, amount: String) -> Result<()> {
    let token = client.token(&token)?;
    let spender = client.account(&spender)?;
    let amount = client.amount(token, &amount)?;
    client.execute(|d, env| d.bank.approve(token, env.sender, spender, amount))?;
    let shown = if amount == U256::MAX {
        "max".to_string()
    } else {
        format_units(amount, client.decimals(token)?)
    };
    println!("{} {} {} for {}", "Approved".bright_green(), shown, client.symbol(token), spender);
    Ok(())
}

pub fn balance(client: &Client, owner: Option<String>) -> Result<()> {
    let owner = match owner {
        Some(o) => client.account(&o)?,
        None => client.sender,
    };
    let bank = &client.deployment.bank;

    println!("{} {}", "=== Balances ===".bright_green().bold(), owner);
    println!(
        "  {:<10} {}",
        "ETH".bright_cyan(),
        format_units(bank.native_balance(owner), 18)
    );
    for (token, meta) in bank.tokens() {
        println!(
            "  {:<10} {}",
            meta.symbol.bright_cyan(),
            format_units(bank.balance_of(token, owner), meta.decimals)
        );
    }
    Ok(())
}
