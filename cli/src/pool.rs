//! Pool creation and factory administration

use anyhow::{anyhow, Result};
use colored::Colorize;
use singularity_common::math::{format_units, PRICE_DECIMALS};
use singularity_common::U256;

use crate::client::{parse_amount, Client};

/// Parse a WAD ratio such as `0.0015`
fn ratio(value: &str) -> Result<U256> {
    parse_amount(value, 18)
}

pub fn create(client: &mut Client, token: String, fee: String, stablecoin: bool) -> Result<()> {
    let asset = client.token(&token)?;
    let base_fee = ratio(&fee)?;
    let pool = client.execute(|d, env| {
        d.factory.create_pool(env, &d.bank, asset, stablecoin, base_fee)
    })?;
    println!("{} {} pool at {}", "Created".bright_green(), client.symbol(asset), pool);
    Ok(())
}

pub fn set_caps(client: &mut Client, caps: Vec<(String, String)>) -> Result<()> {
    let mut assets = Vec::with_capacity(caps.len());
    let mut values = Vec::with_capacity(caps.len());
    for (token, cap) in &caps {
        let asset = client.token(token)?;
        values.push(client.amount(asset, cap)?);
        assets.push(asset);
    }
    client.execute(|d, env| d.factory.set_deposit_caps(env, &assets, &values))?;
    println!("{} deposit caps for {} pool(s)", "Set".bright_green(), assets.len());
    Ok(())
}

pub fn set_fees(client: &mut Client, fees: Vec<(String, String)>) -> Result<()> {
    let mut assets = Vec::with_capacity(fees.len());
    let mut values = Vec::with_capacity(fees.len());
    for (token, fee) in &fees {
        assets.push(client.token(token)?);
        values.push(ratio(fee)?);
    }
    client.execute(|d, env| d.factory.set_base_fees(env, &assets, &values))?;
    println!("{} base fees for {} pool(s)", "Set".bright_green(), assets.len());
    Ok(())
}

pub fn set_paused(client: &mut Client, paused: bool) -> Result<()> {
    client.execute(|d, env| d.factory.set_paused_for_all(env, paused))?;
    let state = if paused { "paused".red() } else { "unpaused".green() };
    println!("All pools {}", state);
    Ok(())
}

pub fn collect_fees(client: &mut Client) -> Result<()> {
    let swept = client.execute(|d, env| d.factory.collect_fees(env, &mut d.bank))?;
    let fee_to = client.deployment.factory.fee_to();
    println!("{} to {}", "=== Fees Collected ===".bright_green().bold(), fee_to);
    for (asset, amount) in swept {
        println!(
            "  {:<8} {}",
            client.symbol(asset).bright_cyan(),
            format_units(amount, client.decimals(asset)?)
        );
    }
    Ok(())
}

pub fn set_fee_to(client: &mut Client, fee_to: String) -> Result<()> {
    let fee_to = client.account(&fee_to)?;
    client.execute(|d, env| d.factory.set_fee_to(env, fee_to))?;
    println!("{} fee beneficiary to {}", "Set".bright_green(), fee_to);
    Ok(())
}

pub fn set_admin(client: &mut Client, admin: String) -> Result<()> {
    let admin = client.account(&admin)?;
    client.execute(|d, env| d.factory.set_admin(env, admin))?;
    println!("{} admin to {}", "Set".bright_green(), admin);
    Ok(())
}

pub fn set_coverage_floor(client: &mut Client, floor: String) -> Result<()> {
    let floor = ratio(&floor)?;
    client.execute(|d, env| d.factory.set_coverage_floor(env, floor))?;
    println!("{} coverage floor to {}", "Set".bright_green(), format_units(floor, 18));
    Ok(())
}

pub fn info(client: &Client, token: String) -> Result<()> {
    let asset = client.token(&token)?;
    let d = &client.deployment;
    let pool = d
        .factory
        .pool(asset)
        .ok_or_else(|| anyhow!("No pool for {}", token))?;
    let dec = pool.decimals;

    println!("{}", format!("=== {} ===", pool.claim.name).bright_green().bold());
    println!("{} {}", "Address:".bright_cyan(), pool.address);
    println!("{} {}", "Claim token:".bright_cyan(), pool.claim.symbol);
    println!("{} {}", "Stablecoin:".bright_cyan(), pool.is_stablecoin);
    println!("{} {}", "Paused:".bright_cyan(), pool.paused);
    let cap = if pool.deposit_cap == U256::MAX {
        "uncapped".to_string()
    } else {
        format_units(pool.deposit_cap, dec)
    };
    println!("{} {}", "Deposit cap:".bright_cyan(), cap);
    println!("{} {}", "Base fee:".bright_cyan(), format_units(pool.base_fee, 18));
    println!("{} {}", "Assets:".bright_cyan(), format_units(pool.assets, dec));
    println!("{} {}", "Liabilities:".bright_cyan(), format_units(pool.liabilities, dec));
    println!("{} {}", "Admin fees:".bright_cyan(), format_units(pool.admin_fees, dec));
    println!("{} {}", "Locked fees:".bright_cyan(), format_units(pool.locked_fees, dec));
    println!("{} {}", "Total supply:".bright_cyan(), format_units(pool.claim.total_supply, dec));
    println!("{} {}", "Price per share:".bright_cyan(), format_units(pool.price_per_share()?, 18));
    let cr = pool.collateralization_ratio()?;
    let cr = if cr == U256::MAX { "inf".to_string() } else { format_units(cr, 18) };
    println!("{} {}", "Collateralization:".bright_cyan(), cr);
    match pool.get_oracle_data(&d.oracle, client.now) {
        Ok(data) => println!(
            "{} ${}",
            "Oracle price:".bright_cyan(),
            format_units(data.price, PRICE_DECIMALS)
        ),
        Err(e) => println!("{} {}", "Oracle price:".bright_cyan(), e.to_string().red()),
    }
    Ok(())
}
