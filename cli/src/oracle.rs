//! Oracle operations

use anyhow::Result;
use colored::Colorize;
use singularity_common::math::{format_units, PRICE_DECIMALS};

use crate::client::{parse_amount, Client};

pub fn set_pusher(client: &mut Client, pusher: String, revoke: bool) -> Result<()> {
    let pusher = client.account(&pusher)?;
    client.execute(|d, env| d.oracle.set_pusher(env, pusher, !revoke))?;
    let action = if revoke { "Revoked" } else { "Granted" };
    println!("{} push rights for {}", action.bright_green(), pusher);
    Ok(())
}

/// Push one USD price per token, stamped with the transaction time
pub fn push(client: &mut Client, prices: Vec<(String, String)>) -> Result<()> {
    let mut assets = Vec::with_capacity(prices.len());
    let mut values = Vec::with_capacity(prices.len());
    for (token, price) in &prices {
        assets.push(client.token(token)?);
        values.push(parse_amount(price, PRICE_DECIMALS)?);
    }

    client.execute(|d, env| d.oracle.push_prices(env, &assets, &values))?;
    for (asset, price) in assets.iter().zip(&values) {
        println!(
            "{} {} = ${}",
            "Pushed".bright_green(),
            client.symbol(*asset),
            format_units(*price, PRICE_DECIMALS)
        );
    }
    Ok(())
}

pub fn price(client: &Client, token: String) -> Result<()> {
    let asset = client.token(&token)?;
    let oracle = &client.deployment.oracle;
    match oracle.latest(asset) {
        Some(data) => {
            let valid = match oracle.get_price(asset, client.now) {
                Ok(_) => "valid".green(),
                Err(e) => e.to_string().red(),
            };
            println!(
                "{} ${} (updated at {}, {})",
                client.symbol(asset).bright_cyan(),
                format_units(data.price, PRICE_DECIMALS),
                data.updated_at,
                valid
            );
        }
        None => println!("{} {}", client.symbol(asset).bright_cyan(), "no price".dimmed()),
    }
    Ok(())
}

pub fn set_max_age(client: &mut Client, seconds: u64) -> Result<()> {
    client.execute(|d, env| d.oracle.set_max_price_age(env, seconds))?;
    println!("{} max price age to {}s", "Set".bright_green(), seconds);
    Ok(())
}

/// Parse `TOKEN=PRICE`
pub fn parse_price_pair(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(t, p)| (t.trim().to_string(), p.trim().to_string()))
        .ok_or_else(|| format!("expected TOKEN=PRICE, got {}", value))
}
