//! Deployment bootstrap and status

use anyhow::{bail, Result};
use colored::Colorize;
use singularity_common::math::format_units;
use singularity_common::{Address, U256};
use singularity_router::Deployment;

use crate::client::Client;
use crate::config::CliConfig;

/// Create oracle, factory and router owned by `admin` and persist them
pub fn init(config: &CliConfig, admin: Address, now: u64, force: bool) -> Result<()> {
    println!("{}", "=== Deploy Singularity ===".bright_green().bold());

    let state_path = config.state_path();
    if state_path.exists() && !force {
        bail!(
            "A deployment already exists at {}\nPass --force to replace it",
            state_path.display()
        );
    }

    let deployment = Deployment::new(admin, &config.tranche, config.chain_id)?;
    let client = Client::create(config, deployment, admin, now);
    client.save()?;

    let d = &client.deployment;
    println!("{} {}", "Admin:".bright_cyan(), admin);
    println!("{} {}", "Oracle:".bright_cyan(), d.oracle.address());
    println!("{} {}", "Factory:".bright_cyan(), d.factory.address());
    println!("{} {}", "Router:".bright_cyan(), d.router.address);
    println!("{} {}", "WETH:".bright_cyan(), d.router.weth);
    println!("{} {}", "Tranche:".bright_cyan(), d.factory.tranche());
    println!("{} {}", "State:".bright_cyan(), state_path.display());
    println!("\n{}", "Deployment complete".bright_green());
    Ok(())
}

/// Print the factory, oracle and every pool
pub fn status(client: &Client) -> Result<()> {
    let d = &client.deployment;
    let f = &d.factory;

    println!("{}", "=== Singularity Status ===".bright_green().bold());
    println!("{} {}", "Chain id:".bright_cyan(), f.chain_id());
    println!("{} {}", "Tranche:".bright_cyan(), f.tranche());
    println!("{} {}", "Admin:".bright_cyan(), f.admin());
    println!("{} {}", "Fee to:".bright_cyan(), f.fee_to());
    println!("{} {}", "Router:".bright_cyan(), d.router.address);
    println!("{} {}", "Oracle:".bright_cyan(), d.oracle.address());
    println!(
        "{} {}s",
        "Max price age:".bright_cyan(),
        d.oracle.config().max_price_age
    );
    println!(
        "{} {}",
        "Coverage floor:".bright_cyan(),
        format_units(f.config().coverage_floor, 18)
    );
    let paused = if f.paused_for_all() { "yes".red() } else { "no".green() };
    println!("{} {}", "Paused:".bright_cyan(), paused);

    println!("\n{} {}", "Pools:".bright_yellow(), f.all_pools_length());
    for pool in f.pools() {
        let symbol = client.symbol(pool.token);
        let cr = pool.collateralization_ratio()?;
        let cr = if cr == U256::MAX {
            "inf".to_string()
        } else {
            format!("{}%", format_units(cr.saturating_mul(U256::from(100)), 18))
        };
        println!(
            "  {:<8} assets {:>20}  liabilities {:>20}  coverage {:>8}",
            symbol,
            format_units(pool.assets, pool.decimals),
            format_units(pool.liabilities, pool.decimals),
            cr
        );
    }
    Ok(())
}
