//! Swaps and quotes

use anyhow::Result;
use colored::Colorize;
use singularity_common::math::format_units;
use singularity_common::{Address, U256};
use singularity_router::SwapQuote;

use crate::client::Client;

pub struct SwapArgs {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub min_out: Option<String>,
    /// Tolerance below the quote when `min_out` is not given
    pub slippage_bps: u64,
    pub recipient: Option<String>,
    pub deadline: u64,
}

/// Minimum output accepted for a quoted amount
pub fn min_out_for(quoted: U256, slippage_bps: u64) -> U256 {
    let bps = U256::from(10_000u64.saturating_sub(slippage_bps));
    quoted * bps / U256::from(10_000u64)
}

pub fn swap(client: &mut Client, args: SwapArgs) -> Result<()> {
    let token_in = client.token(&args.from)?;
    let token_out = client.token(&args.to)?;
    let eth_in = args.from.eq_ignore_ascii_case("eth");
    let eth_out = args.to.eq_ignore_ascii_case("eth");
    let amount_in = client.amount(token_in, &args.amount)?;
    let recipient = match &args.recipient {
        Some(r) => client.account(r)?,
        None => client.sender,
    };
    let deadline = U256::from(client.now + args.deadline);

    let min_out = match &args.min_out {
        Some(m) => client.amount(token_out, m)?,
        None => {
            let d = &client.deployment;
            let quoted = d.router.get_amount_out(&d.factory, &d.oracle, client.now, amount_in, token_in, token_out)?;
            min_out_for(quoted, args.slippage_bps)
        }
    };

    let router = client.deployment.router;
    let quote = if eth_in {
        client.execute_with_value(amount_in, |d, env| {
            router.swap_exact_eth_for_tokens(&mut d.accounts(), env, token_in, token_out, min_out, recipient, deadline)
        })?
    } else if eth_out {
        client.execute(|d, env| {
            router.swap_exact_tokens_for_eth(
                &mut d.accounts(),
                env,
                token_in,
                token_out,
                amount_in,
                min_out,
                recipient,
                deadline,
            )
        })?
    } else {
        client.execute(|d, env| {
            router.swap_exact_tokens_for_tokens(
                &mut d.accounts(),
                env,
                token_in,
                token_out,
                amount_in,
                min_out,
                recipient,
                deadline,
            )
        })?
    };

    println!("{}", "=== Swap ===".bright_green().bold());
    print_quote(client, &quote)?;
    println!("{} {}", "Recipient:".bright_cyan(), recipient);
    Ok(())
}

pub fn quote(client: &Client, from: String, to: String, amount: String) -> Result<()> {
    let token_in = client.token(&from)?;
    let token_out = client.token(&to)?;
    let amount_in = client.amount(token_in, &amount)?;
    let d = &client.deployment;
    let quote = d.router.quote(&d.factory, &d.oracle, client.now, amount_in, token_in, token_out)?;

    println!("{}", "=== Quote ===".bright_green().bold());
    print_quote(client, &quote)
}

fn print_quote(client: &Client, quote: &SwapQuote) -> Result<()> {
    let fmt = |token: Address, amount: U256| -> Result<String> {
        Ok(format!("{} {}", format_units(amount, client.decimals(token)?), client.symbol(token)))
    };
    let (tin, tout) = (quote.token_in, quote.token_out);

    println!("{} {}", "Amount in:".bright_cyan(), fmt(tin, quote.amount_in())?);
    println!("{} {}", "  in fee:".dimmed(), fmt(tin, quote.in_leg.fee.total())?);
    println!("{} {}", "  rebate:".dimmed(), fmt(tin, quote.in_leg.rebate)?);
    println!("{} ${}", "USD value:".bright_cyan(), format_units(quote.usd_value, 18));
    println!("{} {}", "Requested:".bright_cyan(), fmt(tout, quote.out_leg.amount_requested)?);
    println!("{} {}", "  slippage:".dimmed(), fmt(tout, quote.out_leg.slippage)?);
    println!("{} {}", "  out fee:".dimmed(), fmt(tout, quote.out_leg.fee.total())?);
    println!("{} {}", "Amount out:".bright_green(), fmt(tout, quote.amount_out())?);
    Ok(())
}
