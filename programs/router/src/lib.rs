//! Singularity router and factory
//!
//! The factory registers pools and holds the admin parameters. The router
//! drives liquidity and swaps across pools at oracle prices. [`Deployment`]
//! ties both to an oracle and a token ledger and is the unit of atomicity.

pub mod deployment;
pub mod instructions;
pub mod state;

pub use deployment::{Deployment, DEFAULT_TRANCHE};
pub use instructions::liquidity::PermitSignature;
pub use instructions::{Accounts, Router, SwapQuote};
pub use state::{pool_code_hash, pool_for, Factory, FactoryConfig};
