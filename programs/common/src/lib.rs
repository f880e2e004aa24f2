//! Shared types for the Singularity programs
//!
//! Errors, the call environment, fixed-point helpers, permit hashing and the
//! fungible-token collaborator interface used by the oracle, pools and router.

pub mod eip712;
pub mod env;
pub mod error;
pub mod ledger;
pub mod math;

pub use alloy_primitives::{Address, B256, U256};

pub use env::Env;
pub use error::{Result, SingularityError};
pub use ledger::{AssetLedger, TokenBank, TokenMetadata};
