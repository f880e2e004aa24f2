//! Singularity pool
//!
//! One pool per asset. A pool holds its asset's liquidity, issues claim-token
//! shares against its liabilities and prices both legs of a swap off its own
//! coverage ratio. Every mutating entry point is reserved for the router set
//! on the factory.

pub mod liquidity;
pub mod math;
pub mod state;
pub mod swap;
pub mod token;

pub use state::{Pool, PoolContext};
pub use swap::{SwapInQuote, SwapOutQuote};
pub use token::ClaimToken;
