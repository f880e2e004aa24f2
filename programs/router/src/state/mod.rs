//! Router-side state

pub mod registry;

pub use registry::{pool_code_hash, pool_for, Factory, FactoryConfig};
