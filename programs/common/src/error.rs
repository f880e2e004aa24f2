//! Error taxonomy shared by every program
//!
//! The `Display` string of each variant is the stable reason callers match on.

use curve_model::CurveError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, SingularityError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SingularityError {
    // Input validation
    #[error("SingularityPool: AMOUNT_IS_0")]
    AmountIsZero,
    #[error("SingularityFactory: ZERO_ADDRESS")]
    ZeroAddress,
    #[error("SingularityFactory: NOT_SAME_LENGTH")]
    NotSameLength,
    #[error("SingularityFactory: BASE_FEE_IS_0")]
    BaseFeeIsZero,
    #[error("SingularityRouter: IDENTICAL_TOKENS")]
    IdenticalTokens,

    // Authorization
    #[error("SingularityPool: NOT_ROUTER")]
    NotRouter,
    #[error("SingularityFactory: NOT_ADMIN")]
    NotAdmin,
    #[error("SingularityOracle: NOT_OWNER")]
    NotOwner,
    #[error("SingularityOracle: NOT_PUSHER")]
    NotPusher,
    #[error("SingularityFactory: ROUTER_ALREADY_SET")]
    RouterAlreadySet,
    #[error("SingularityPoolToken: INVALID_SIGNATURE")]
    InvalidSignature,
    #[error("EXPIRED")]
    Expired,

    // Capacity and state
    #[error("SingularityPool: DEPOSIT_EXCEEDS_CAP")]
    DepositExceedsCap,
    #[error("SingularityPool: PAUSED")]
    Paused,
    #[error("SingularityRouter: POOL_NOT_FOUND")]
    PoolNotFound,
    #[error("SingularityFactory: POOL_EXISTS")]
    PoolExists,
    #[error("SingularityFactory: UNKNOWN_ASSET")]
    UnknownAsset,

    // Economic bounds
    #[error("SingularityPool: INSUFFICIENT_LIQUIDITY")]
    InsufficientLiquidity,
    #[error("SingularityRouter: INSUFFICIENT_OUTPUT_AMOUNT")]
    InsufficientOutputAmount,
    #[error("SingularityRouter: INSUFFICIENT_INPUT_AMOUNT")]
    InsufficientInputAmount,
    #[error("SingularityRouter: INSUFFICIENT_LIQUIDITY_AMOUNT")]
    InsufficientLiquidityAmount,
    #[error("SingularityRouter: INSUFFICIENT_TOKEN_AMOUNT")]
    InsufficientTokenAmount,
    #[error("SingularityRouter: INVALID_IN_TOKEN")]
    InvalidInToken,
    #[error("SingularityRouter: INVALID_OUT_TOKEN")]
    InvalidOutToken,

    // Oracle
    #[error("SingularityOracle: INVALID_PRICE")]
    InvalidPrice,
    #[error("SingularityPool: INVALID_ORACLE_PRICE")]
    InvalidOraclePrice,

    // Token ledger
    #[error("ERC20: INSUFFICIENT_BALANCE")]
    InsufficientBalance,
    #[error("ERC20: INSUFFICIENT_ALLOWANCE")]
    InsufficientAllowance,
    #[error("WETH: NOT_WRAPPED_NATIVE")]
    NotWrappedNative,

    #[error("MATH_OVERFLOW")]
    Overflow,
}

impl From<CurveError> for SingularityError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidAmount => SingularityError::AmountIsZero,
            CurveError::InsufficientLiquidity => SingularityError::InsufficientLiquidity,
            CurveError::Overflow => SingularityError::Overflow,
        }
    }
}
