//! Pool account state, views and claim-token surface

use serde::{Deserialize, Serialize};
use singularity_common::{
    eip712, math as fixed, Address, AssetLedger, Env, Result, SingularityError, TokenMetadata,
    B256, U256,
};
use singularity_oracle::{PriceData, PriceOracle};

use crate::math::{coverage_ratio, price_per_share};
use crate::token::ClaimToken;

/// Factory-owned parameters a pool reads on every mutating call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolContext {
    /// Only caller allowed to deposit, withdraw and swap
    pub router: Option<Address>,
    /// Minimum coverage ratio (WAD) a swap-out may leave behind
    pub coverage_floor: U256,
}

/// Per-asset pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub address: Address,
    pub factory: Address,
    /// Underlying asset
    pub token: Address,
    pub decimals: u8,
    pub is_stablecoin: bool,
    pub chain_id: u64,

    pub paused: bool,
    /// Ceiling on `assets` (0 blocks deposits, MAX is uncapped)
    pub deposit_cap: U256,
    /// Swap fee rate (WAD), half charged on each leg
    pub base_fee: U256,

    /// Underlying units held
    pub assets: U256,
    /// Underlying units owed to share holders
    pub liabilities: U256,
    /// Sweepable by the factory fee beneficiary
    pub admin_fees: U256,
    /// Buffer that funds swap-in rebates
    pub locked_fees: U256,

    pub claim: ClaimToken,
}

impl Pool {
    /// Create an empty pool for `token`
    ///
    /// The claim token is named after the asset symbol and the factory
    /// tranche, and uses the asset's decimals.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: Address,
        factory: Address,
        token: Address,
        metadata: &TokenMetadata,
        tranche: &str,
        is_stablecoin: bool,
        base_fee: U256,
        chain_id: u64,
    ) -> Self {
        let claim = ClaimToken::new(
            format!("Singularity {} Pool ({})", metadata.symbol, tranche),
            format!("SPT-{} ({})", metadata.symbol, tranche),
            metadata.decimals,
        );
        Self {
            address,
            factory,
            token,
            decimals: metadata.decimals,
            is_stablecoin,
            chain_id,
            paused: false,
            deposit_cap: U256::ZERO,
            base_fee,
            assets: U256::ZERO,
            liabilities: U256::ZERO,
            admin_fees: U256::ZERO,
            locked_fees: U256::ZERO,
            claim,
        }
    }

    pub(crate) fn ensure_router(&self, ctx: &PoolContext, env: &Env) -> Result<()> {
        if ctx.router != Some(env.sender) {
            log::warn!("Error: {} is not the router of pool {}", env.sender, self.address);
            return Err(SingularityError::NotRouter);
        }
        Ok(())
    }

    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(SingularityError::Paused);
        }
        Ok(())
    }

    /// Assets not reserved for admin or locked fees
    pub fn free_assets(&self) -> U256 {
        self.assets.saturating_sub(self.admin_fees + self.locked_fees)
    }

    /// `assets / liabilities` in WAD, MAX when there are no liabilities
    pub fn collateralization_ratio(&self) -> Result<U256> {
        Ok(coverage_ratio(self.assets, self.liabilities)?)
    }

    /// Underlying redeemable per share in WAD (1.0 while nothing is minted)
    pub fn price_per_share(&self) -> Result<U256> {
        Ok(price_per_share(self.liabilities, self.claim.total_supply)?)
    }

    /// Oracle price of the underlying
    pub fn get_oracle_data(&self, oracle: &PriceOracle, now: u64) -> Result<PriceData> {
        oracle.get_price(self.token, now).map_err(|_| SingularityError::InvalidOraclePrice)
    }

    /// USD value (18 decimals) of a raw amount
    pub fn amount_to_usd(&self, oracle: &PriceOracle, now: u64, amount: U256) -> Result<U256> {
        let data = self.get_oracle_data(oracle, now)?;
        fixed::amount_to_usd(amount, data.price, self.decimals)
    }

    /// Raw amount worth `usd`, rounded down
    pub fn usd_to_amount(&self, oracle: &PriceOracle, now: u64, usd: U256) -> Result<U256> {
        let data = self.get_oracle_data(oracle, now)?;
        fixed::usd_to_amount(usd, data.price, self.decimals)
    }

    /// Move `amount` of underlying out of the pool
    pub(crate) fn pay<L: AssetLedger>(&self, ledger: &mut L, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        ledger.transfer(self.token, self.address, to, amount)
    }

    // ------------------------------------------------------------------
    // Claim token
    // ------------------------------------------------------------------

    pub fn domain_separator(&self) -> B256 {
        eip712::domain_separator(&self.claim.name, self.chain_id, self.address)
    }

    pub fn transfer(&mut self, env: &Env, to: Address, amount: U256) -> Result<()> {
        self.claim.transfer(env.sender, to, amount)
    }

    pub fn approve(&mut self, env: &Env, spender: Address, amount: U256) -> Result<()> {
        self.claim.approve(env.sender, spender, amount);
        Ok(())
    }

    pub fn transfer_from(&mut self, env: &Env, from: Address, to: Address, amount: U256) -> Result<()> {
        self.claim.transfer_from(env.sender, from, to, amount)
    }

    /// Set an allowance from a signed authorisation
    ///
    /// # Security Checks
    /// - `deadline` must not be in the past
    /// - The signature must recover to `owner` over the current nonce
    /// - A successful permit consumes the nonce, so replays fail
    #[allow(clippy::too_many_arguments)]
    pub fn permit(
        &mut self,
        env: &Env,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<()> {
        env.ensure_deadline(deadline)?;

        let nonce = self.claim.nonce(owner);
        let digest =
            eip712::permit_digest(self.domain_separator(), owner, spender, value, nonce, deadline);
        let signer = eip712::recover_signer(digest, v, r, s)?;
        if signer.is_zero() || signer != owner {
            log::warn!("Error: permit for {} signed by {}", owner, signer);
            return Err(SingularityError::InvalidSignature);
        }

        self.claim.use_nonce(owner);
        self.claim.approve(owner, spender, value);
        log::debug!("Permit: {} approved {} for {} on {}", owner, spender, value, self.address);
        Ok(())
    }
}
