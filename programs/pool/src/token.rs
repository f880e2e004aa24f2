//! Claim token ledger
//!
//! Standard fungible-token bookkeeping for pool shares plus the per-owner
//! nonce consumed by permits. Authorisation (who may call) is checked by the
//! pool; this type only enforces balances and allowances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use singularity_common::{Address, Result, SingularityError, U256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<Address, BTreeMap<Address, U256>>,
    nonces: BTreeMap<Address, U256>,
}

impl ClaimToken {
    pub fn new(name: String, symbol: String, decimals: u8) -> Self {
        Self {
            name,
            symbol,
            decimals,
            total_supply: U256::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            nonces: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&owner)
            .and_then(|a| a.get(&spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn nonce(&self, owner: Address) -> U256 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    /// Consume the current nonce of `owner`
    pub(crate) fn use_nonce(&mut self, owner: Address) -> U256 {
        let nonce = self.nonce(owner);
        self.nonces.insert(owner, nonce + U256::from(1));
        nonce
    }

    pub(crate) fn mint(&mut self, to: Address, amount: U256) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(SingularityError::Overflow)?;
        self.balances.insert(to, self.balance_of(to) + amount);
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: Address, amount: U256) -> Result<()> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(SingularityError::InsufficientBalance);
        }
        self.balances.insert(from, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }

    pub(crate) fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.entry(owner).or_default().insert(spender, amount);
    }

    pub(crate) fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(SingularityError::InsufficientBalance);
        }
        self.balances.insert(from, balance - amount);
        self.balances.insert(to, self.balance_of(to) + amount);
        Ok(())
    }

    pub(crate) fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(SingularityError::InsufficientAllowance);
        }
        self.transfer(from, to, amount)?;
        if allowed != U256::MAX {
            self.approve(from, spender, allowed - amount);
        }
        Ok(())
    }
}
