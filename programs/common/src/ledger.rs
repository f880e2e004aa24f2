//! Fungible-token collaborator interface
//!
//! Pools and the router move underlying assets only through [`AssetLedger`].
//! [`TokenBank`] is the in-memory ledger backing a deployment: standard
//! balance/allowance semantics for every token, native balances, and a
//! wrapped-native token that converts between the two.

use std::collections::BTreeMap;

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

use crate::{Result, SingularityError};

/// Address that deploys test tokens inside a [`TokenBank`]
pub const TOKEN_DEPLOYER: Address = address!("00000000000000000000000000000000000070cb");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Narrow token interface consumed by pools and the router
///
/// Every mutating call is all-or-nothing.
pub trait AssetLedger {
    fn metadata(&self, token: Address) -> Option<TokenMetadata>;
    fn balance_of(&self, token: Address, owner: Address) -> U256;
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;
    fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256)
        -> Result<()>;
    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()>;
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;

    fn native_balance(&self, owner: Address) -> U256;
    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()>;
    /// Wrapped-native `deposit()`: native value of `owner` becomes token balance
    fn wrap_native(&mut self, token: Address, owner: Address, amount: U256) -> Result<()>;
    /// Wrapped-native `withdraw(amount)`: token balance of `owner` becomes native value
    fn unwrap_native(&mut self, token: Address, owner: Address, amount: U256) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenState {
    metadata: TokenMetadata,
    wrapped_native: bool,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<Address, BTreeMap<Address, U256>>,
}

impl TokenState {
    fn balance(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn debit(&mut self, owner: Address, amount: U256) -> Result<()> {
        let balance = self.balance(owner);
        if balance < amount {
            return Err(SingularityError::InsufficientBalance);
        }
        self.balances.insert(owner, balance - amount);
        Ok(())
    }

    fn credit(&mut self, owner: Address, amount: U256) -> Result<()> {
        let balance = self
            .balance(owner)
            .checked_add(amount)
            .ok_or(SingularityError::Overflow)?;
        self.balances.insert(owner, balance);
        Ok(())
    }
}

/// In-memory token ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBank {
    tokens: BTreeMap<Address, TokenState>,
    native: BTreeMap<Address, U256>,
    nonce: u64,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn deploy(&mut self, metadata: TokenMetadata, wrapped_native: bool) -> Address {
        let token = TOKEN_DEPLOYER.create(self.nonce);
        self.nonce += 1;
        self.tokens.insert(
            token,
            TokenState {
                metadata,
                wrapped_native,
                total_supply: U256::ZERO,
                balances: BTreeMap::new(),
                allowances: BTreeMap::new(),
            },
        );
        log::debug!("Token deployed at {}", token);
        token
    }

    /// Deploy a plain fungible token
    pub fn deploy_token(&mut self, name: &str, symbol: &str, decimals: u8) -> Address {
        self.deploy(
            TokenMetadata { name: name.to_string(), symbol: symbol.to_string(), decimals },
            false,
        )
    }

    /// Deploy the wrapped-native token (18 decimals)
    pub fn deploy_wrapped_native(&mut self, name: &str, symbol: &str) -> Address {
        self.deploy(
            TokenMetadata { name: name.to_string(), symbol: symbol.to_string(), decimals: 18 },
            true,
        )
    }

    pub fn tokens(&self) -> impl Iterator<Item = (Address, &TokenMetadata)> {
        self.tokens.iter().map(|(addr, state)| (*addr, &state.metadata))
    }

    pub fn total_supply(&self, token: Address) -> U256 {
        self.tokens.get(&token).map(|t| t.total_supply).unwrap_or_default()
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<()> {
        let state = self.token_mut(token)?;
        state.total_supply =
            state.total_supply.checked_add(amount).ok_or(SingularityError::Overflow)?;
        state.credit(to, amount)
    }

    /// Credit native value to an account (test faucet)
    pub fn fund(&mut self, owner: Address, amount: U256) -> Result<()> {
        let balance = self
            .native_balance(owner)
            .checked_add(amount)
            .ok_or(SingularityError::Overflow)?;
        self.native.insert(owner, balance);
        Ok(())
    }

    fn token_mut(&mut self, token: Address) -> Result<&mut TokenState> {
        self.tokens.get_mut(&token).ok_or(SingularityError::UnknownAsset)
    }

    fn debit_native(&mut self, owner: Address, amount: U256) -> Result<()> {
        let balance = self.native_balance(owner);
        if balance < amount {
            return Err(SingularityError::InsufficientBalance);
        }
        self.native.insert(owner, balance - amount);
        Ok(())
    }
}

impl AssetLedger for TokenBank {
    fn metadata(&self, token: Address) -> Option<TokenMetadata> {
        self.tokens.get(&token).map(|t| t.metadata.clone())
    }

    fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.tokens.get(&token).map(|t| t.balance(owner)).unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.tokens
            .get(&token)
            .and_then(|t| t.allowances.get(&owner))
            .and_then(|a| a.get(&spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        let state = self.token_mut(token)?;
        state.allowances.entry(owner).or_default().insert(spender, amount);
        Ok(())
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        let state = self.token_mut(token)?;
        state.debit(from, amount)?;
        state.credit(to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let allowed = self.allowance(token, from, spender);
        if allowed < amount {
            return Err(SingularityError::InsufficientAllowance);
        }
        let state = self.token_mut(token)?;
        state.debit(from, amount)?;
        state.credit(to, amount)?;
        if allowed != U256::MAX {
            state.allowances.entry(from).or_default().insert(spender, allowed - amount);
        }
        Ok(())
    }

    fn native_balance(&self, owner: Address) -> U256 {
        self.native.get(&owner).copied().unwrap_or_default()
    }

    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        self.debit_native(from, amount)?;
        self.fund(to, amount)
    }

    fn wrap_native(&mut self, token: Address, owner: Address, amount: U256) -> Result<()> {
        if !self.tokens.get(&token).map(|t| t.wrapped_native).unwrap_or(false) {
            return Err(SingularityError::NotWrappedNative);
        }
        self.debit_native(owner, amount)?;
        self.fund(token, amount)?;
        self.mint(token, owner, amount)
    }

    fn unwrap_native(&mut self, token: Address, owner: Address, amount: U256) -> Result<()> {
        let state = self.token_mut(token)?;
        if !state.wrapped_native {
            return Err(SingularityError::NotWrappedNative);
        }
        state.debit(owner, amount)?;
        state.total_supply -= amount;
        self.debit_native(token, amount)?;
        self.fund(owner, amount)
    }
}
