//! In-memory wiring for a self-contained deployment.
//!
//! A real deployment would bind the engine to on-chain token ledgers and
//! market price feeds; the sandbox substitutes in-memory ones so the server
//! can run anywhere. Balances start empty; the faucet endpoint funds
//! accounts with collateral to play with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use alloy::primitives::{Address, I256, U256};

use synthd_common::config::AppConfig;
use synthd_engine::Engine;
use synthd_engine::tokens::{CollateralTokens, SyntheticIssuer};
use synthd_oracle::{PriceFeed, StaticFeed};

/// Account id holding the engine's pooled collateral custody.
pub const SANDBOX_CUSTODY: Address = Address::repeat_byte(0xEC);

/// In-memory multi-asset token ledger implementing the collateral transfer
/// capability.
pub struct MemoryBank {
    custody: Address,
    balances: Mutex<HashMap<(Address, Address), U256>>,
}

impl MemoryBank {
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Credit `holder` with `amount` of `asset` out of thin air (faucet).
    pub fn fund(&self, asset: Address, holder: Address, amount: U256) {
        let mut balances = self.lock();
        let entry = balances.entry((asset, holder)).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.lock()
            .get(&(asset, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Address, Address), U256>> {
        self.balances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn move_balance(&self, asset: Address, from: Address, to: Address, amount: U256) -> bool {
        let mut balances = self.lock();
        let from_balance = balances.get(&(asset, from)).copied().unwrap_or(U256::ZERO);
        let Some(remainder) = from_balance.checked_sub(amount) else {
            return false;
        };
        balances.insert((asset, from), remainder);
        let to_balance = balances.get(&(asset, to)).copied().unwrap_or(U256::ZERO);
        balances.insert((asset, to), to_balance.saturating_add(amount));
        true
    }
}

impl CollateralTokens for MemoryBank {
    fn transfer(&self, asset: Address, to: Address, amount: U256) -> bool {
        self.move_balance(asset, self.custody, to, amount)
    }

    fn transfer_from(&self, asset: Address, from: Address, to: Address, amount: U256) -> bool {
        self.move_balance(asset, from, to, amount)
    }
}

/// In-memory synthetic-asset ledger implementing the issuer capability.
pub struct MemorySynthetic {
    custody: Address,
    balances: Mutex<HashMap<Address, U256>>,
}

impl MemorySynthetic {
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: Mutex::new(HashMap::new()),
        }
    }

    pub fn balance_of(&self, holder: Address) -> U256 {
        self.lock().get(&holder).copied().unwrap_or(U256::ZERO)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Address, U256>> {
        self.balances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SyntheticIssuer for MemorySynthetic {
    fn mint(&self, to: Address, amount: U256) -> bool {
        let mut balances = self.lock();
        let entry = balances.entry(to).or_insert(U256::ZERO);
        match entry.checked_add(amount) {
            Some(updated) => {
                *entry = updated;
                true
            }
            None => false,
        }
    }

    fn burn(&self, amount: U256) {
        let mut balances = self.lock();
        let entry = balances.entry(self.custody).or_insert(U256::ZERO);
        *entry = entry.saturating_sub(amount);
    }

    fn transfer_from(&self, from: Address, to: Address, amount: U256) -> bool {
        let mut balances = self.lock();
        let from_balance = balances.get(&from).copied().unwrap_or(U256::ZERO);
        let Some(remainder) = from_balance.checked_sub(amount) else {
            return false;
        };
        balances.insert(from, remainder);
        let to_balance = balances.get(&to).copied().unwrap_or(U256::ZERO);
        balances.insert(to, to_balance.saturating_add(amount));
        true
    }
}

/// Build an engine over the configured collateral roster, backed by the
/// in-memory bank and issuer.
pub fn build(config: &AppConfig) -> anyhow::Result<(Arc<Engine>, Arc<MemoryBank>)> {
    let bank = Arc::new(MemoryBank::new(SANDBOX_CUSTODY));
    let issuer = Arc::new(MemorySynthetic::new(SANDBOX_CUSTODY));

    let assets: Vec<Address> = config.collateral.iter().map(|spec| spec.asset).collect();
    let feeds: Vec<Arc<dyn PriceFeed>> = config
        .collateral
        .iter()
        .map(|spec| {
            // A negative configured price is carried through as-is; the
            // engine rejects it with InvalidPrice on first read.
            let magnitude = I256::from_raw(U256::from(spec.initial_price.unsigned_abs()));
            let raw = if spec.initial_price < 0 { -magnitude } else { magnitude };
            Arc::new(StaticFeed::new(raw)) as Arc<dyn PriceFeed>
        })
        .collect();

    let engine = Engine::new(SANDBOX_CUSTODY, assets, feeds, bank.clone(), issuer)?;
    Ok((Arc::new(engine), bank))
}
