#![no_std]

//! # Prize Vault
//!
//! Escrow ledger for Lucky Survivor prize funds. Holds one pooled token
//! balance per asset and a per-account claimable ledger credited by the
//! game contract.
//!
//! Solvency is enforced here rather than trusted to callers: the pooled
//! balance can never drop below the sum of outstanding claimables.
//! `credit` rejects amounts that exceed the unreserved pool, and
//! `withdraw_all` drains the unreserved remainder only.

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, token, Address, Env,
};

// ═══════════════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    AdminNotSet = 1,
    GameNotSet = 2,
    InvalidAmount = 3,
    InsufficientPool = 4,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvVaultFunded {
    pub asset: Address,
    pub amount: i128,
}

#[contractevent]
pub struct EvPrizeCredited {
    pub asset: Address,
    pub beneficiary: Address,
    pub amount: i128,
}

#[contractevent]
pub struct EvPrizesClaimed {
    pub asset: Address,
    pub claimer: Address,
    pub amount: i128,
}

#[contractevent]
pub struct EvVaultDrained {
    pub asset: Address,
    pub amount: i128,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Storage
// ═══════════════════════════════════════════════════════════════════════════════

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Admin,
    /// Game contract allowed to credit claimable balances.
    Game,
    /// Pooled balance per asset.
    Balance(Address),
    /// Sum of outstanding claimables per asset.
    TotalClaimable(Address),
    /// Claimable(asset, account) → amount owed to `account`.
    Claimable(Address, Address),
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════════════

// Ledger rate is approximately 5 seconds per ledger on Stellar
const LEDGER_RATE_SECS: u32 = 5;

// Vault records live for 120 days between touches
const TTL_SECONDS: u32 = 120 * 24 * 60 * 60;
const TTL_LEDGERS: u32 = TTL_SECONDS / LEDGER_RATE_SECS;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct PrizeVault;

#[contractimpl]
impl PrizeVault {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Admin: funding & decommissioning
    // ───────────────────────────────────────────────────────────────────────────

    /// Move `amount` of `asset` from the administrator into the pool.
    pub fn fund_vault(env: Env, asset: Address, amount: i128) -> Result<(), VaultError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        if amount <= 0 {
            return Err(VaultError::InvalidAmount);
        }

        token::Client::new(&env, &asset).transfer(
            &admin,
            &env.current_contract_address(),
            &amount,
        );

        let balance = Self::read_amount(&env, &DataKey::Balance(asset.clone()));
        Self::write_amount(&env, &DataKey::Balance(asset.clone()), balance + amount);

        EvVaultFunded { asset, amount }.publish(&env);
        Ok(())
    }

    /// Drain the unreserved remainder (pool minus outstanding claimables)
    /// back to the administrator. Returns the amount withdrawn.
    pub fn withdraw_all(env: Env, asset: Address) -> Result<i128, VaultError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();

        let balance = Self::read_amount(&env, &DataKey::Balance(asset.clone()));
        let reserved = Self::read_amount(&env, &DataKey::TotalClaimable(asset.clone()));
        let unreserved = balance - reserved;
        if unreserved > 0 {
            token::Client::new(&env, &asset).transfer(
                &env.current_contract_address(),
                &admin,
                &unreserved,
            );
            Self::write_amount(&env, &DataKey::Balance(asset.clone()), reserved);
        }

        EvVaultDrained {
            asset,
            amount: unreserved,
        }
        .publish(&env);
        Ok(unreserved)
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Game: crediting
    // ───────────────────────────────────────────────────────────────────────────

    /// Credit `amount` of `asset` to `beneficiary`'s claimable balance.
    ///
    /// Only the registered game contract may credit. Crediting beyond the
    /// unreserved pool fails, so the pool always covers every claimable.
    pub fn credit(
        env: Env,
        beneficiary: Address,
        asset: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        let game: Address = env
            .storage()
            .instance()
            .get(&DataKey::Game)
            .ok_or(VaultError::GameNotSet)?;
        game.require_auth();

        if amount <= 0 {
            return Err(VaultError::InvalidAmount);
        }

        let balance = Self::read_amount(&env, &DataKey::Balance(asset.clone()));
        let reserved = Self::read_amount(&env, &DataKey::TotalClaimable(asset.clone()));
        if amount > balance - reserved {
            return Err(VaultError::InsufficientPool);
        }

        let claim_key = DataKey::Claimable(asset.clone(), beneficiary.clone());
        let owed = Self::read_amount(&env, &claim_key);
        Self::write_amount(&env, &claim_key, owed + amount);
        Self::write_amount(
            &env,
            &DataKey::TotalClaimable(asset.clone()),
            reserved + amount,
        );

        EvPrizeCredited {
            asset,
            beneficiary,
            amount,
        }
        .publish(&env);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Player: claiming
    // ───────────────────────────────────────────────────────────────────────────

    /// Pay out the caller's claimable balance and zero it. A zero claimable
    /// is a no-op returning 0, so repeated claims are harmless.
    pub fn claim_prizes(env: Env, claimer: Address, asset: Address) -> Result<i128, VaultError> {
        claimer.require_auth();

        let claim_key = DataKey::Claimable(asset.clone(), claimer.clone());
        let owed = Self::read_amount(&env, &claim_key);
        if owed == 0 {
            return Ok(0);
        }

        token::Client::new(&env, &asset).transfer(
            &env.current_contract_address(),
            &claimer,
            &owed,
        );

        let balance = Self::read_amount(&env, &DataKey::Balance(asset.clone()));
        let reserved = Self::read_amount(&env, &DataKey::TotalClaimable(asset.clone()));
        Self::write_amount(&env, &DataKey::Balance(asset.clone()), balance - owed);
        Self::write_amount(
            &env,
            &DataKey::TotalClaimable(asset.clone()),
            reserved - owed,
        );
        env.storage().persistent().remove(&claim_key);

        EvPrizesClaimed {
            asset,
            claimer,
            amount: owed,
        }
        .publish(&env);
        Ok(owed)
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Views
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_balance(env: Env, asset: Address) -> i128 {
        Self::read_amount(&env, &DataKey::Balance(asset))
    }

    pub fn get_claimable_balance(env: Env, account: Address, asset: Address) -> i128 {
        Self::read_amount(&env, &DataKey::Claimable(asset, account))
    }

    pub fn get_total_claimable(env: Env, asset: Address) -> i128 {
        Self::read_amount(&env, &DataKey::TotalClaimable(asset))
    }

    /// Pool minus outstanding claimables: the portion still at stake.
    pub fn get_unreserved(env: Env, asset: Address) -> i128 {
        let balance = Self::read_amount(&env, &DataKey::Balance(asset.clone()));
        let reserved = Self::read_amount(&env, &DataKey::TotalClaimable(asset));
        balance - reserved
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Admin: wiring
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, VaultError> {
        Self::load_admin(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), VaultError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        Ok(())
    }

    pub fn get_game(env: Env) -> Result<Address, VaultError> {
        env.storage()
            .instance()
            .get(&DataKey::Game)
            .ok_or(VaultError::GameNotSet)
    }

    pub fn set_game(env: Env, game: Address) -> Result<(), VaultError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage().instance().set(&DataKey::Game, &game);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Internal
    // ───────────────────────────────────────────────────────────────────────────

    fn load_admin(env: &Env) -> Result<Address, VaultError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(VaultError::AdminNotSet)
    }

    fn read_amount(env: &Env, key: &DataKey) -> i128 {
        env.storage().persistent().get(key).unwrap_or(0)
    }

    fn write_amount(env: &Env, key: &DataKey, amount: i128) {
        env.storage().persistent().set(key, &amount);
        env.storage()
            .persistent()
            .extend_ttl(key, TTL_LEDGERS, TTL_LEDGERS);
        env.storage().instance().extend_ttl(TTL_LEDGERS, TTL_LEDGERS);
    }
}
