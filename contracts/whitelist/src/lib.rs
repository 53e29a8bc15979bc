#![no_std]

//! # Whitelist Gateway
//!
//! Invite-code registry for Lucky Survivor. An account registers itself
//! (fees may be sponsored by the administrator), receives a sequential
//! invite code, and may bind a display name to that code. The game
//! contract consumes codes through `lookup_code` to gate `join_game`.

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, Env, String,
};

// ═══════════════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum WhitelistError {
    AlreadyRegistered = 1,
    NotRegistered = 2,
    InvalidCode = 3,
    AdminNotSet = 4,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvAccountRegistered {
    pub account: Address,
    pub code: u64,
}

#[contractevent]
pub struct EvDisplayNameSet {
    pub account: Address,
    pub code: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Storage
// ═══════════════════════════════════════════════════════════════════════════════

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Admin,
    NextCode,
    /// Invite code → registered owner.
    CodeOwner(u64),
    /// Registered owner → invite code.
    OwnerCode(Address),
    DisplayName(Address),
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Codes start above zero so an uninitialized default is never a valid code.
const FIRST_INVITE_CODE: u64 = 1000;

// Ledger rate is approximately 5 seconds per ledger on Stellar
const LEDGER_RATE_SECS: u32 = 5;

// Registry entries live for 120 days between touches
const TTL_SECONDS: u32 = 120 * 24 * 60 * 60;
const TTL_LEDGERS: u32 = TTL_SECONDS / LEDGER_RATE_SECS;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct Whitelist;

#[contractimpl]
impl Whitelist {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::NextCode, &FIRST_INVITE_CODE);
    }

    /// Register the calling account and return its invite code.
    ///
    /// The account authorizes the registration; the transaction fee may be
    /// paid by any sponsor. Registering twice fails.
    pub fn register(env: Env, account: Address) -> Result<u64, WhitelistError> {
        account.require_auth();

        let owner_key = DataKey::OwnerCode(account.clone());
        if env.storage().persistent().has(&owner_key) {
            return Err(WhitelistError::AlreadyRegistered);
        }

        let code: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextCode)
            .unwrap_or(FIRST_INVITE_CODE);
        env.storage().instance().set(&DataKey::NextCode, &(code + 1));

        let code_key = DataKey::CodeOwner(code);
        env.storage().persistent().set(&code_key, &account);
        env.storage()
            .persistent()
            .extend_ttl(&code_key, TTL_LEDGERS, TTL_LEDGERS);
        env.storage().persistent().set(&owner_key, &code);
        env.storage()
            .persistent()
            .extend_ttl(&owner_key, TTL_LEDGERS, TTL_LEDGERS);

        EvAccountRegistered {
            account,
            code,
        }
        .publish(&env);

        Ok(code)
    }

    /// Bind a display name to an invite code. The code must belong to the
    /// authorizing account.
    pub fn set_display_name(
        env: Env,
        account: Address,
        code: u64,
        name: String,
    ) -> Result<(), WhitelistError> {
        account.require_auth();

        let owner: Option<Address> = env.storage().persistent().get(&DataKey::CodeOwner(code));
        match owner {
            Some(ref registered) if *registered == account => {}
            _ => return Err(WhitelistError::InvalidCode),
        }

        let name_key = DataKey::DisplayName(account.clone());
        env.storage().persistent().set(&name_key, &name);
        env.storage()
            .persistent()
            .extend_ttl(&name_key, TTL_LEDGERS, TTL_LEDGERS);

        EvDisplayNameSet { account, code }.publish(&env);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Views
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_invite_code(env: Env, account: Address) -> Result<u64, WhitelistError> {
        env.storage()
            .persistent()
            .get(&DataKey::OwnerCode(account))
            .ok_or(WhitelistError::NotRegistered)
    }

    /// Resolve an invite code to its owner. Consumed by the game contract
    /// to validate `join_game` calls.
    pub fn lookup_code(env: Env, code: u64) -> Option<Address> {
        env.storage().persistent().get(&DataKey::CodeOwner(code))
    }

    pub fn get_display_name(env: Env, account: Address) -> Option<String> {
        env.storage().persistent().get(&DataKey::DisplayName(account))
    }

    pub fn get_registered_count(env: Env) -> u64 {
        let next: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextCode)
            .unwrap_or(FIRST_INVITE_CODE);
        next - FIRST_INVITE_CODE
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Admin
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, WhitelistError> {
        Self::load_admin(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), WhitelistError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        Ok(())
    }

    fn load_admin(env: &Env) -> Result<Address, WhitelistError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(WhitelistError::AdminNotSet)
    }
}
