//! Typed catalogue of the on-ledger surface.
//!
//! Actions are named remote calls of the form `module::function(args)`.
//! Entry calls mutate state and go through the simulate-then-submit
//! pipeline; [`ViewCall`]s are single round-trip reads.

use serde::{Deserialize, Serialize};

pub const GAME_MODULE: &str = "survivor";
pub const VAULT_MODULE: &str = "vault";
pub const WHITELIST_MODULE: &str = "whitelist";

/// Who an entry call belongs to, and therefore how it is paid.
///
/// Administrator actions are self-paid. Player actions are sponsored:
/// the participant authorizes, a sponsor pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Admin,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Stop,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    JoinGame { invite_code: u64, display_name: String },
    ChooseBao { target: String },
    Vote { choice: VoteChoice },
    StartGame,
    FinalizeSelection,
    RevealBombs,
    FinalizeVoting,
    ResetGame,
    SetPrizeSchedule { schedule: Vec<u64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VaultAction {
    FundVault { asset: String, amount: u64 },
    WithdrawAll { asset: String },
    ClaimPrizes { asset: String },
    SetGame { game: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WhitelistAction {
    Register,
    SetDisplayName { code: u64, name: String },
}

/// One state-mutating call against the deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Game(GameAction),
    Vault(VaultAction),
    Whitelist(WhitelistAction),
}

impl Action {
    pub fn module(&self) -> &'static str {
        match self {
            Action::Game(_) => GAME_MODULE,
            Action::Vault(_) => VAULT_MODULE,
            Action::Whitelist(_) => WHITELIST_MODULE,
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Action::Game(action) => match action {
                GameAction::JoinGame { .. } => "join_game",
                GameAction::ChooseBao { .. } => "choose_bao",
                GameAction::Vote { .. } => "vote",
                GameAction::StartGame => "start_game",
                GameAction::FinalizeSelection => "finalize_selection",
                GameAction::RevealBombs => "reveal_bombs",
                GameAction::FinalizeVoting => "finalize_voting",
                GameAction::ResetGame => "reset_game",
                GameAction::SetPrizeSchedule { .. } => "set_prize_schedule",
            },
            Action::Vault(action) => match action {
                VaultAction::FundVault { .. } => "fund_vault",
                VaultAction::WithdrawAll { .. } => "withdraw_all",
                VaultAction::ClaimPrizes { .. } => "claim_prizes",
                VaultAction::SetGame { .. } => "set_game",
            },
            Action::Whitelist(action) => match action {
                WhitelistAction::Register => "register",
                WhitelistAction::SetDisplayName { .. } => "set_display_name",
            },
        }
    }

    /// `module::function`, the ledger-facing name of the call.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module(), self.function())
    }

    pub fn surface(&self) -> Surface {
        match self {
            Action::Game(action) => match action {
                GameAction::JoinGame { .. }
                | GameAction::ChooseBao { .. }
                | GameAction::Vote { .. } => Surface::Player,
                _ => Surface::Admin,
            },
            Action::Vault(action) => match action {
                VaultAction::ClaimPrizes { .. } => Surface::Player,
                _ => Surface::Admin,
            },
            Action::Whitelist(_) => Surface::Player,
        }
    }
}

/// A read-only call: one round trip, no side effects, no signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCall {
    pub module: String,
    pub function: String,
    pub args: Vec<serde_json::Value>,
}

impl ViewCall {
    pub fn game(function: &str, args: Vec<serde_json::Value>) -> Self {
        Self {
            module: GAME_MODULE.to_string(),
            function: function.to_string(),
            args,
        }
    }

    pub fn vault(function: &str, args: Vec<serde_json::Value>) -> Self {
        Self {
            module: VAULT_MODULE.to_string(),
            function: function.to_string(),
            args,
        }
    }

    pub fn whitelist(function: &str, args: Vec<serde_json::Value>) -> Self {
        Self {
            module: WHITELIST_MODULE.to_string(),
            function: function.to_string(),
            args,
        }
    }
}
