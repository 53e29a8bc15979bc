//! The ledger boundary.
//!
//! Everything below this trait (transaction ordering, consensus, fund
//! transfers, the contracts' own execution) belongs to the ledger.
//! The execution layer only needs to read an account's next sequence
//! number, dry-run an envelope, submit a signed action and poll for
//! finality.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::ViewCall;
use crate::envelope::{ActionEnvelope, SignedAction};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger connection failed: {0}")]
    Connection(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("view call failed: {0}")]
    ViewFailed(String),
}

/// Outcome of dry-running an envelope against current replicated state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub success: bool,
    /// The ledger's execution status string, e.g. `Executed successfully`
    /// or the failing contract error.
    pub status: String,
    pub gas_used: u64,
}

/// A committed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub hash: String,
    pub success: bool,
    pub status: String,
}

/// Where a submitted transaction currently stands.
#[derive(Debug, Clone)]
pub enum TxStatus {
    Pending,
    Committed(Receipt),
    Rejected(String),
}

/// Minimal client surface of the replicated ledger.
///
/// Implementations are network clients; waits for simulation results and
/// finality are the only blocking points in the execution layer.
#[allow(async_fn_in_trait)]
pub trait LedgerBackend {
    /// Next sequence number expected from `account`.
    async fn account_sequence(&self, account: &str) -> Result<u64, LedgerError>;

    /// Dry-run `envelope` against current state without committing.
    async fn simulate(&self, envelope: &ActionEnvelope) -> Result<Simulation, LedgerError>;

    /// Submit a fully signed action; returns the transaction hash.
    async fn submit(&self, action: &SignedAction) -> Result<String, LedgerError>;

    async fn transaction_status(&self, hash: &str) -> Result<TxStatus, LedgerError>;

    /// Read-only call, single round trip, no side effects.
    async fn view(&self, call: &ViewCall) -> Result<serde_json::Value, LedgerError>;
}
