//! Transaction execution layer for Lucky Survivor.
//!
//! Every state-mutating action follows the same discipline:
//!
//! ```text
//! build → simulate → (reject on simulation failure) → sign → submit
//!       → await finality → committed receipt
//! ```
//!
//! Two execution modes exist. *Self-paid* actions are signed and paid by
//! the caller (the administrator surface). *Sponsored* actions carry two
//! authorizations over the same envelope bytes, the acting participant's
//! signature plus a sponsor's fee-payer signature, so players join,
//! select, vote and claim without ever holding fee money.
//!
//! The ledger itself (ordering, consensus, fund transfers) sits behind
//! the [`LedgerBackend`] trait and is out of scope here.

pub mod action;
pub mod envelope;
pub mod executor;
pub mod ledger;

pub use action::{Action, GameAction, Surface, VaultAction, ViewCall, VoteChoice, WhitelistAction};
pub use envelope::{AccountKey, ActionEnvelope, EnvelopeError, SignedAction};
pub use executor::{Executor, RelayConfig, RelayError};
pub use ledger::{LedgerBackend, LedgerError, Receipt, Simulation, TxStatus};
