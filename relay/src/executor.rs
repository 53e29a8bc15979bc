//! The simulate-then-submit pipeline.

use std::time::Duration;

use tracing::{info, warn};

use crate::action::{Action, Surface, ViewCall};
use crate::envelope::{AccountKey, ActionEnvelope, EnvelopeError, SignedAction};
use crate::ledger::{LedgerBackend, LedgerError, Receipt, TxStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The ledger's dry run failed; nothing was signed or submitted.
    #[error("simulation failed: {0}")]
    SimulationFailed(String),

    /// The transaction was ordered but did not commit.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Sponsoring is reserved for the player surface.
    #[error("{0} is an administrator action and cannot be sponsored")]
    NotSponsorable(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Delay between finality polls. There is no overall timeout here;
    /// callers impose their own.
    pub finality_poll_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            finality_poll_ms: 500,
        }
    }
}

/// Drives entry calls through build → simulate → sign → submit → await
/// finality, in self-paid or sponsored mode.
pub struct Executor<L> {
    ledger: L,
    config: RelayConfig,
}

impl<L: LedgerBackend> Executor<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            config: RelayConfig::default(),
        }
    }

    pub fn with_config(ledger: L, config: RelayConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Execute an action signed and paid by `signer`. Used for the
    /// administrator surface.
    pub async fn execute_entry(
        &self,
        signer: &AccountKey,
        action: Action,
    ) -> Result<Receipt, RelayError> {
        let sender = signer.public_key_hex();
        let sequence = self.ledger.account_sequence(&sender).await?;
        let envelope = ActionEnvelope::new(sender, sequence, action);

        self.simulate_checked(&envelope).await?;

        let sender_signature = envelope.sign_with(signer);
        let signed = SignedAction {
            envelope,
            sender_signature,
            fee_payer_signature: None,
        };
        self.submit_and_wait(signed).await
    }

    /// Execute a player action authorized by `participant` with the
    /// transaction fee paid by `sponsor`. Both sign the same envelope;
    /// the participant never pays.
    pub async fn execute_sponsored(
        &self,
        participant: &AccountKey,
        sponsor: &AccountKey,
        action: Action,
    ) -> Result<Receipt, RelayError> {
        if action.surface() != Surface::Player {
            return Err(RelayError::NotSponsorable(action.qualified_name()));
        }

        let sender = participant.public_key_hex();
        let sequence = self.ledger.account_sequence(&sender).await?;
        let envelope = ActionEnvelope::new(sender, sequence, action)
            .with_fee_payer(sponsor.public_key_hex());

        self.simulate_checked(&envelope).await?;

        let sender_signature = envelope.sign_with(participant);
        let fee_payer_signature = envelope.sign_with(sponsor);
        let signed = SignedAction {
            envelope,
            sender_signature,
            fee_payer_signature: Some(fee_payer_signature),
        };
        self.submit_and_wait(signed).await
    }

    /// Read-only call; no simulation, no signatures.
    pub async fn view(&self, call: &ViewCall) -> Result<serde_json::Value, RelayError> {
        Ok(self.ledger.view(call).await?)
    }

    /// Dry-run the envelope and refuse to go further on failure, so a
    /// failing action is never signed, let alone submitted.
    async fn simulate_checked(&self, envelope: &ActionEnvelope) -> Result<(), RelayError> {
        let simulation = self.ledger.simulate(envelope).await?;
        if !simulation.success {
            warn!(
                action = %envelope.action.qualified_name(),
                status = %simulation.status,
                "simulation failed; aborting before submission"
            );
            return Err(RelayError::SimulationFailed(simulation.status));
        }
        Ok(())
    }

    async fn submit_and_wait(&self, signed: SignedAction) -> Result<Receipt, RelayError> {
        let action_name = signed.envelope.action.qualified_name();
        let hash = self.ledger.submit(&signed).await?;
        info!(%hash, action = %action_name, sponsored = signed.envelope.fee_payer.is_some(), "submitted");

        loop {
            match self.ledger.transaction_status(&hash).await? {
                TxStatus::Committed(receipt) => {
                    info!(%hash, status = %receipt.status, "committed");
                    return Ok(receipt);
                }
                TxStatus::Rejected(status) => {
                    warn!(%hash, %status, "rejected");
                    return Err(RelayError::Rejected(status));
                }
                TxStatus::Pending => {
                    tokio::time::sleep(Duration::from_millis(self.config.finality_poll_ms)).await;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
//  Tests
// ════════════════════════════════════════════════════════════════════════════
