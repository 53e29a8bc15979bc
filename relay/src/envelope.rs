//! Signed action envelopes.
//!
//! The signature covers every field except the signatures themselves:
//! `sign(sender_pubkey ‖ sequence ‖ timestamp ‖ fee_payer? ‖ action_hash)`.
//! A sponsored envelope names its fee payer *inside* the signed bytes, so
//! neither party can be swapped out after signing: the participant
//! authorizes the action, the sponsor authorizes paying for it, and both
//! signatures are combined into one [`SignedAction`] before submission.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::action::Action;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("sponsored envelope is missing the fee payer signature")]
    MissingSponsorSignature,
}

/// An ed25519 keypair identifying one account. The hex-encoded public
/// key is the account's address on the ledger boundary.
pub struct AccountKey {
    key: SigningKey,
}

impl AccountKey {
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(secret),
        }
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    pub(crate) fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.key.sign(message).to_bytes())
    }
}

/// The unsigned body of one entry call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    /// Hex-encoded ed25519 public key of the acting participant.
    pub sender_pubkey: String,

    /// The sender account's next sequence number; replay protection.
    pub sequence_number: u64,

    /// Unix timestamp in seconds at build time.
    pub timestamp: u64,

    /// Hex-encoded public key of the sponsor paying the fee, if any.
    pub fee_payer: Option<String>,

    pub action: Action,
}

impl ActionEnvelope {
    pub fn new(sender_pubkey: String, sequence_number: u64, action: Action) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            sender_pubkey,
            sequence_number,
            timestamp,
            fee_payer: None,
            action,
        }
    }

    pub fn with_fee_payer(mut self, fee_payer: String) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    /// The bytes both parties sign.
    ///
    /// `sender (32) ‖ sequence (8 BE) ‖ timestamp (8 BE) ‖ fee_payer (32 | 0)
    /// ‖ sha256(json(action)) (32)` — 80 bytes self-paid, 112 sponsored.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(112);

        bytes.extend_from_slice(&key_bytes_or_digest(&self.sender_pubkey));
        bytes.extend_from_slice(&self.sequence_number.to_be_bytes());
        bytes.extend_from_slice(&self.timestamp.to_be_bytes());
        if let Some(ref payer) = self.fee_payer {
            bytes.extend_from_slice(&key_bytes_or_digest(payer));
        }

        let action_json = serde_json::to_vec(&self.action).unwrap_or_default();
        bytes.extend_from_slice(&Sha256::digest(&action_json));

        bytes
    }

    /// Hash identifying this envelope (and the committed transaction).
    pub fn hash(&self) -> String {
        hex::encode(Sha256::digest(self.signable_bytes()))
    }

    pub(crate) fn sign_with(&self, key: &AccountKey) -> String {
        key.sign(&self.signable_bytes())
    }
}

/// Decode a 32-byte hex key, falling back to a digest of the raw string
/// so malformed identities still produce stable signable bytes.
fn key_bytes_or_digest(hex_key: &str) -> [u8; 32] {
    match hex::decode(hex_key) {
        Ok(raw) if raw.len() == 32 => {
            let mut out = [0u8; 32];
            out.copy_from_slice(&raw);
            out
        }
        _ => Sha256::digest(hex_key.as_bytes()).into(),
    }
}

/// A fully authorized submission: the envelope plus the participant's
/// signature, plus the sponsor's fee-payer signature when sponsored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedAction {
    pub envelope: ActionEnvelope,
    pub sender_signature: String,
    pub fee_payer_signature: Option<String>,
}

impl SignedAction {
    /// Verify every attached authorization against the envelope bytes.
    ///
    /// A sponsored envelope (one that names a fee payer) must carry the
    /// sponsor's signature as well; a self-paid one must not need it.
    pub fn verify(&self) -> Result<(), EnvelopeError> {
        let message = self.envelope.signable_bytes();
        verify_one(&self.envelope.sender_pubkey, &self.sender_signature, &message)?;

        if let Some(ref payer) = self.envelope.fee_payer {
            let payer_sig = self
                .fee_payer_signature
                .as_ref()
                .ok_or(EnvelopeError::MissingSponsorSignature)?;
            verify_one(payer, payer_sig, &message)?;
        }
        Ok(())
    }
}

fn verify_one(pubkey_hex: &str, signature_hex: &str, message: &[u8]) -> Result<(), EnvelopeError> {
    let key_bytes: [u8; 32] = hex::decode(pubkey_hex)
        .map_err(|e| EnvelopeError::InvalidPublicKey(e.to_string()))?
        .try_into()
        .map_err(|_| EnvelopeError::InvalidPublicKey("must be 32 bytes".to_string()))?;
    let key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| EnvelopeError::InvalidPublicKey(e.to_string()))?;

    let sig_bytes: [u8; 64] = hex::decode(signature_hex)
        .map_err(|e| EnvelopeError::InvalidSignature(e.to_string()))?
        .try_into()
        .map_err(|_| EnvelopeError::InvalidSignature("must be 64 bytes".to_string()))?;
    let signature = Signature::from_bytes(&sig_bytes);

    key.verify(message, &signature)
        .map_err(|e| EnvelopeError::InvalidSignature(e.to_string()))
}
