//! The two-state message container.
//!
//! A container holds either the plaintext payload or its envelope, never
//! both. `encrypt` and `decrypt` are the only transitions and each returns a
//! new container, leaving the receiver untouched:
//!
//! ```text
//! Decrypted(payload) --encrypt(public)--> Encrypted(envelope)
//! Encrypted(envelope) --decrypt(private)--> Decrypted(payload)
//! ```

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::config::CodecConfig;
use crate::envelope::{self, Envelope};
use crate::error::ChunksealError;
use crate::keys::{PrivateKey, PublicKey};
use crate::payload::Payload;

/// A payload in exactly one of its two representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContainer {
    /// Plaintext, as handed in by the sender or recovered by the recipient.
    Decrypted(Payload),
    /// Ciphertext, as produced by `encrypt` or received from the wire.
    Encrypted(Envelope),
}

impl From<Payload> for MessageContainer {
    fn from(payload: Payload) -> Self {
        Self::Decrypted(payload)
    }
}

impl From<Envelope> for MessageContainer {
    fn from(envelope: Envelope) -> Self {
        Self::Encrypted(envelope)
    }
}

impl MessageContainer {
    /// Wrap a received JSON envelope. Only the shape is checked here.
    pub fn from_json_envelope(text: &str) -> Result<Self, ChunksealError> {
        Envelope::from_json(text).map(Self::Encrypted)
    }

    pub fn is_decrypted(&self) -> bool {
        matches!(self, Self::Decrypted(_))
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }

    /// The plaintext, if this container holds it.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Decrypted(payload) => Some(payload),
            Self::Encrypted(_) => None,
        }
    }

    /// The envelope, if this container holds it.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Encrypted(envelope) => Some(envelope),
            Self::Decrypted(_) => None,
        }
    }

    /// Seal the payload to `recipient`. Fails with `InvalidState` on an
    /// already encrypted container.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        recipient: &PublicKey,
        config: &CodecConfig,
    ) -> Result<Self, ChunksealError> {
        let payload = match self {
            Self::Decrypted(payload) => payload,
            Self::Encrypted(_) => return Err(ChunksealError::InvalidState),
        };

        let envelope = envelope::assemble(rng, payload, recipient, config)?;
        debug!(
            chunks = envelope.chunks.len(),
            recipient = %recipient.fingerprint(),
            "payload sealed"
        );

        Ok(Self::Encrypted(envelope))
    }

    /// Open the envelope with `key`. Fails with `InvalidState` on an already
    /// decrypted container, and with `Integrity` or `Decryption` if the
    /// envelope was not sealed to `key` or was altered in transit.
    pub fn decrypt(&self, key: &PrivateKey, config: &CodecConfig) -> Result<Self, ChunksealError> {
        let envelope = match self {
            Self::Encrypted(envelope) => envelope,
            Self::Decrypted(_) => return Err(ChunksealError::InvalidState),
        };

        let payload = envelope::parse(envelope, key, config)?;
        debug!(chunks = envelope.chunks.len(), entries = payload.len(), "envelope opened");

        Ok(Self::Decrypted(payload))
    }
}
