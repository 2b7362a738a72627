//! Inbound envelope handling.
//!
//! The receiving side of a transport hands raw request bodies to an `Inbox`
//! and gets back a structured acknowledgement. Every cryptographic or payload
//! failure collapses into the same rejection detail, so a sender learns
//! nothing about which check tripped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CodecConfig;
use crate::container::MessageContainer;
use crate::envelope::Envelope;
use crate::error::ChunksealError;
use crate::keys::PrivateKey;
use crate::payload::Payload;

/// Detail returned for any envelope that fails to open.
pub const CANNOT_PROCESS: &str = "cannot process message";

/// Detail returned for a body that is not a well-formed, in-bound envelope.
pub const INVALID_ENVELOPE: &str = "invalid envelope";

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Accepted,
    Rejected,
}

/// The structured response returned to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub status: AckStatus,
    /// Empty on acceptance; one of the fixed rejection strings otherwise.
    pub detail: String,
    /// Number of chunks in the envelope, zero if it never parsed.
    pub chunks: usize,
    pub received_at: DateTime<Utc>,
}

/// What an `Inbox` yields for one request body.
#[derive(Debug)]
pub struct Delivery {
    pub ack: Acknowledgement,
    /// Present exactly when `ack.status` is `Accepted`.
    pub payload: Option<Payload>,
}

/// Opens envelopes addressed to one private key.
pub struct Inbox {
    key: PrivateKey,
    config: CodecConfig,
}

impl Inbox {
    /// Create an inbox. Fails if `config` cannot satisfy its own bound.
    pub fn new(key: PrivateKey, config: CodecConfig) -> Result<Self, ChunksealError> {
        config.validate()?;
        Ok(Self { key, config })
    }

    /// Fingerprint of the key this inbox opens envelopes for.
    pub fn fingerprint(&self) -> String {
        self.key.fingerprint()
    }

    /// Handle one raw JSON request body.
    pub fn receive(&self, body: &str) -> Delivery {
        let received_at = Utc::now();

        let envelope = match Envelope::from_json(body)
            .and_then(|e| e.check_bounds(self.config.max_encoded_len).map(|_| e))
        {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "envelope rejected");
                return Self::rejected(INVALID_ENVELOPE, 0, received_at);
            }
        };

        let chunks = envelope.chunks.len();
        match MessageContainer::from(envelope).decrypt(&self.key, &self.config) {
            Ok(MessageContainer::Decrypted(payload)) => Delivery {
                ack: Acknowledgement {
                    status: AckStatus::Accepted,
                    detail: String::new(),
                    chunks,
                    received_at,
                },
                payload: Some(payload),
            },
            Ok(MessageContainer::Encrypted(_)) => {
                Self::rejected(CANNOT_PROCESS, chunks, received_at)
            }
            Err(err) => {
                // The variant stays in local logs; the sender sees one string.
                warn!(error = %err, chunks, "envelope failed to open");
                Self::rejected(CANNOT_PROCESS, chunks, received_at)
            }
        }
    }

    fn rejected(detail: &str, chunks: usize, received_at: DateTime<Utc>) -> Delivery {
        Delivery {
            ack: Acknowledgement {
                status: AckStatus::Rejected,
                detail: detail.to_string(),
                chunks,
                received_at,
            },
            payload: None,
        }
    }
}
