//! Error types for chunkseal.
//!
//! Every variant is a distinct failure mode of the envelope codec. Messages
//! are intentionally minimal: they say *what* failed, never *which* byte or
//! which check, so that nothing surfaced to a peer helps tell a wrong key
//! apart from tampered data.

use std::fmt;

/// The single error type for all chunkseal operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunksealError {
    /// The payload is not a flat string-to-string mapping, or the
    /// reassembled bytes do not parse back into one.
    MalformedPayload,

    /// A decrypted segment is too short to hold both salts.
    CorruptSegment,

    /// Asymmetric decryption failed: wrong key, corrupt ciphertext, bad
    /// transport encoding or a failed authentication tag.
    Decryption,

    /// The digest field decrypted but does not match the chunk sequence.
    Integrity,

    /// `encrypt` on an encrypted container, or `decrypt` on a decrypted one.
    InvalidState,

    /// Sealing a buffer failed inside the AEAD or key agreement.
    Encryption,

    /// Key material was malformed (wrong length, bad encoding).
    InvalidKey,

    /// The codec configuration cannot satisfy its own transport bound.
    InvalidConfig(String),

    /// The wire envelope could not be parsed or violates the transport bound.
    MalformedEnvelope(String),
}

impl ChunksealError {
    /// Whether a transport must answer this error with the generic
    /// "cannot process message" response instead of any detail.
    pub fn is_opaque_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedPayload | Self::CorruptSegment | Self::Decryption | Self::Integrity
        )
    }
}

impl fmt::Display for ChunksealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPayload => write!(f, "malformed payload"),
            Self::CorruptSegment => write!(f, "corrupt segment"),
            Self::Decryption => write!(f, "decryption failed"),
            Self::Integrity => write!(f, "integrity check failed"),
            Self::InvalidState => write!(f, "operation not valid in current container state"),
            Self::Encryption => write!(f, "encryption failed"),
            Self::InvalidKey => write!(f, "invalid key"),
            Self::InvalidConfig(reason) => write!(f, "invalid codec config: {}", reason),
            Self::MalformedEnvelope(reason) => write!(f, "malformed envelope: {}", reason),
        }
    }
}

impl std::error::Error for ChunksealError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_classification() {
        assert!(ChunksealError::Integrity.is_opaque_failure());
        assert!(ChunksealError::Decryption.is_opaque_failure());
        assert!(!ChunksealError::InvalidState.is_opaque_failure());
        assert!(!ChunksealError::MalformedEnvelope("x".into()).is_opaque_failure());
    }

    #[test]
    fn test_display_is_terse() {
        assert_eq!(ChunksealError::Decryption.to_string(), "decryption failed");
        assert_eq!(
            ChunksealError::InvalidConfig("salt".into()).to_string(),
            "invalid codec config: salt"
        );
    }
}
