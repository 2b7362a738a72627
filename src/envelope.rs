//! Envelope assembly and parsing.
//!
//! The envelope is the only artefact that crosses the wire:
//!
//! ```json
//! { "digest": "<base64>", "chunks": ["<base64>", "..."] }
//! ```
//!
//! Assembly runs bottom-up: serialise, split, salt, seal, encode, then bind
//! the digest over the encoded chunks. Parsing runs top-down and checks the
//! digest before a single chunk is opened.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::CodecConfig;
use crate::crypto;
use crate::digest;
use crate::error::ChunksealError;
use crate::keys::{PrivateKey, PublicKey};
use crate::payload::{self, Payload};
use crate::segment;

/// The wire structure: an encrypted digest plus the ordered encoded chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// `base64(seal(salt || SHA-256(chunks)))`.
    pub digest: String,
    /// `base64(seal(salt || segment || salt))`, in reassembly order.
    pub chunks: Vec<String>,
}

impl Envelope {
    /// Serialise to compact JSON.
    pub fn to_json(&self) -> Result<String, ChunksealError> {
        serde_json::to_string(self).map_err(|e| ChunksealError::MalformedEnvelope(e.to_string()))
    }

    /// Parse from JSON. Shape only; nothing is decrypted here.
    pub fn from_json(text: &str) -> Result<Self, ChunksealError> {
        serde_json::from_str(text).map_err(|e| ChunksealError::MalformedEnvelope(e.to_string()))
    }

    /// Reject envelopes carrying any string longer than the transport bound.
    pub fn check_bounds(&self, max_encoded_len: usize) -> Result<(), ChunksealError> {
        if self.digest.len() > max_encoded_len {
            return Err(ChunksealError::MalformedEnvelope("digest exceeds transport bound".into()));
        }
        if let Some(i) = self.chunks.iter().position(|c| c.len() > max_encoded_len) {
            return Err(ChunksealError::MalformedEnvelope(format!(
                "chunk {} exceeds transport bound",
                i
            )));
        }
        Ok(())
    }
}

/// Build an envelope for `payload`, readable only with `recipient`'s
/// private key.
pub fn assemble<R: RngCore + CryptoRng>(
    rng: &mut R,
    payload: &Payload,
    recipient: &PublicKey,
    config: &CodecConfig,
) -> Result<Envelope, ChunksealError> {
    config.validate()?;

    let canonical = payload::serialize(payload)?;

    // Draw every boundary up front; the same rng then feeds salts and seals.
    let lengths: Vec<usize> =
        segment::random_lengths(rng, config.min_segment, config.max_segment)
            .take(canonical.len().div_ceil(config.min_segment))
            .collect();
    let segments = segment::split(&canonical, lengths);

    let mut chunks = Vec::with_capacity(segments.len());
    for seg in segments {
        let salted = segment::pad(rng, seg, config.salt_size);
        let sealed = crypto::seal(rng, recipient.as_dh(), &salted)?;
        chunks.push(STANDARD.encode(sealed));
    }

    let digest = digest::bind(rng, &digest::compute(&chunks), config.salt_size, recipient)?;

    Ok(Envelope { digest, chunks })
}

/// Recover the payload from an envelope.
///
/// The digest is checked first; a mismatch fails with `Integrity` before any
/// chunk is opened. No partially reassembled bytes escape on any error path.
pub fn parse(
    envelope: &Envelope,
    key: &PrivateKey,
    config: &CodecConfig,
) -> Result<Payload, ChunksealError> {
    config.validate()?;

    if !digest::verify(&envelope.digest, &envelope.chunks, config.salt_size, key)? {
        return Err(ChunksealError::Integrity);
    }

    let mut canonical = Zeroizing::new(Vec::new());
    for chunk in &envelope.chunks {
        let sealed = STANDARD
            .decode(chunk)
            .map_err(|_| ChunksealError::Decryption)?;
        let salted = crypto::open(key.as_secret(), &sealed)?;
        canonical.extend_from_slice(segment::unpad(&salted, config.salt_size)?);
    }

    payload::deserialize(&canonical)
}
