//! Key material and its textual forms.
//!
//! This module owns three responsibilities:
//! 1. Holding X25519 key material in types that keep the secret half opaque,
//!    non-cloneable, and zeroised on drop.
//! 2. Fingerprinting and comparing keys without leaking timing.
//! 3. Transcoding keys to and from base64 for configuration files.
//!
//! Together with `crypto`, this is the only module that imports
//! `x25519_dalek` directly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as DhPublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::{self, KEY_LEN};
use crate::error::ChunksealError;

// ---------------------------------------------------------------------------
// Public key
// ---------------------------------------------------------------------------

/// The recipient's public key. Anyone holding it can produce envelopes that
/// only the matching `PrivateKey` opens.
#[derive(Clone, Copy)]
pub struct PublicKey {
    inner: DhPublicKey,
}

impl PublicKey {
    /// Construct a `PublicKey` from its raw 32 bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            inner: DhPublicKey::from(bytes),
        }
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        self.inner.as_bytes()
    }

    /// Lowercase hex SHA-256 of the key bytes. Safe to display and log.
    pub fn fingerprint(&self) -> String {
        hex::encode(crypto::sha256_concat([self.as_bytes().as_slice()]))
    }

    /// Standard base64 of the raw key bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    /// Parse a key produced by `to_base64`.
    pub fn from_base64(text: &str) -> Result<Self, ChunksealError> {
        let bytes = decode_key(text)?;
        Ok(Self::from_bytes(*bytes))
    }

    pub(crate) fn as_dh(&self) -> &DhPublicKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        crypto::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for PublicKey {}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey").field(&self.fingerprint()).finish()
    }
}

// ---------------------------------------------------------------------------
// Private key
// ---------------------------------------------------------------------------

/// The recipient's private key. The only thing that opens an envelope.
///
/// - Not `Clone`. Cannot be duplicated without an explicit round-trip
///   through `to_base64`.
/// - Zeroised on drop by `x25519_dalek`.
pub struct PrivateKey {
    inner: StaticSecret,
}

impl PrivateKey {
    /// Construct a `PrivateKey` from raw secret bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            inner: StaticSecret::from(bytes),
        }
    }

    /// The public half of this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: DhPublicKey::from(&self.inner),
        }
    }

    /// Fingerprint of the *public* half. The secret bytes never feed a
    /// displayable value.
    pub fn fingerprint(&self) -> String {
        self.public_key().fingerprint()
    }

    /// Standard base64 of the secret bytes, wrapped so the text is wiped
    /// once the caller drops it.
    pub fn to_base64(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.inner.to_bytes());
        Zeroizing::new(STANDARD.encode(&bytes[..]))
    }

    /// Parse a key produced by `to_base64`.
    pub fn from_base64(text: &str) -> Result<Self, ChunksealError> {
        let bytes = decode_key(text)?;
        Ok(Self::from_bytes(*bytes))
    }

    /// Borrow the secret for opening sealed buffers.
    ///
    /// `pub(crate)` — secret bytes never leave the crate.
    pub(crate) fn as_secret(&self) -> &StaticSecret {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"<redacted>").finish()
    }
}

/// Constant-time equality for two private keys.
pub fn private_keys_equal(a: &PrivateKey, b: &PrivateKey) -> bool {
    let a_bytes = Zeroizing::new(a.inner.to_bytes());
    let b_bytes = Zeroizing::new(b.inner.to_bytes());
    crypto::constant_time_eq(&a_bytes[..], &b_bytes[..])
}

/// Constant-time equality for two public keys.
pub fn public_keys_equal(a: &PublicKey, b: &PublicKey) -> bool {
    a == b
}

/// Generate a fresh key pair from the injected CSPRNG.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (PrivateKey, PublicKey) {
    let private = PrivateKey {
        inner: StaticSecret::random_from_rng(&mut *rng),
    };
    let public = private.public_key();
    (private, public)
}

fn decode_key(text: &str) -> Result<Zeroizing<[u8; KEY_LEN]>, ChunksealError> {
    let raw = Zeroizing::new(
        STANDARD
            .decode(text.trim())
            .map_err(|_| ChunksealError::InvalidKey)?,
    );
    if raw.len() != KEY_LEN {
        return Err(ChunksealError::InvalidKey);
    }

    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    bytes.copy_from_slice(&raw[..]);
    Ok(bytes)
}
