//! # chunkseal
//!
//! Public-key sealed envelopes for transports with a small per-message limit.
//!
//! A flat string-to-string payload is serialised, cut into randomly sized
//! segments, wrapped in fresh salts, and each segment is sealed to the
//! recipient's X25519 public key. The encoded chunks are bound together by an
//! encrypted, salted SHA-256 digest, so reordering or swapping chunks is
//! detected before anything is decrypted. Every string on the wire stays
//! under the configured transport bound.
//!
//! ## Public API
//!
//! The surface is intentionally narrow: keys, the codec config, the
//! two-state `MessageContainer`, the wire `Envelope`, and the `Inbox` used on
//! the receiving side. The primitives in `crypto` are crate-private.

pub(crate) mod crypto;
pub mod config;
pub mod container;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod inbox;
pub mod keys;
pub mod payload;
pub mod segment;

pub use config::CodecConfig;
pub use container::MessageContainer;
pub use envelope::Envelope;
pub use error::ChunksealError;
pub use inbox::{AckStatus, Acknowledgement, Delivery, Inbox};
pub use keys::{generate_keypair, private_keys_equal, public_keys_equal, PrivateKey, PublicKey};
pub use payload::Payload;

/// Generate a key pair from the operating system's CSPRNG.
///
/// Use `keys::generate_keypair` to supply your own generator.
pub fn generate_keypair_os() -> (PrivateKey, PublicKey) {
    keys::generate_keypair(&mut rand::rngs::OsRng)
}
