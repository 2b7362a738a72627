//! Integrity digest over the chunk sequence.
//!
//! The digest binds the exact encoded chunk strings, in order:
//!
//! ```text
//! digest_field = base64(seal(salt || SHA-256(chunk_0 || chunk_1 || ...)))
//! ```
//!
//! Replacing, reordering, dropping or appending a chunk changes the hash.
//! Verification runs over the encoded strings, so it happens before any chunk
//! is opened.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::{self, DIGEST_LEN};
use crate::error::ChunksealError;
use crate::keys::{PrivateKey, PublicKey};

/// SHA-256 over the UTF-8 bytes of every chunk, concatenated in order.
pub fn compute<S: AsRef<str>>(chunks: &[S]) -> [u8; DIGEST_LEN] {
    crypto::sha256_concat(chunks.iter().map(|c| c.as_ref().as_bytes()))
}

/// Salt, seal and encode a raw digest into the envelope's digest field.
pub fn bind<R: RngCore + CryptoRng>(
    rng: &mut R,
    digest: &[u8; DIGEST_LEN],
    salt_size: usize,
    recipient: &PublicKey,
) -> Result<String, ChunksealError> {
    let mut plain = vec![0u8; salt_size + DIGEST_LEN];
    crypto::fill_random(rng, &mut plain[..salt_size]);
    plain[salt_size..].copy_from_slice(digest);

    let sealed = crypto::seal(rng, recipient.as_dh(), &plain)?;
    Ok(STANDARD.encode(sealed))
}

/// Open the digest field and compare it against `chunks`.
///
/// Returns `Ok(false)` on a mismatch. A digest field that will not decode or
/// open is a `Decryption` error.
pub fn verify<S: AsRef<str>>(
    field: &str,
    chunks: &[S],
    salt_size: usize,
    key: &PrivateKey,
) -> Result<bool, ChunksealError> {
    let sealed = STANDARD
        .decode(field)
        .map_err(|_| ChunksealError::Decryption)?;
    let plain: Zeroizing<Vec<u8>> = crypto::open(key.as_secret(), &sealed)?;

    if plain.len() != salt_size + DIGEST_LEN {
        return Ok(false);
    }

    let expected = compute(chunks);
    Ok(crypto::constant_time_eq(&plain[salt_size..], &expected))
}
