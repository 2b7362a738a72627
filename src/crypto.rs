//! Low-level cryptographic operations.
//!
//! This module is one of exactly two places in the crate that touch
//! primitives directly (the other is `keys`). Everything else seals, opens
//! and hashes exclusively through the functions exposed here.
//!
//! Primitive choices:
//! - **Key agreement**: X25519, one fresh ephemeral key per sealed buffer
//! - **KDF**: HKDF-SHA256, salted with `ephemeral_pk || recipient_pk`
//! - **Cipher**: ChaCha20-Poly1305 (authenticated encryption)
//! - **Hash**: SHA-256
//!
//! # Layout of a sealed buffer
//! ```text
//! [ ephemeral public key (32 bytes) ][ ciphertext ][ Poly1305 tag (16 bytes) ]
//! ```

use rand::{CryptoRng, RngCore};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::{constant_time, digest, hkdf};
use x25519_dalek::{EphemeralSecret, PublicKey as DhPublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::ChunksealError;

/// Size of an X25519 key (public or secret) in bytes.
pub const KEY_LEN: usize = 32;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes a sealed buffer carries on top of its plaintext.
pub const SEAL_OVERHEAD: usize = KEY_LEN + TAG_LEN;

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// HKDF info string; bumping it invalidates every previously sealed buffer.
const HKDF_INFO: &[u8] = b"chunkseal/sealed-box/v1";

/// Output length request for `ring::hkdf`.
struct OkmLen(usize);

impl hkdf::KeyType for OkmLen {
    fn len(&self) -> usize {
        self.0
    }
}

/// Derive the AEAD key and nonce for one sealed buffer.
///
/// Both come out of a single HKDF expansion. The ephemeral key is never
/// reused, so each derived (key, nonce) pair is used exactly once.
fn derive_cipher(
    shared_secret: &[u8; KEY_LEN],
    ephemeral_pk: &[u8; KEY_LEN],
    recipient_pk: &[u8; KEY_LEN],
) -> Result<(LessSafeKey, Nonce), ChunksealError> {
    let mut salt_bytes = [0u8; 2 * KEY_LEN];
    salt_bytes[..KEY_LEN].copy_from_slice(ephemeral_pk);
    salt_bytes[KEY_LEN..].copy_from_slice(recipient_pk);

    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, &salt_bytes);
    let prk = salt.extract(shared_secret);

    let info = [HKDF_INFO];
    let okm = prk
        .expand(&info, OkmLen(KEY_LEN + NONCE_LEN))
        .map_err(|_| ChunksealError::Encryption)?;

    let mut material = Zeroizing::new([0u8; KEY_LEN + NONCE_LEN]);
    okm.fill(&mut material[..])
        .map_err(|_| ChunksealError::Encryption)?;

    let unbound = UnboundKey::new(&CHACHA20_POLY1305, &material[..KEY_LEN])
        .map_err(|_| ChunksealError::InvalidKey)?;
    let nonce = Nonce::try_assume_unique_for_key(&material[KEY_LEN..])
        .map_err(|_| ChunksealError::Encryption)?;

    Ok((LessSafeKey::new(unbound), nonce))
}

/// Seal `plaintext` to the holder of `recipient`'s secret key.
///
/// A fresh ephemeral X25519 key is drawn from `rng` for every call, so
/// sealing the same plaintext twice never yields the same bytes.
pub fn seal<R: RngCore + CryptoRng>(
    rng: &mut R,
    recipient: &DhPublicKey,
    plaintext: &[u8],
) -> Result<Vec<u8>, ChunksealError> {
    let ephemeral = EphemeralSecret::random_from_rng(&mut *rng);
    let ephemeral_pk = DhPublicKey::from(&ephemeral);

    let shared = ephemeral.diffie_hellman(recipient);
    if !shared.was_contributory() {
        // Low-order recipient key: the "shared" secret would be all zeroes.
        return Err(ChunksealError::InvalidKey);
    }

    let (key, nonce) = derive_cipher(shared.as_bytes(), ephemeral_pk.as_bytes(), recipient.as_bytes())?;

    let mut output = Vec::with_capacity(sealed_len(plaintext.len()));
    output.extend_from_slice(ephemeral_pk.as_bytes());
    output.extend_from_slice(plaintext);

    let tag = key
        .seal_in_place_separate_tag(nonce, Aad::from(ephemeral_pk.as_bytes()), &mut output[KEY_LEN..])
        .map_err(|_| ChunksealError::Encryption)?;
    output.extend_from_slice(tag.as_ref());

    Ok(output)
}

/// Open a buffer produced by `seal`.
///
/// A wrong key, a flipped bit anywhere in the buffer, or a truncated buffer
/// all fail the tag check identically. The caller receives no partial
/// plaintext.
pub fn open(secret: &StaticSecret, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, ChunksealError> {
    if sealed.len() < SEAL_OVERHEAD {
        return Err(ChunksealError::Decryption);
    }

    let epk_bytes: [u8; KEY_LEN] = sealed[..KEY_LEN]
        .try_into()
        .map_err(|_| ChunksealError::Decryption)?;
    let ephemeral_pk = DhPublicKey::from(epk_bytes);
    let recipient_pk = DhPublicKey::from(secret);

    let shared = secret.diffie_hellman(&ephemeral_pk);
    if !shared.was_contributory() {
        return Err(ChunksealError::Decryption);
    }

    let (key, nonce) = derive_cipher(shared.as_bytes(), &epk_bytes, recipient_pk.as_bytes())
        .map_err(|_| ChunksealError::Decryption)?;

    let mut payload = Zeroizing::new(sealed[KEY_LEN..].to_vec());
    let plaintext_len = key
        .open_in_place(nonce, Aad::from(&epk_bytes), &mut payload[..])
        .map_err(|_| ChunksealError::Decryption)?
        .len();
    payload.truncate(plaintext_len);

    Ok(payload)
}

/// Length of the sealed buffer for a plaintext of `plaintext_len` bytes.
pub const fn sealed_len(plaintext_len: usize) -> usize {
    plaintext_len + SEAL_OVERHEAD
}

/// SHA-256 over the concatenation of `parts`, in order.
pub fn sha256_concat<'a, I>(parts: I) -> [u8; DIGEST_LEN]
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut ctx = digest::Context::new(&digest::SHA256);
    for part in parts {
        ctx.update(part);
    }

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Compare two byte strings without an early exit on the first mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    constant_time::verify_slices_are_equal(a, b).is_ok()
}

/// Fill `buf` from the injected CSPRNG.
pub fn fill_random<R: RngCore + CryptoRng>(rng: &mut R, buf: &mut [u8]) {
    rng.fill_bytes(buf);
}
