//! Segment splitting and salting.
//!
//! Canonical bytes are cut into segments of randomly drawn length, then each
//! segment is wrapped in fresh salts before it is sealed:
//!
//! ```text
//! [ salt (salt_size) ][ segment ][ salt (salt_size) ]
//! ```
//!
//! The splitter itself is pure: it consumes a stream of lengths. Randomness
//! enters only through `random_lengths`, so tests can drive the boundaries
//! with a fixed sequence.

use rand::{CryptoRng, Rng, RngCore};
use zeroize::Zeroizing;

use crate::crypto;
use crate::error::ChunksealError;

/// Cut `bytes` into consecutive segments whose lengths follow `lengths`.
///
/// The last segment takes whatever remains, even if that is shorter than the
/// drawn length. A drawn length of zero is treated as one so the split always
/// advances. If the stream runs dry, the remainder becomes a single segment.
/// Empty input yields no segments.
pub fn split<'a, I>(bytes: &'a [u8], lengths: I) -> Vec<&'a [u8]>
where
    I: IntoIterator<Item = usize>,
{
    let mut segments = Vec::new();
    let mut lengths = lengths.into_iter();
    let mut rest = bytes;

    while !rest.is_empty() {
        let take = match lengths.next() {
            Some(len) => len.max(1).min(rest.len()),
            None => rest.len(),
        };
        let (head, tail) = rest.split_at(take);
        segments.push(head);
        rest = tail;
    }

    segments
}

/// An endless stream of lengths drawn uniformly from `[min_len, max_len]`.
pub fn random_lengths<'r, R>(
    rng: &'r mut R,
    min_len: usize,
    max_len: usize,
) -> impl Iterator<Item = usize> + 'r
where
    R: RngCore + CryptoRng,
{
    std::iter::repeat_with(move || rng.gen_range(min_len..=max_len))
}

/// Wrap `segment` in two independently drawn salts of `salt_size` bytes.
pub fn pad<R: RngCore + CryptoRng>(
    rng: &mut R,
    segment: &[u8],
    salt_size: usize,
) -> Zeroizing<Vec<u8>> {
    let mut salted = Zeroizing::new(vec![0u8; segment.len() + 2 * salt_size]);
    let (prefix, rest) = salted.split_at_mut(salt_size);
    let (body, suffix) = rest.split_at_mut(segment.len());

    crypto::fill_random(rng, prefix);
    body.copy_from_slice(segment);
    crypto::fill_random(rng, suffix);

    salted
}

/// Strip exactly `salt_size` bytes from each end of a salted segment.
pub fn unpad(salted: &[u8], salt_size: usize) -> Result<&[u8], ChunksealError> {
    if salted.len() < 2 * salt_size {
        return Err(ChunksealError::CorruptSegment);
    }
    Ok(&salted[salt_size..salted.len() - salt_size])
}
