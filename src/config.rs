//! Codec parameters.
//!
//! The segment range, salt width and transport bound are tied together: a
//! segment of `max_segment` bytes, wrapped in two salts, sealed and base64
//! encoded, must still fit the transport's per-message limit. `validate`
//! enforces that relationship so a config that would emit oversize chunks
//! is rejected before anything is encrypted.

use serde::{Deserialize, Serialize};

use crate::crypto::{self, DIGEST_LEN};
use crate::error::ChunksealError;

/// Default salt width on each side of a segment, in bytes.
pub const DEFAULT_SALT_SIZE: usize = 16;

/// Default lower bound of a drawn segment length, in bytes.
pub const DEFAULT_MIN_SEGMENT: usize = 50;

/// Default per-string transport bound, in characters.
pub const DEFAULT_MAX_ENCODED_LEN: usize = 214;

/// Length in characters of padded standard base64 for `n` bytes.
pub const fn base64_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Parameters of the envelope codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Random bytes prepended and appended to every segment.
    pub salt_size: usize,
    /// Smallest length the splitter draws. The final segment may be shorter.
    pub min_segment: usize,
    /// Largest length the splitter draws.
    pub max_segment: usize,
    /// Hard limit on every string in the envelope (each chunk and the digest).
    pub max_encoded_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::for_transport(DEFAULT_MAX_ENCODED_LEN)
    }
}

impl CodecConfig {
    /// The default salt and lower bound, with the largest `max_segment`
    /// whose encoded chunk fits `max_encoded_len`.
    ///
    /// For a bound too small to hold even one payload byte the result has
    /// `max_segment == 0` and fails `validate`.
    pub fn for_transport(max_encoded_len: usize) -> Self {
        let fits_bytes = (max_encoded_len / 4) * 3;
        let max_segment = fits_bytes
            .saturating_sub(crypto::SEAL_OVERHEAD)
            .saturating_sub(2 * DEFAULT_SALT_SIZE);

        Self {
            salt_size: DEFAULT_SALT_SIZE,
            min_segment: DEFAULT_MIN_SEGMENT.min(max_segment),
            max_segment,
            max_encoded_len,
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ChunksealError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ChunksealError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Exact transport length of an encoded chunk whose segment is
    /// `segment_len` bytes before salting.
    pub fn encoded_chunk_len(&self, segment_len: usize) -> usize {
        base64_len(crypto::sealed_len(segment_len + 2 * self.salt_size))
    }

    /// Exact transport length of the digest field.
    pub fn encoded_digest_len(&self) -> usize {
        base64_len(crypto::sealed_len(self.salt_size + DIGEST_LEN))
    }

    /// Check that the config is internally consistent and that its
    /// worst-case output fits the transport bound.
    pub fn validate(&self) -> Result<(), ChunksealError> {
        if self.salt_size == 0 {
            return Err(ChunksealError::InvalidConfig("salt_size must be non-zero".into()));
        }
        if self.min_segment == 0 {
            return Err(ChunksealError::InvalidConfig("min_segment must be non-zero".into()));
        }
        if self.min_segment > self.max_segment {
            return Err(ChunksealError::InvalidConfig(format!(
                "min_segment {} exceeds max_segment {}",
                self.min_segment, self.max_segment
            )));
        }

        let worst_chunk = self.encoded_chunk_len(self.max_segment);
        if worst_chunk > self.max_encoded_len {
            return Err(ChunksealError::InvalidConfig(format!(
                "max_segment {} encodes to {} chars, limit is {}",
                self.max_segment, worst_chunk, self.max_encoded_len
            )));
        }

        let digest = self.encoded_digest_len();
        if digest > self.max_encoded_len {
            return Err(ChunksealError::InvalidConfig(format!(
                "digest field encodes to {} chars, limit is {}",
                digest, self.max_encoded_len
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fits_214_chars() {
        let config = CodecConfig::default();
        assert_eq!(config.salt_size, 16);
        assert_eq!(config.min_segment, 50);
        assert_eq!(config.max_segment, 79);
        assert_eq!(config.encoded_chunk_len(79), 212);
        assert_eq!(config.encoded_chunk_len(80), 216);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wide_range_needs_wider_transport() {
        let narrow = CodecConfig {
            salt_size: 16,
            min_segment: 50,
            max_segment: 170,
            max_encoded_len: 214,
        };
        assert!(matches!(narrow.validate(), Err(ChunksealError::InvalidConfig(_))));

        let wide = CodecConfig {
            max_encoded_len: narrow.encoded_chunk_len(170),
            ..narrow
        };
        assert_eq!(wide.max_encoded_len, 336);
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_ranges() {
        let base = CodecConfig::default();
        assert!(CodecConfig { salt_size: 0, ..base }.validate().is_err());
        assert!(CodecConfig { min_segment: 0, ..base }.validate().is_err());
        assert!(CodecConfig { min_segment: 60, max_segment: 55, ..base }.validate().is_err());
        assert!(CodecConfig::for_transport(100).validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = CodecConfig::from_json(r#"{"min_segment": 20}"#).unwrap();
        assert_eq!(config.min_segment, 20);
        assert_eq!(config.max_segment, 79);

        assert!(CodecConfig::from_json(r#"{"salt": 4}"#).is_err());
        assert!(CodecConfig::from_json(r#"{"max_segment": 500}"#).is_err());
    }
}
