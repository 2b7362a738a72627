//! Canonical payload serialisation.
//!
//! A payload is a flat string-to-string mapping. It is carried as compact
//! JSON over a `BTreeMap`, so key order is fixed by the map itself and two
//! serialisations of equal payloads are byte-identical.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::error::ChunksealError;

/// The logical mapping an envelope protects.
pub type Payload = BTreeMap<String, String>;

/// Serialise a payload to its canonical UTF-8 bytes.
pub fn serialize(payload: &Payload) -> Result<Zeroizing<Vec<u8>>, ChunksealError> {
    serde_json::to_vec(payload)
        .map(Zeroizing::new)
        .map_err(|_| ChunksealError::MalformedPayload)
}

/// Parse canonical bytes back into a payload.
///
/// Anything other than a JSON object whose values are all strings is
/// rejected, as is invalid UTF-8.
pub fn deserialize(bytes: &[u8]) -> Result<Payload, ChunksealError> {
    serde_json::from_slice(bytes).map_err(|_| ChunksealError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_are_order_independent() {
        let mut a = Payload::new();
        a.insert("b".into(), "2".into());
        a.insert("a".into(), "1".into());

        let mut b = Payload::new();
        b.insert("a".into(), "1".into());
        b.insert("b".into(), "2".into());

        let bytes = serialize(&a).unwrap();
        assert_eq!(&bytes[..], br#"{"a":"1","b":"2"}"#);
        assert_eq!(bytes, serialize(&b).unwrap());
        assert_eq!(deserialize(&bytes).unwrap(), b);
    }

    #[test]
    fn test_unicode_and_empty_values_survive() {
        let mut payload = Payload::new();
        payload.insert("ключ".into(), "значение \"quoted\"\n".into());
        payload.insert(String::new(), String::new());

        let bytes = serialize(&payload).unwrap();
        assert_eq!(deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_rejects_non_flat_structures() {
        for bad in [
            &br#"{"a": 1}"#[..],
            br#"{"a": {"b": "c"}}"#,
            br#"["a", "b"]"#,
            br#""just a string""#,
            b"{\"a\": \"\xff\"}",
            b"",
        ] {
            assert_eq!(deserialize(bad).unwrap_err(), ChunksealError::MalformedPayload);
        }
    }

    #[test]
    fn test_empty_payload() {
        let bytes = serialize(&Payload::new()).unwrap();
        assert_eq!(&bytes[..], b"{}");
        assert!(deserialize(&bytes).unwrap().is_empty());
    }
}
