use chunkseal::{generate_keypair, ChunksealError, CodecConfig, Envelope, MessageContainer, Payload};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A sealed envelope with several chunks, plus the key that opens it.
fn sealed_fixture(seed: u64) -> (chunkseal::PrivateKey, Envelope) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (private, public) = generate_keypair(&mut rng);

    let mut payload = Payload::new();
    payload.insert("host".into(), "db-01".into());
    payload.insert("message".into(), "replication lag above threshold ".repeat(12));

    let sealed = MessageContainer::from(payload)
        .encrypt(&mut rng, &public, &CodecConfig::default())
        .unwrap();
    let envelope = sealed.envelope().unwrap().clone();
    assert!(envelope.chunks.len() >= 3);
    (private, envelope)
}

fn open(private: &chunkseal::PrivateKey, envelope: Envelope) -> Result<MessageContainer, ChunksealError> {
    MessageContainer::from(envelope).decrypt(private, &CodecConfig::default())
}

#[test]
fn test_reordered_chunks_fail_integrity() {
    let (private, mut envelope) = sealed_fixture(200);
    envelope.chunks.swap(0, 2);
    assert_eq!(open(&private, envelope).unwrap_err(), ChunksealError::Integrity);
}

#[test]
fn test_truncated_or_extended_chunks_fail_integrity() {
    let (private, envelope) = sealed_fixture(201);

    let mut truncated = envelope.clone();
    truncated.chunks.pop();
    assert_eq!(open(&private, truncated).unwrap_err(), ChunksealError::Integrity);

    let mut extended = envelope.clone();
    let first = extended.chunks[0].clone();
    extended.chunks.push(first);
    assert_eq!(open(&private, extended).unwrap_err(), ChunksealError::Integrity);

    let mut emptied = envelope;
    emptied.chunks.clear();
    assert_eq!(open(&private, emptied).unwrap_err(), ChunksealError::Integrity);
}

#[test]
fn test_replaced_chunk_fails_integrity() {
    let (private, mut envelope) = sealed_fixture(202);

    // A chunk from another, equally valid envelope for the same key.
    let (_, other) = sealed_fixture(203);
    envelope.chunks[1] = other.chunks[1].clone();
    assert_eq!(open(&private, envelope.clone()).unwrap_err(), ChunksealError::Integrity);

    // A single flipped character.
    let (private, mut envelope) = sealed_fixture(204);
    let mut chars: Vec<char> = envelope.chunks[0].chars().collect();
    chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
    envelope.chunks[0] = chars.into_iter().collect();
    assert_eq!(open(&private, envelope).unwrap_err(), ChunksealError::Integrity);
}

#[test]
fn test_digest_from_another_envelope_fails_integrity() {
    let mut rng = StdRng::seed_from_u64(205);
    let (private, public) = generate_keypair(&mut rng);
    let config = CodecConfig::default();

    let seal = |rng: &mut StdRng, text: &str| {
        let mut payload = Payload::new();
        payload.insert("message".into(), text.repeat(20));
        MessageContainer::from(payload)
            .encrypt(rng, &public, &config)
            .unwrap()
            .envelope()
            .unwrap()
            .clone()
    };

    // Both digests are sealed to the same key and open cleanly; only the
    // hash inside differs.
    let mut envelope = seal(&mut rng, "first ");
    let other = seal(&mut rng, "second ");
    envelope.digest = other.digest;

    assert_eq!(open(&private, envelope).unwrap_err(), ChunksealError::Integrity);
}

#[test]
fn test_corrupt_digest_field_fails_decryption() {
    let (private, mut envelope) = sealed_fixture(207);
    envelope.digest = "!!not base64!!".into();
    assert_eq!(open(&private, envelope).unwrap_err(), ChunksealError::Decryption);
}
