//! Minimal demo: relaying an alert through a short-message transport.
//!
//! The sender seals a payload to the receiver's public key; every string it
//! puts on the wire stays under the 214-character default bound. The
//! receiver's `Inbox` opens it and answers with an acknowledgement.
//! Run with: `cargo run --example alert_relay`

use chunkseal::{generate_keypair_os, CodecConfig, Inbox, MessageContainer, Payload};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Receiver side: key pair and inbox.
    let (private, public) = generate_keypair_os();
    let config = CodecConfig::default();
    println!("Receiver key fingerprint: {}", public.fingerprint());
    println!("Public key (share this): {}", public.to_base64());
    let inbox = Inbox::new(private, config)?;

    // 2. Sender side: build and seal the alert.
    let mut payload = Payload::new();
    payload.insert("source".into(), "backup-job".into());
    payload.insert("level".into(), "critical".into());
    payload.insert(
        "text".into(),
        "Nightly backup failed: destination volume is read-only. ".repeat(4),
    );

    let sealed = MessageContainer::from(payload).encrypt(&mut rand::rngs::OsRng, &public, &config)?;
    let envelope = sealed.envelope().ok_or("container did not encrypt")?;
    println!("Sealed into {} chunks:", envelope.chunks.len());
    for chunk in &envelope.chunks {
        println!("  [{:>3} chars] {}", chunk.len(), chunk);
    }

    // 3. Transport: only the JSON body crosses the wire.
    let body = envelope.to_json()?;

    // 4. Receiver opens it.
    let delivery = inbox.receive(&body);
    println!("Ack: {}", serde_json::to_string(&delivery.ack)?);
    if let Some(payload) = delivery.payload {
        for (key, value) in payload {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}
