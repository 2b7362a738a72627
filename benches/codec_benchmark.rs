use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use chunkseal::{generate_keypair, CodecConfig, MessageContainer, Payload};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn payload_of(size: usize) -> Payload {
    let mut payload = Payload::new();
    payload.insert("body".into(), "m".repeat(size));
    payload
}

fn benchmark_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt");

    let mut rng = StdRng::seed_from_u64(0);
    let (_, public) = generate_keypair(&mut rng);
    let config = CodecConfig::default();

    let sizes = [("100B", 100), ("1KB", 1024), ("10KB", 10 * 1024)];

    for (name, size) in sizes {
        let plain = MessageContainer::from(payload_of(size));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(criterion::BenchmarkId::from_parameter(name), &size, |b, &_size| {
            b.iter(|| {
                plain
                    .encrypt(&mut rng, black_box(&public), black_box(&config))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn benchmark_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrypt");

    let mut rng = StdRng::seed_from_u64(1);
    let (private, public) = generate_keypair(&mut rng);
    let config = CodecConfig::default();

    let sizes = [("100B", 100), ("1KB", 1024), ("10KB", 10 * 1024)];

    for (name, size) in sizes {
        // Seal once; decryption is the measured path.
        let sealed = MessageContainer::from(payload_of(size))
            .encrypt(&mut rng, &public, &config)
            .unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(criterion::BenchmarkId::from_parameter(name), &size, |b, &_size| {
            b.iter(|| black_box(&sealed).decrypt(&private, &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_encrypt, benchmark_decrypt);
criterion_main!(benches);
