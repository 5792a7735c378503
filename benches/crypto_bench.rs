use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use envseal::core::cipher::OrgKey;
use envseal::core::domain::{KPMap, Payload};
use std::time::Duration;

/// Generate a value of given size.
fn generate_value(size: usize) -> String {
    "x".repeat(size)
}

/// Benchmark payload encrypt/decrypt roundtrip with varying value sizes.
fn bench_payload_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_roundtrip");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let key = OrgKey::generate();
    let sizes = [32, 256, 1024, 4096, 16384];

    for size in sizes {
        let payload = Payload::new(generate_value(size));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("roundtrip", format!("{}B", size)),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let mut p = payload.clone();
                    p.encrypt(black_box(&key)).unwrap();
                    p.decrypt(black_box(&key)).unwrap();
                    black_box(p);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark decryption only.
fn bench_payload_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_decrypt");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let key = OrgKey::generate();
    let sizes = [32, 1024, 16384];

    for size in sizes {
        let mut sealed = Payload::new(generate_value(size));
        sealed.encrypt(&key).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("decrypt", format!("{}B", size)),
            &sealed,
            |b, sealed| {
                b.iter(|| {
                    let mut p = sealed.clone();
                    p.decrypt(black_box(&key)).unwrap();
                    black_box(p);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark encrypting a whole map into a deep copy.
fn bench_map_encrypted(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_encrypted");
    group.sample_size(30);

    let key = OrgKey::generate();
    for count in [10, 100, 1000] {
        let map: KPMap = (0..count)
            .map(|i| (format!("SECRET_{}", i), Payload::new(format!("value_{}", i))))
            .collect();

        group.bench_with_input(BenchmarkId::new("entries", count), &map, |b, map| {
            b.iter(|| black_box(map.encrypted(&key).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_payload_roundtrip,
    bench_payload_decrypt,
    bench_map_encrypted
);
criterion_main!(benches);
