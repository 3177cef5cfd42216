use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use thermsync_core::{encoder::encode_frame, ByteStreamSynchronizer, SensorConfig};

fn make_stream(num_frames: usize, garbage_every: usize) -> Vec<u8> {
    let config = SensorConfig::default();
    let mut stream = Vec::new();
    for i in 0..num_frames {
        let values: Vec<f32> = (0..config.geometry.cell_count())
            .map(|c| 20.0 + ((i * 7 + c) % 150) as f32 * 0.1 + 0.013)
            .collect();
        stream.extend_from_slice(&encode_frame(&config.geometry, &values).unwrap());
        if garbage_every > 0 && i % garbage_every == 0 {
            // inject a bit of garbage periodically
            stream.extend_from_slice(&[0xFF; 7]);
        }
    }
    stream
}

fn bench_synchronizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronizer");
    let config = SensorConfig::default();

    for &(name, garbage_every) in &[("clean", 0usize), ("noisy", 10)] {
        let stream = make_stream(500, garbage_every);
        group.throughput(Throughput::Bytes(stream.len() as u64));

        for &chunk in &[64usize, 4096] {
            group.bench_with_input(
                BenchmarkId::new(format!("ingest_{}", name), chunk),
                &stream,
                |b, data| {
                    b.iter(|| {
                        let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
                        let mut frames = 0;
                        for piece in data.chunks(chunk) {
                            frames += sync.ingest(piece).len();
                        }
                        criterion::black_box(frames);
                    });
                },
            );
        }
    }

    // Worst case: no frame ever validates
    let noise = vec![0xFFu8; 64 * 1024];
    group.throughput(Throughput::Bytes(noise.len() as u64));
    group.bench_function("ingest_pure_noise", |b| {
        b.iter(|| {
            let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
            for piece in noise.chunks(4096) {
                criterion::black_box(sync.ingest(piece));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_synchronizer);
criterion_main!(benches);
