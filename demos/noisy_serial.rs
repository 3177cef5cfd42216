//! Example demonstrating resynchronization on a noisy serial capture

use rand::{rngs::StdRng, Rng, SeedableRng};
use thermsync_core::{encoder::encode_frame, ByteStreamSynchronizer, SensorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Thermsync Noisy Serial Example\n");

    let config = SensorConfig::default();
    let mut rng = StdRng::seed_from_u64(42);

    // Step 1: Capture starts mid-frame, then 10 clean frames with noise bursts
    println!("Step 1: Building capture...");
    let mut stream: Vec<u8> = (0..300).map(|_| rng.gen()).collect();
    for i in 0..10 {
        let values: Vec<f32> = (0..config.geometry.cell_count())
            .map(|_| rng.gen_range(19.0f32..36.0))
            .collect();
        stream.extend_from_slice(&encode_frame(&config.geometry, &values)?);

        if i % 4 == 3 {
            stream.extend((0..rng.gen_range(1..64)).map(|_| 0xFFu8));
            println!("  Noise burst after frame {}", i);
        }
    }
    println!("Capture: {} bytes\n", stream.len());

    // Step 2: Feed it in serial-sized reads
    println!("Step 2: Synchronizing...");
    let mut sync = ByteStreamSynchronizer::from_config(&config)?;
    let mut located = Vec::new();
    for chunk in stream.chunks(97) {
        located.extend(sync.ingest_located(chunk));
    }

    let stats = sync.stats();
    println!("Sync Results:");
    println!("  Bytes ingested:  {}", stats.bytes_ingested);
    println!("  Bytes skipped:   {}", stats.bytes_skipped);
    println!("  Frames emitted:  {}", stats.frames_emitted);
    println!("  Skip rate:       {:.1}%\n", stats.skip_rate());

    for lf in &located {
        println!(
            "  Frame @ {:>5}: min {:.2} max {:.2}",
            lf.offset,
            lf.frame.min().unwrap_or_default(),
            lf.frame.max().unwrap_or_default()
        );
    }

    Ok(())
}
