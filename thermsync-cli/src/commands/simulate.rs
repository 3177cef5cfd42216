use crate::CaptureKind;
use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use std::io::Write;
use thermsync_core::{
    encoder::{encode_frame, FragmentBuilder},
    SensorConfig,
};
use tracing::{debug, info};

/// Longest noise burst inserted between serial frames
const MAX_NOISE_BURST: usize = 16;

/// Write a synthetic capture for replay by `scan` or `reassemble`
///
/// Readings are drawn from a room-temperature scene with one warm spot.
/// With probability `corrupt_rate`, a serial frame is preceded by a burst
/// of random bytes, or a fragment loses its last byte.
pub fn execute(
    output: &str,
    kind: CaptureKind,
    config: &SensorConfig,
    frames: usize,
    corrupt_rate: f64,
    seed: Option<u64>,
) -> Result<()> {
    if !(0.0..=1.0).contains(&corrupt_rate) {
        bail!("Corruption rate must be within [0, 1], got {}", corrupt_rate);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("Simulating {} {:?} frames into: {}", frames, kind, output);

    let (data, corrupted) = match kind {
        CaptureKind::Serial => serial_capture(config, frames, corrupt_rate, &mut rng)?,
        CaptureKind::Fragments => fragment_capture(config, frames, corrupt_rate, &mut rng)?,
    };

    fs::write(output, &data).with_context(|| format!("Failed to write output file: {}", output))?;

    println!("✓ Wrote {} bytes to {}", data.len(), output);
    if corrupted > 0 {
        println!("  {} corruptions injected", corrupted);
    }

    Ok(())
}

fn scene(rng: &mut StdRng, len: usize, cols: usize) -> Vec<f32> {
    let spot = rng.gen_range(0..len.max(1));
    (0..len)
        .map(|i| {
            let base = rng.gen_range(20.0f32..26.0);
            let (r, c) = (i / cols, i % cols);
            let (sr, sc) = (spot / cols, spot % cols);
            let dist = r.abs_diff(sr) + c.abs_diff(sc);
            if dist <= 1 {
                base + rng.gen_range(8.0f32..12.0)
            } else {
                base
            }
        })
        .collect()
}

fn serial_capture(
    config: &SensorConfig,
    frames: usize,
    corrupt_rate: f64,
    rng: &mut StdRng,
) -> Result<(Vec<u8>, usize)> {
    let geometry = &config.geometry;
    let mut data = Vec::with_capacity(frames * geometry.frame_byte_length());
    let mut corrupted = 0;

    for i in 0..frames {
        if rng.gen_bool(corrupt_rate) {
            let burst = rng.gen_range(1..=MAX_NOISE_BURST);
            data.extend((0..burst).map(|_| rng.gen::<u8>()));
            corrupted += 1;
            debug!("Frame {}: {} noise bytes", i, burst);
        }
        let values = scene(rng, geometry.cell_count(), geometry.cols);
        data.extend_from_slice(&encode_frame(geometry, &values).context("Failed to encode frame")?);
    }

    Ok((data, corrupted))
}

fn fragment_capture(
    config: &SensorConfig,
    frames: usize,
    corrupt_rate: f64,
    rng: &mut StdRng,
) -> Result<(Vec<u8>, usize)> {
    let fragments = &config.fragments;
    let total = fragments.total_columns();
    let mut out = Vec::new();
    let mut corrupted = 0;

    writeln!(
        out,
        "# {} fragments of {} values, {} bytes each",
        fragments.count,
        fragments.width,
        fragments.layout.expected_len()
    )?;

    for i in 0..frames {
        let strip = scene(rng, total, total);
        for index in 0..fragments.count {
            let values: Vec<f32> = (0..fragments.width)
                .map(|j| {
                    let column =
                        fragments
                            .layout
                            .placement
                            .column(index, j, fragments.count, fragments.width);
                    strip[column]
                })
                .collect();

            let half_index = u8::try_from(index).context("Fragment index exceeds one byte")?;
            let mut raw = FragmentBuilder::new(fragments.layout, half_index)
                .degrees(&values, fragments.scale)
                .build()
                .context("Failed to encode fragment")?
                .to_vec();

            if rng.gen_bool(corrupt_rate) {
                raw.pop();
                corrupted += 1;
                debug!("Frame {} fragment {}: truncated", i, index);
            }
            writeln!(out, "{}", hex::encode(&raw))?;
        }
    }

    Ok((out, corrupted))
}
