use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use thermsync_core::{synchronizer::LocatedFrame, ByteStreamSynchronizer, SensorConfig};
use tracing::info;

#[derive(Serialize, Deserialize)]
pub struct RecoveredFrame {
    pub offset: u64,
    pub rows: usize,
    pub cols: usize,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub values: Vec<Vec<f32>>,
}

impl From<&LocatedFrame> for RecoveredFrame {
    fn from(lf: &LocatedFrame) -> Self {
        Self {
            offset: lf.offset,
            rows: lf.frame.rows(),
            cols: lf.frame.cols(),
            min: lf.frame.min(),
            max: lf.frame.max(),
            values: lf.frame.rows_iter().map(|row| row.to_vec()).collect(),
        }
    }
}

/// Replay a captured serial stream through the synchronizer
///
/// The capture is fed in `chunk_size` reads so that frames straddling
/// reads are exercised the same way as on a live port.
pub fn execute(
    input: &str,
    output: Option<&str>,
    config: &SensorConfig,
    chunk_size: usize,
    stats_only: bool,
) -> Result<()> {
    info!("Scanning capture: {}", input);

    let data = fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    let mut sync = ByteStreamSynchronizer::from_config(config)
        .context("Failed to create synchronizer")?;

    let mut located = Vec::new();
    for chunk in data.chunks(chunk_size.max(1)) {
        located.extend(sync.ingest_located(chunk));
    }

    let stats = sync.stats();
    println!("\n=== Scan Results ===");
    println!("Bytes ingested:    {} bytes", stats.bytes_ingested);
    println!("Frames emitted:    {}", stats.frames_emitted);
    println!("Bytes skipped:     {} bytes", stats.bytes_skipped);
    println!("Bytes trimmed:     {} bytes", stats.bytes_trimmed);
    println!("Bytes left over:   {} bytes", sync.buffered_len());
    println!("Skip rate:         {:.2}%", stats.skip_rate());
    println!();

    if stats_only {
        return Ok(());
    }

    let recovered: Vec<RecoveredFrame> = located.iter().map(RecoveredFrame::from).collect();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&recovered)
            .with_context(|| "Failed to serialize recovered frames")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Recovered frames written to: {}", output_path);
    } else {
        println!("=== Recovered Frames ===");
        for frame in &recovered {
            println!(
                "Frame @ offset {}: {}x{}, min {:.2}, max {:.2}",
                frame.offset,
                frame.rows,
                frame.cols,
                frame.min.unwrap_or(f32::NAN),
                frame.max.unwrap_or(f32::NAN)
            );
        }
    }

    Ok(())
}
