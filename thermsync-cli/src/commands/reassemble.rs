use super::read_fragment_lines;
use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use thermsync_core::{FragmentReassembler, SensorConfig};
use tracing::{info, warn};

#[derive(Serialize, Deserialize)]
pub struct StripUpdate {
    pub line: usize,
    pub index: usize,
    pub strip: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct ReassemblyReport {
    pub applied: u64,
    pub malformed: u64,
    pub invalid_index: u64,
    pub complete: bool,
    pub slot_skew: Option<u64>,
    pub strip: Vec<f32>,
    pub updates: Vec<StripUpdate>,
}

/// Replay a fragment capture through the reassembler
///
/// Rejected fragments are reported and skipped; they never abort the run.
pub fn execute(input: &str, output: Option<&str>, config: &SensorConfig) -> Result<()> {
    info!("Reassembling fragments from: {}", input);

    let fragments = read_fragment_lines(input)?;
    let mut reassembler =
        FragmentReassembler::from_config(config).context("Failed to create reassembler")?;

    let mut updates = Vec::new();
    for (line, raw) in &fragments {
        match reassembler.apply(raw) {
            Ok(header) => updates.push(StripUpdate {
                line: *line,
                index: header.index(),
                strip: reassembler.live_values().to_vec(),
            }),
            Err(e) => warn!("Line {}: {}", line, e),
        }
    }

    let stats = reassembler.stats();
    let report = ReassemblyReport {
        applied: stats.applied,
        malformed: stats.malformed,
        invalid_index: stats.invalid_index,
        complete: reassembler.is_complete(),
        slot_skew: reassembler.slot_skew(),
        strip: reassembler.live_values().to_vec(),
        updates,
    };

    println!("\n=== Reassembly Results ===");
    println!("Fragments read:     {}", fragments.len());
    println!("Applied:            {}", report.applied.to_string().green());
    if stats.rejected() > 0 {
        println!(
            "Rejected:           {} ({} malformed, {} bad index)",
            stats.rejected().to_string().red(),
            report.malformed,
            report.invalid_index
        );
    }
    if report.complete {
        println!("{} Every slot populated", "✓".green());
    } else {
        println!("{} Some slots still hold the sentinel", "!".yellow());
    }
    if let Some(skew) = report.slot_skew {
        println!("Slot skew:          {}", skew);
    }
    println!();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize reassembly report")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Reassembly report written to: {}", output_path);
    } else {
        let strip: Vec<String> = report.strip.iter().map(|v| format!("{:.1}", v)).collect();
        println!("Strip: [{}]", strip.join(", "));
    }

    Ok(())
}
