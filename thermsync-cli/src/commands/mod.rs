pub mod monitor;
pub mod reassemble;
pub mod scan;
pub mod simulate;

use anyhow::{Context, Result};
use std::fs;

/// Read a fragment capture: one hex-encoded notification per line
///
/// Blank lines and lines starting with `#` are ignored. Returns the line
/// number alongside each decoded fragment.
pub fn read_fragment_lines(input: &str) -> Result<Vec<(usize, Vec<u8>)>> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let mut fragments = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bytes = hex::decode(line.replace(' ', ""))
            .with_context(|| format!("Invalid hex on line {}", i + 1))?;
        fragments.push((i + 1, bytes));
    }
    Ok(fragments)
}
