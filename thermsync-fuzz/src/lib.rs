//! Fuzz entry points for thermsync-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these from a `fuzz_target!` body

use thermsync_core::{ByteStreamSynchronizer, FragmentReassembler, SensorConfig};

pub fn fuzz_ingest(data: &[u8]) {
    let config = SensorConfig::default();
    let Ok(mut sync) = ByteStreamSynchronizer::from_config(&config) else {
        return;
    };

    // First byte picks the read size so straddling paths get covered
    let chunk = data.first().map_or(1, |&b| b as usize + 1);
    for piece in data.chunks(chunk) {
        let _ = sync.ingest(piece);
        assert!(sync.buffered_len() <= config.max_retained_bytes());
    }
}

pub fn fuzz_fragment(data: &[u8]) {
    let Ok(mut reassembler) = FragmentReassembler::from_config(&SensorConfig::default()) else {
        return;
    };

    // Should never panic, and a rejected fragment leaves the strip alone
    for piece in data.chunks(19) {
        let before = reassembler.live_values().to_vec();
        if reassembler.on_fragment(piece).is_err() {
            assert_eq!(reassembler.live_values(), &before[..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_ingest_empty() {
        fuzz_ingest(&[]);
    }

    #[test]
    fn test_fuzz_ingest_noise() {
        fuzz_ingest(&[0x7F; 10_000]);
    }

    #[test]
    fn test_fuzz_fragment_empty() {
        fuzz_fragment(&[]);
    }

    #[test]
    fn test_fuzz_fragment_random() {
        let data: Vec<u8> = (0..=255u8).cycle().take(19 * 20 + 7).collect();
        fuzz_fragment(&data);
    }
}
