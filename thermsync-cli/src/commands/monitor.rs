use crate::rate::FrameRateMeter;
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use thermsync_core::{sink::from_fn, ByteStreamSynchronizer, Frame, SensorConfig};
use tracing::{info, warn};

/// Read frames until end of input, printing one line per frame
///
/// `input` of `-` reads standard input, so a serial device can be piped
/// in with e.g. `cat /dev/ttyUSB0 | thermsync monitor -i -`.
pub fn execute(input: &str, config: &SensorConfig, read_size: usize) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let frames = if input == "-" {
        info!("Monitoring standard input");
        run(io::stdin().lock(), &mut out, config, read_size)?
    } else {
        info!("Monitoring: {}", input);
        let file =
            File::open(input).with_context(|| format!("Failed to open input: {}", input))?;
        run(file, &mut out, config, read_size)?
    };

    info!("End of input after {} frames", frames);
    Ok(())
}

/// Drive a synchronizer from `reader` and report each frame to `writer`
///
/// Returns the number of frames seen.
pub fn run<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    config: &SensorConfig,
    read_size: usize,
) -> Result<u64> {
    let mut sync =
        ByteStreamSynchronizer::from_config(config).context("Failed to create synchronizer")?;
    let mut meter = FrameRateMeter::new();
    let mut buf = vec![0u8; read_size.max(1)];
    let mut seen = 0u64;
    let mut write_error = None;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let before = sync.stats().bytes_skipped;
        sync.ingest_into(
            &buf[..n],
            &mut from_fn(|frame: Frame| {
                seen += 1;
                if let Some(rate) = meter.tick() {
                    info!("{:.1} fps", rate);
                }
                if write_error.is_none() {
                    if let Err(e) = report(writer, seen, &frame, meter.last_rate()) {
                        write_error = Some(e);
                    }
                }
            }),
        );
        if let Some(e) = write_error.take() {
            return Err(e).context("Failed to write frame report");
        }

        let skipped = sync.stats().bytes_skipped - before;
        if skipped > 0 {
            warn!("Skipped {} bytes of noise", skipped);
        }
    }

    Ok(seen)
}

fn report<W: Write>(writer: &mut W, seq: u64, frame: &Frame, fps: Option<f64>) -> io::Result<()> {
    let min = frame.min().unwrap_or(f32::NAN);
    let max = frame.max().unwrap_or(f32::NAN);
    let fps = fps.map_or_else(|| "--".to_string(), |r| format!("{:.1}", r));
    writeln!(
        writer,
        "#{:<6} min {} max {} fps {}",
        seq,
        format!("{:6.2}", min).cyan(),
        format!("{:6.2}", max).red(),
        fps
    )
}
