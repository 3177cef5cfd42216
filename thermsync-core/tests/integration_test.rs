//! Integration tests for the complete transport → engine → sink flow

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use thermsync_core::{
    encoder::{encode_frame, FragmentBuilder},
    sink::{from_fn, LatestFrame},
    ByteStreamSynchronizer, Frame, FragmentReassembler, FrameSink, SensorConfig,
};

/// Readings resembling a room-temperature scene, with non-zero low bytes
fn scene(rng: &mut StdRng, cells: usize) -> Vec<f32> {
    (0..cells).map(|_| rng.gen_range(18.0f32..38.0)).collect()
}

#[test]
fn test_mlx_stream_in_serial_sized_chunks() {
    let config = SensorConfig::default();
    let mut rng = StdRng::seed_from_u64(7);

    let mut stream = Vec::new();
    let mut originals = Vec::new();
    for _ in 0..5 {
        let values = scene(&mut rng, config.geometry.cell_count());
        stream.extend_from_slice(&encode_frame(&config.geometry, &values).unwrap());
        originals.push(values);
    }

    // Deliver in uneven reads, like a serial port with a short timeout
    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
    let mut frames: Vec<Frame> = Vec::new();
    let mut pos = 0;
    while pos < stream.len() {
        let n = rng.gen_range(1..200).min(stream.len() - pos);
        sync.ingest_into(&stream[pos..pos + n], &mut frames);
        pos += n;
    }

    assert_eq!(frames.len(), 5);
    for (frame, values) in frames.iter().zip(&originals) {
        assert_eq!(frame.shape(), (12, 16));
        assert_eq!(frame.values(), &values[..]);
    }
    assert_eq!(sync.stats().bytes_skipped, 0);
}

/// Dropped bytes leave no marker to realign on: the scanner regains cell
/// alignment within three bytes and then locks onto the first window of
/// plausible cells, which straddles the damaged and the following frame.
#[test]
fn test_realigns_to_cells_after_dropped_bytes() {
    let config = SensorConfig::default();
    let mut rng = StdRng::seed_from_u64(11);

    let first = scene(&mut rng, 192);
    let second = scene(&mut rng, 192);
    let third = scene(&mut rng, 192);

    let mut stream = Vec::new();
    stream.extend_from_slice(&encode_frame(&config.geometry, &first).unwrap());
    // Second frame loses its first five bytes on the wire
    stream.extend_from_slice(&encode_frame(&config.geometry, &second).unwrap()[5..]);
    stream.extend_from_slice(&encode_frame(&config.geometry, &third).unwrap());

    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
    let located = sync.ingest_located(&stream);

    assert_eq!(located.len(), 2);
    assert_eq!(located[0].frame.values(), &first[..]);

    // Cell 2 of the damaged frame is the first whole cell after the drop
    assert_eq!(located[1].offset, 768 + 3);
    let mut straddling = second[2..].to_vec();
    straddling.extend_from_slice(&third[..2]);
    assert_eq!(located[1].frame.values(), &straddling[..]);
    assert_eq!(sync.stats().bytes_skipped, 3);
}

#[test]
fn test_no_lock_on_pure_noise() {
    let config = SensorConfig::default();
    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();

    // 0xFF cells are NaN whatever the alignment
    for _ in 0..50 {
        assert!(sync.ingest(&[0xFF; 512]).is_empty());
        assert!(sync.buffered_len() <= config.max_retained_bytes());
    }
    assert_eq!(sync.stats().frames_emitted, 0);
}

#[test]
fn test_channel_sink_to_consumer_thread() {
    let config = SensorConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let values = scene(&mut rng, 192);
    let encoded = encode_frame(&config.geometry, &values).unwrap();

    let (mut tx, rx) = mpsc::channel::<Frame>();
    let consumer = thread::spawn(move || rx.iter().map(|f| f.max().unwrap()).collect::<Vec<_>>());

    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
    for _ in 0..3 {
        sync.ingest_into(&encoded, &mut tx);
    }
    drop(tx);

    let maxima = consumer.join().unwrap();
    assert_eq!(maxima.len(), 3);
}

#[test]
fn test_reassembler_behind_lock_from_notification_thread() {
    let config = SensorConfig::default();
    let reassembler = Arc::new(Mutex::new(FragmentReassembler::from_config(&config).unwrap()));

    let handles: Vec<_> = (0..2u8)
        .map(|index| {
            let reassembler = Arc::clone(&reassembler);
            let layout = config.fragments.layout;
            thread::spawn(move || {
                for round in 0..10 {
                    let fragment = FragmentBuilder::new(layout, index)
                        .raw_values(&[200 + round; 8])
                        .build()
                        .unwrap();
                    reassembler.lock().unwrap().on_fragment(&fragment).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reassembler = reassembler.lock().unwrap();
    assert!(reassembler.is_complete());
    assert_eq!(reassembler.stats().applied, 20);
    assert!(reassembler.live_values().iter().all(|v| (v - 20.9).abs() < 1e-4));
}

#[test]
fn test_column_average_strip_matches_serial_frame() {
    // The firmware sends the per-column mean of each serial frame as two
    // notification halves; both paths should agree to within a tenth.
    let config = SensorConfig::default();
    let mut rng = StdRng::seed_from_u64(21);
    let values = scene(&mut rng, 192);

    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
    let mut latest = LatestFrame::new();
    sync.ingest_into(&encode_frame(&config.geometry, &values).unwrap(), &mut latest);
    let averages = latest.get().unwrap().column_averages();

    let mut reassembler = FragmentReassembler::from_config(&config).unwrap();
    let mut strips = Vec::new();
    let mut sink = from_fn(|frame: Frame| strips.push(frame));
    for index in 0..2u8 {
        let half = &averages[index as usize * 8..(index as usize + 1) * 8];
        let fragment = FragmentBuilder::new(config.fragments.layout, index)
            .degrees(half, config.fragments.scale)
            .build()
            .unwrap();
        reassembler.on_fragment_into(&fragment, &mut sink).unwrap();
    }
    drop(sink);

    assert_eq!(strips.len(), 2);
    let strip = strips.last().unwrap();
    for (got, want) in strip.values().iter().zip(&averages) {
        assert!((got - want).abs() <= 0.05 + 1e-4);
    }
}

#[test]
fn test_sink_trait_object() {
    let config = SensorConfig::default();
    let mut sync = ByteStreamSynchronizer::from_config(&config).unwrap();
    let mut collected: Vec<Frame> = Vec::new();
    let sink: &mut dyn FrameSink = &mut collected;

    let encoded = encode_frame(&config.geometry, &[25.5; 192]).unwrap();
    assert_eq!(sync.ingest_into(&encoded, sink), 1);
    assert_eq!(collected[0].get(11, 15), Some(25.5));
}
