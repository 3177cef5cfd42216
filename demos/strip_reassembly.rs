//! Example merging strip fragments that arrive out of step

use thermsync_core::{
    encoder::FragmentBuilder, fragment::FragmentLayout, FragmentConfig, FragmentReassembler,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Thermsync Strip Reassembly Example\n");

    let config = FragmentConfig::default();
    let mut reassembler = FragmentReassembler::new(config)?;

    // Slot 0 refreshes twice as often as slot 1; one stray and one short packet
    let schedule: [(u8, i32); 6] = [(0, 210), (0, 215), (1, 300), (0, 220), (7, 0), (0, 225)];

    for (index, base) in schedule {
        let raw: Vec<i32> = (0..config.width as i32).map(|i| base + i).collect();
        let fragment = FragmentBuilder::new(FragmentLayout::column_strip(), index)
            .raw_values(&raw)
            .build()?;

        match reassembler.on_fragment(&fragment) {
            Ok(strip) => println!(
                "slot {} -> {:.1?} (skew {:?})",
                index,
                strip.values(),
                reassembler.slot_skew()
            ),
            Err(e) => println!("slot {} rejected: {}", index, e),
        }
    }

    if let Err(e) = reassembler.on_fragment(&[1, 0, 0]) {
        println!("short packet rejected: {}", e);
    }

    let stats = reassembler.stats();
    println!(
        "\nApplied {}, rejected {} (malformed {}, bad index {})",
        stats.applied,
        stats.rejected(),
        stats.malformed,
        stats.invalid_index
    );

    Ok(())
}
