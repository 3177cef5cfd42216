//! Example encoding a serial frame and a pair of strip fragments

use thermsync_core::{
    encoder::{encode_frame, FragmentBuilder},
    Frame, SensorConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Thermsync Encoding Example\n");

    let config = SensorConfig::default();
    let geometry = config.geometry;

    // A warm spot in the middle of a 21 degree scene
    let values: Vec<f32> = (0..geometry.cell_count())
        .map(|i| {
            let (row, col) = (i / geometry.cols, i % geometry.cols);
            let dr = row as f32 - 5.5;
            let dc = col as f32 - 7.5;
            21.0 + 12.0 / (1.0 + (dr * dr + dc * dc) / 8.0)
        })
        .collect();

    let encoded = encode_frame(&geometry, &values)?;
    println!(
        "Serial frame: {}x{} cells, {} bytes",
        geometry.rows,
        geometry.cols,
        encoded.len()
    );
    println!("  First 16 bytes: {:02x?}", &encoded[..16]);

    let frame = Frame::new(geometry.rows, geometry.cols, values)?;
    let averages = frame.column_averages();
    println!("\nColumn averages: {:.1?}", averages);

    let fragments = &config.fragments;
    for index in 0..fragments.count {
        let half = &averages[index * fragments.width..(index + 1) * fragments.width];
        let fragment = FragmentBuilder::new(fragments.layout, index as u8)
            .degrees(half, fragments.scale)
            .build()?;
        println!(
            "Fragment {}: {} bytes {:02x?}",
            index,
            fragment.len(),
            &fragment[..]
        );
    }

    Ok(())
}
