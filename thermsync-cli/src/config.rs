//! Sensor configuration loading for the CLI
//!
//! Configuration comes from an optional JSON file (any omitted field takes
//! the MLX90641 default) and is then adjusted by command-line overrides.

use crate::LayoutArg;
use anyhow::{Context, Result};
use std::fs;
use thermsync_core::SensorConfig;
use tracing::debug;

/// Command-line overrides applied on top of the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Frame rows
    pub rows: Option<usize>,
    /// Frame columns
    pub cols: Option<usize>,
    /// Lowest plausible reading
    pub min_temp: Option<f32>,
    /// Highest plausible reading
    pub max_temp: Option<f32>,
    /// Retained buffer bound in frames
    pub max_retained_frames: Option<usize>,
    /// Fragment layout; also sets the fragment width
    pub layout: Option<LayoutArg>,
}

/// Load, override and validate the sensor configuration
pub fn load(path: Option<&str>, overrides: Overrides) -> Result<SensorConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str::<SensorConfig>(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => SensorConfig::default(),
    };

    if let Some(rows) = overrides.rows {
        config.geometry.rows = rows;
    }
    if let Some(cols) = overrides.cols {
        config.geometry.cols = cols;
    }
    if let Some(min) = overrides.min_temp {
        config.range.min = min;
    }
    if let Some(max) = overrides.max_temp {
        config.range.max = max;
    }
    if let Some(k) = overrides.max_retained_frames {
        config.max_retained_frames = k;
    }
    if let Some(layout) = overrides.layout {
        config.fragments.layout = layout.layout();
        config.fragments.width = config.fragments.layout.value_count;
    }

    config.validate().context("Invalid sensor configuration")?;

    debug!(
        "Sensor config: {}x{} cells of {} bytes, range [{}, {}], {} fragments of {}",
        config.geometry.rows,
        config.geometry.cols,
        config.geometry.cell_byte_width,
        config.range.min,
        config.range.max,
        config.fragments.count,
        config.fragments.width
    );

    Ok(config)
}
