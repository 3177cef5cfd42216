use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use thermsync_cli::{commands, config, CaptureKind, LayoutArg};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "thermsync")]
#[command(about = "Thermsync - Frame recovery for thermal sensor links", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    sensor: SensorArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Sensor configuration shared by every command
#[derive(Args)]
struct SensorArgs {
    /// JSON sensor configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Frame rows
    #[arg(long, global = true)]
    rows: Option<usize>,

    /// Frame columns
    #[arg(long, global = true)]
    cols: Option<usize>,

    /// Lowest plausible reading in degrees
    #[arg(long, global = true, allow_hyphen_values = true)]
    min_temp: Option<f32>,

    /// Highest plausible reading in degrees
    #[arg(long, global = true, allow_hyphen_values = true)]
    max_temp: Option<f32>,

    /// Frames of unconsumed bytes kept between reads
    #[arg(long, global = true)]
    max_retained_frames: Option<usize>,

    /// Fragment layout of the notification link
    #[arg(long, global = true, value_enum)]
    layout: Option<LayoutArg>,
}

impl SensorArgs {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            rows: self.rows,
            cols: self.cols,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            max_retained_frames: self.max_retained_frames,
            layout: self.layout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recover frames from a captured serial stream
    Scan {
        /// Capture file to scan
        #[arg(short, long)]
        input: String,

        /// Output JSON file for recovered frames
        #[arg(short, long)]
        output: Option<String>,

        /// Bytes handed to the synchronizer per read
        #[arg(long, default_value = "64")]
        chunk_size: usize,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Merge a hex fragment capture into the live strip
    Reassemble {
        /// Fragment file, one hex notification per line
        #[arg(short, long)]
        input: String,

        /// Output JSON file for the reassembly report
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate a synthetic capture
    Simulate {
        /// Output file
        #[arg(short, long)]
        output: String,

        /// Capture kind
        #[arg(long, value_enum, default_value = "serial")]
        kind: CaptureKind,

        /// Number of frames
        #[arg(long, default_value = "10")]
        frames: usize,

        /// Probability of corrupting each frame
        #[arg(long, default_value = "0.0")]
        corrupt_rate: f64,

        /// Random seed for a reproducible capture
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print per-frame summaries from a live stream
    Monitor {
        /// Input file or `-` for standard input
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Bytes requested per read
        #[arg(long, default_value = "256")]
        read_size: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let sensor = config::load(cli.sensor.config.as_deref(), cli.sensor.overrides())?;

    // Execute command
    match cli.command {
        Commands::Scan {
            input,
            output,
            chunk_size,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), &sensor, chunk_size, stats_only),

        Commands::Reassemble { input, output } => {
            commands::reassemble::execute(&input, output.as_deref(), &sensor)
        }

        Commands::Simulate {
            output,
            kind,
            frames,
            corrupt_rate,
            seed,
        } => commands::simulate::execute(&output, kind, &sensor, frames, corrupt_rate, seed),

        Commands::Monitor { input, read_size } => {
            commands::monitor::execute(&input, &sensor, read_size)
        }
    }
}
