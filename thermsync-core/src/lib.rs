//! # Thermsync Core
//!
//! Frame synchronization and reassembly for thermal sensor links.
//!
//! Two transports are supported. The serial link carries unframed binary
//! records with no markers, so frame boundaries are recovered by sliding a
//! decode window and checking the physical plausibility of the readings.
//! The notification link carries fixed-size fragments tagged with a slot
//! index, which are merged into a single live buffer.
//!
//! ## Modules
//!
//! - `constants`: Sensor defaults and wire layout sizes
//! - `types`: Core types (Frame, FrameGeometry, TempRange)
//! - `config`: Construction-time configuration
//! - `validator`: Physical plausibility predicate
//! - `fragment`: Fragment layouts and headers
//! - `decoder`: Cell and fragment decoding
//! - `encoder`: Frame and fragment encoding
//! - `synchronizer`: Resynchronizing byte-stream scanner
//! - `reassembler`: Indexed fragment merge
//! - `sink`: Frame consumer interface

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fragment;
pub mod reassembler;
pub mod sink;
pub mod synchronizer;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use config::{FragmentConfig, SensorConfig};
pub use error::{ConfigError, FragmentError};
pub use reassembler::FragmentReassembler;
pub use sink::FrameSink;
pub use synchronizer::ByteStreamSynchronizer;
pub use types::{Endianness, Frame, FrameGeometry, TempRange};

/// Result type alias for construction-time operations
pub type Result<T> = core::result::Result<T, ConfigError>;
