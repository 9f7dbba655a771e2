//! Wavebuf - Random-Access PCM Sample Editing
//!
//! Wavebuf holds uncompressed WAVE audio as a flat little-endian byte buffer
//! and exposes it as sample-indexed integers:
//! 1. Sample Buffer - bounds-checked get/set of whole samples and of each
//!    sample's least significant byte
//! 2. Payload embedding - byte payloads carried in sample LSBs
//!
//! # Architecture
//!
//! Container parsing is not done here. A [`engine::WaveCodec`] decodes a file
//! into a format plus raw bytes and encodes them back; [`engine::HoundCodec`]
//! is the bundled implementation.

pub mod engine;
pub mod error;
pub mod payload;

pub use engine::{PcmFormat, PcmSamples, SampleBuffer, SampleView, SampleWidth};
pub use error::{Result, WavebufError};
