//! Sample Engine Module
//!
//! Core PCM handling:
//! - Format descriptor and per-width byte codec
//! - Sample buffer with bounds-checked access
//! - WAVE codec boundary

pub mod buffer;
pub mod format;
pub mod io;

pub use buffer::{PcmSamples, SampleBuffer, SampleView, INT_SIZE};
pub use format::{PcmFormat, SampleWidth};
pub use io::{load_wave, save_wave, DecodedWave, HoundCodec, WaveCodec};
