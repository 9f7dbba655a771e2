//! WAVE container boundary
//!
//! The sample buffer never touches files itself. Decoding and encoding are
//! delegated to a [`WaveCodec`], an external collaborator that turns a file
//! into a format plus raw PCM bytes and back. [`HoundCodec`] is the default
//! implementation, built on the `hound` WAVE reader/writer.
//!
//! Codec errors are propagated unchanged: no retries, no partial reads.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::engine::buffer::{PcmSamples, SampleBuffer, SampleView};
use crate::engine::format::{PcmFormat, SampleWidth};
use crate::error::{Result, WavebufError};

/// Output of a decode: the format, the frame count reported by the
/// container, and the interleaved little-endian PCM bytes
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWave {
    pub format: PcmFormat,
    pub frame_count: u64,
    pub data: Vec<u8>,
}

/// External WAVE reader/writer
pub trait WaveCodec {
    /// Read a WAVE file into a format and raw PCM bytes
    fn decode(&self, path: &Path) -> Result<DecodedWave>;

    /// Write a snapshot of raw PCM bytes as a WAVE file
    fn encode(&self, format: &PcmFormat, bytes: Vec<u8>, frame_count: u64, path: &Path)
        -> Result<()>;
}

/// Decode `path` with `codec` and wrap the bytes in a [`SampleBuffer`]
///
/// # Errors
/// * `Decode` - passed through from the codec
/// * `Format` - the bytes are not whole frames, or disagree with the
///   reported frame count
pub fn load_wave<C, P>(codec: &C, path: P) -> Result<SampleBuffer>
where
    C: WaveCodec + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let decoded = codec.decode(path)?;
    let buffer = SampleBuffer::from_raw(decoded.format, decoded.data)?;

    if buffer.frame_count() as u64 != decoded.frame_count {
        return Err(WavebufError::format(format!(
            "{} reports {} frames but holds {}",
            path.display(),
            decoded.frame_count,
            buffer.frame_count()
        )));
    }

    debug!(
        "Loaded {}: {} frames, {}ch/{}-bit",
        path.display(),
        buffer.frame_count(),
        buffer.format().channels(),
        buffer.format().bits_per_sample()
    );
    Ok(buffer)
}

/// Encode a snapshot of `samples` to `path` with `codec`
///
/// The codec receives a copy of the bytes, never the live buffer.
pub fn save_wave<C, S, P>(codec: &C, samples: &S, path: P) -> Result<()>
where
    C: WaveCodec + ?Sized,
    S: PcmSamples + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    codec.encode(
        samples.format(),
        samples.data(),
        samples.frame_count() as u64,
        path,
    )?;
    debug!("Saved {} frames to {}", samples.frame_count(), path.display());
    Ok(())
}

// ============================================================================
// Hound Codec
// ============================================================================

/// [`WaveCodec`] backed by `hound`
///
/// Handles integer PCM at 8, 16, 24 and 32 bits. Floating-point files are
/// rejected on decode; 64-bit samples are rejected on encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoundCodec;

impl HoundCodec {
    pub fn new() -> Self {
        HoundCodec
    }
}

impl WaveCodec for HoundCodec {
    fn decode(&self, path: &Path) -> Result<DecodedWave> {
        let reader = WavReader::open(path)
            .map_err(|e| decode_error(path, "failed to open WAVE file", Some(Box::new(e))))?;

        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(decode_error(
                path,
                "floating-point samples are not integer PCM",
                None,
            ));
        }

        let width = SampleWidth::from_bits(spec.bits_per_sample)
            .map_err(|e| decode_error(path, "unsupported bit depth", Some(Box::new(e))))?;
        let format = PcmFormat::with_width(spec.channels, spec.sample_rate as f32, width)
            .map_err(|e| decode_error(path, "invalid format header", Some(Box::new(e))))?;
        let frame_count = reader.duration() as u64;

        let mut data = Vec::with_capacity(reader.len() as usize * width.bytes());
        let mut scratch = [0u8; 8];
        let packed = &mut scratch[..width.bytes()];
        for sample in reader.into_samples::<i32>() {
            let value = sample
                .map_err(|e| decode_error(path, "failed to read samples", Some(Box::new(e))))?;
            width.encode(value, packed);
            data.extend_from_slice(packed);
        }

        let expected = frame_count as usize * format.frame_size_bytes();
        if data.len() != expected {
            return Err(decode_error(
                path,
                &format!("truncated data: expected {} bytes, read {}", expected, data.len()),
                None,
            ));
        }

        debug!(
            "Decoded {} ({} frames, {} Hz)",
            path.display(),
            frame_count,
            spec.sample_rate
        );
        Ok(DecodedWave {
            format,
            frame_count,
            data,
        })
    }

    fn encode(
        &self,
        format: &PcmFormat,
        bytes: Vec<u8>,
        frame_count: u64,
        path: &Path,
    ) -> Result<()> {
        let view = SampleView::new(*format, &bytes)
            .map_err(|e| encode_error(path, "data is not whole frames", Some(Box::new(e))))?;
        if view.frame_count() as u64 != frame_count {
            return Err(encode_error(
                path,
                &format!(
                    "frame count {} does not match {} frames of data",
                    frame_count,
                    view.frame_count()
                ),
                None,
            ));
        }

        let width = format.width();
        if width == SampleWidth::I64 {
            return Err(encode_error(path, "64-bit samples cannot be written", None));
        }

        let sample_rate = wave_sample_rate(format)
            .map_err(|e| encode_error(path, "invalid sample rate", Some(Box::new(e))))?;

        let spec = WavSpec {
            channels: format.channels(),
            sample_rate,
            bits_per_sample: format.bits_per_sample(),
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)
            .map_err(|e| encode_error(path, "failed to create WAVE file", Some(Box::new(e))))?;

        for chunk in bytes.chunks_exact(width.bytes()) {
            writer
                .write_sample(width.decode(chunk))
                .map_err(|e| encode_error(path, "failed to write sample", Some(Box::new(e))))?;
        }

        writer
            .finalize()
            .map_err(|e| encode_error(path, "failed to finalize WAVE file", Some(Box::new(e))))?;

        debug!("Encoded {} frames to {}", frame_count, path.display());
        Ok(())
    }
}

// ============================================================================
// Internal helper functions
// ============================================================================

type BoxedSource = Option<Box<dyn std::error::Error + Send + Sync>>;

fn decode_error(path: &Path, reason: &str, source: BoxedSource) -> WavebufError {
    WavebufError::Decode {
        path: path.display().to_string(),
        reason: reason.to_string(),
        source,
    }
}

fn encode_error(path: &Path, reason: &str, source: BoxedSource) -> WavebufError {
    WavebufError::Encode {
        path: path.display().to_string(),
        reason: reason.to_string(),
        source,
    }
}

/// WAVE headers store the rate as a whole number of Hz
fn wave_sample_rate(format: &PcmFormat) -> Result<u32> {
    let rate = format.checked_sample_rate()?;
    if rate.fract() != 0.0 || rate > u32::MAX as f64 {
        return Err(WavebufError::config(format!(
            "sample rate {} is not a whole number of Hz",
            rate
        )));
    }
    Ok(rate as u32)
}

// ============================================================================
// Tests
// ============================================================================
