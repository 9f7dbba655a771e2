//! Sample Buffer
//!
//! Owns raw interleaved PCM bytes together with their [`PcmFormat`] and
//! provides bounds-checked sample-level access.
//!
//! Samples are addressed by a *flat sample index*: channel `c` of frame `f`
//! is index `f * channels + c`. Read access is shared by the owning
//! [`SampleBuffer`] and the borrowed [`SampleView`] through the
//! [`PcmSamples`] trait; only the owner can write.

use std::ops::Range;

use log::debug;

use crate::engine::format::{PcmFormat, SampleWidth};
use crate::error::{Result, WavebufError};

/// Smallest sample width that can hold an `i32` without loss
pub const INT_SIZE: usize = 4;

// ============================================================================
// Helper Functions
// ============================================================================

/// Byte range of flat sample `index`, or `IndexOutOfRange`
#[inline]
fn sample_range(format: &PcmFormat, len_bytes: usize, index: usize) -> Result<Range<usize>> {
    let size = format.sample_size_bytes();
    let len = len_bytes / size;
    if index >= len {
        return Err(WavebufError::IndexOutOfRange { index, len });
    }
    let start = index * size;
    Ok(start..start + size)
}

/// Reject byte lengths that are not a whole number of frames
fn check_whole_frames(format: &PcmFormat, len_bytes: usize) -> Result<()> {
    let frame_size = format.frame_size_bytes();
    if len_bytes % frame_size != 0 {
        return Err(WavebufError::format(format!(
            "byte length {} is not a multiple of the frame size {} ({} channels x {} bytes)",
            len_bytes,
            frame_size,
            format.channels(),
            format.sample_size_bytes()
        )));
    }
    Ok(())
}

// ============================================================================
// Read Access
// ============================================================================

/// Read-only access to interleaved PCM samples
///
/// Implementors only supply the format and the bytes; every accessor is
/// derived from those two.
pub trait PcmSamples {
    /// Format the bytes are interpreted with
    fn format(&self) -> &PcmFormat;

    /// Raw interleaved little-endian bytes
    fn as_bytes(&self) -> &[u8];

    /// Independent copy of the raw bytes
    ///
    /// Mutating the returned vector never affects the samples.
    fn data(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    #[inline]
    fn len_bytes(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Number of samples across all channels
    #[inline]
    fn sample_count(&self) -> usize {
        self.as_bytes().len() / self.format().sample_size_bytes()
    }

    /// Number of frames (samples per channel)
    #[inline]
    fn frame_count(&self) -> usize {
        self.as_bytes().len() / self.format().frame_size_bytes()
    }

    /// Read flat sample `index` as an `i32`
    ///
    /// 8-bit samples are unsigned offset-binary in WAVE data and read back as
    /// `byte - 128`; every wider width reads as a sign-extended integer.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - unless `index < sample_count()`
    fn get_sample_i32(&self, index: usize) -> Result<i32> {
        let format = self.format();
        let range = sample_range(format, self.len_bytes(), index)?;
        Ok(format.width().decode(&self.as_bytes()[range]))
    }

    /// Read the least significant byte (offset 0) of flat sample `index`
    ///
    /// # Errors
    /// * `IndexOutOfRange` - unless `index < sample_count()`
    fn get_lsb(&self, index: usize) -> Result<u8> {
        let range = sample_range(self.format(), self.len_bytes(), index)?;
        Ok(self.as_bytes()[range.start])
    }

    /// De-interleave one channel
    ///
    /// # Errors
    /// * `IndexOutOfRange` - if `channel` is not below the channel count
    fn channel_samples(&self, channel: u16) -> Result<Vec<i32>> {
        let format = self.format();
        if channel >= format.channels() {
            return Err(WavebufError::IndexOutOfRange {
                index: channel as usize,
                len: format.channels() as usize,
            });
        }
        let width = format.width();
        let offset = channel as usize * width.bytes();
        Ok(self
            .as_bytes()
            .chunks_exact(format.frame_size_bytes())
            .map(|frame| width.decode(&frame[offset..offset + width.bytes()]))
            .collect())
    }

    /// Duration in seconds: `frame_count / sample_rate`
    ///
    /// # Errors
    /// * `InvalidConfiguration` - if the sample rate is not positive
    fn duration_seconds(&self) -> Result<f64> {
        let rate = self.format().checked_sample_rate()?;
        Ok(self.frame_count() as f64 / rate)
    }

    /// Nominal bandwidth in bits per second, see
    /// [`PcmFormat::stream_speed_bits_per_second`]
    fn stream_speed_bits_per_second(&self) -> Result<u64> {
        self.format().stream_speed_bits_per_second()
    }
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Owned, editable PCM sample data
///
/// # Example
/// ```
/// use wavebuf::engine::buffer::{PcmSamples, SampleBuffer};
///
/// // One second of silent stereo at 8 kHz, 32-bit
/// let mut buffer = SampleBuffer::from_samples(4, 8000.0, 2, &vec![0; 16000]).unwrap();
/// buffer.set_sample_i32(1, -42).unwrap();
/// assert_eq!(buffer.get_sample_i32(1).unwrap(), -42);
/// assert_eq!(buffer.frame_count(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    format: PcmFormat,
    data: Vec<u8>,
}

impl SampleBuffer {
    /// Wrap decoded bytes verbatim
    ///
    /// # Errors
    /// * `Format` - if `bytes` is not a whole number of frames
    pub fn from_raw(format: PcmFormat, bytes: Vec<u8>) -> Result<Self> {
        check_whole_frames(&format, bytes.len())?;
        debug!(
            "Wrapped {} bytes as {}ch/{}-bit PCM",
            bytes.len(),
            format.channels(),
            format.bits_per_sample()
        );
        Ok(Self {
            format,
            data: bytes,
        })
    }

    /// Synthesize a buffer from interleaved `i32` samples
    ///
    /// Each value is written through [`SampleBuffer::set_sample_i32`], so
    /// wider-than-32-bit samples are sign-filled.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - `sample_size_bytes` below 4, an unsupported
    ///   width, or zero channels
    /// * `Format` - `samples.len()` is not a multiple of `channels`
    pub fn from_samples(
        sample_size_bytes: usize,
        sample_rate: f32,
        channels: u16,
        samples: &[i32],
    ) -> Result<Self> {
        if sample_size_bytes < INT_SIZE {
            return Err(WavebufError::config(format!(
                "sample size {} bytes is smaller than an i32 ({} bytes)",
                sample_size_bytes, INT_SIZE
            )));
        }
        let width = SampleWidth::from_bytes(sample_size_bytes)?;
        let format = PcmFormat::with_width(channels, sample_rate, width)?;
        check_whole_frames(&format, samples.len() * sample_size_bytes)?;

        let mut buffer = Self {
            format,
            data: vec![0u8; samples.len() * sample_size_bytes],
        };
        for (index, &value) in samples.iter().enumerate() {
            buffer.set_sample_i32(index, value)?;
        }

        debug!(
            "Built {} frames of {}ch/{}-bit PCM from i32 samples",
            buffer.frame_count(),
            channels,
            width.bits()
        );
        Ok(buffer)
    }

    /// Borrow a read-only view of this buffer
    #[inline]
    pub fn view(&self) -> SampleView<'_> {
        SampleView {
            format: self.format,
            data: &self.data,
        }
    }

    /// Overwrite flat sample `index` with `value`
    ///
    /// `value` is truncated to the sample width. Nothing is written when the
    /// index is out of range.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - unless `index < sample_count()`
    pub fn set_sample_i32(&mut self, index: usize, value: i32) -> Result<()> {
        let range = sample_range(&self.format, self.data.len(), index)?;
        self.format.width().encode(value, &mut self.data[range]);
        Ok(())
    }

    /// Overwrite only the least significant byte of flat sample `index`
    ///
    /// # Errors
    /// * `IndexOutOfRange` - unless `index < sample_count()`
    pub fn set_lsb(&mut self, index: usize, byte: u8) -> Result<()> {
        let range = sample_range(&self.format, self.data.len(), index)?;
        self.data[range.start] = byte;
        Ok(())
    }

    /// Consume the buffer, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl PcmSamples for SampleBuffer {
    #[inline]
    fn format(&self) -> &PcmFormat {
        &self.format
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

// ============================================================================
// Sample View
// ============================================================================

/// Borrowed, read-only PCM samples
///
/// Obtained from [`SampleBuffer::view`], or built over any byte slice that
/// holds whole frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleView<'a> {
    format: PcmFormat,
    data: &'a [u8],
}

impl<'a> SampleView<'a> {
    /// View `bytes` with `format`
    ///
    /// # Errors
    /// * `Format` - if `bytes` is not a whole number of frames
    pub fn new(format: PcmFormat, bytes: &'a [u8]) -> Result<Self> {
        check_whole_frames(&format, bytes.len())?;
        Ok(Self {
            format,
            data: bytes,
        })
    }
}

impl PcmSamples for SampleView<'_> {
    #[inline]
    fn format(&self) -> &PcmFormat {
        &self.format
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

// ============================================================================
// Tests
// ============================================================================
