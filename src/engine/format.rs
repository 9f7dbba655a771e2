//! PCM format descriptor
//!
//! [`PcmFormat`] describes how a flat byte buffer is laid out: how many
//! interleaved channels, how wide each sample is, and how many frames play
//! per second. [`SampleWidth`] owns the byte-level codec for each supported
//! width so every conversion goes through one explicit little-endian contract.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WavebufError};

// ============================================================================
// Sample Width
// ============================================================================

/// Byte width of one mono sample, with its little-endian codec
///
/// | bits | storage                       |
/// |------|-------------------------------|
/// | 8    | unsigned, offset by 128       |
/// | 16   | signed two's complement       |
/// | 24   | signed two's complement       |
/// | 32   | signed two's complement       |
/// | 64   | signed, sign-filled from i32  |
///
/// Values are exchanged as `i32`. Writing truncates to the declared width;
/// reading sign-extends (or, for 64-bit, keeps the low 32 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    /// 8-bit unsigned offset-binary, as stored in WAVE files
    U8,
    /// 16-bit signed
    I16,
    /// 24-bit signed, packed in 3 bytes
    I24,
    /// 32-bit signed
    I32,
    /// 64-bit signed
    I64,
}

impl SampleWidth {
    /// Look up the width for a bits-per-sample value
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(SampleWidth::U8),
            16 => Ok(SampleWidth::I16),
            24 => Ok(SampleWidth::I24),
            32 => Ok(SampleWidth::I32),
            64 => Ok(SampleWidth::I64),
            _ => Err(WavebufError::config(format!(
                "{}-bit samples are not supported (use 8, 16, 24, 32 or 64)",
                bits
            ))),
        }
    }

    /// Look up the width for a sample size in bytes
    pub fn from_bytes(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(SampleWidth::U8),
            2 => Ok(SampleWidth::I16),
            3 => Ok(SampleWidth::I24),
            4 => Ok(SampleWidth::I32),
            8 => Ok(SampleWidth::I64),
            _ => Err(WavebufError::config(format!(
                "{}-byte samples are not supported (use 1, 2, 3, 4 or 8)",
                bytes
            ))),
        }
    }

    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::U8 => 1,
            SampleWidth::I16 => 2,
            SampleWidth::I24 => 3,
            SampleWidth::I32 => 4,
            SampleWidth::I64 => 8,
        }
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.bytes() as u16 * 8
    }

    /// Smallest and largest `i32` that survive a write/read through this width
    pub fn value_range(self) -> (i32, i32) {
        match self {
            SampleWidth::U8 => (i8::MIN as i32, i8::MAX as i32),
            SampleWidth::I16 => (i16::MIN as i32, i16::MAX as i32),
            SampleWidth::I24 => (-(1 << 23), (1 << 23) - 1),
            SampleWidth::I32 | SampleWidth::I64 => (i32::MIN, i32::MAX),
        }
    }

    /// Decode one sample from exactly `self.bytes()` little-endian bytes
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> i32 {
        debug_assert_eq!(bytes.len(), self.bytes());
        match self {
            SampleWidth::U8 => bytes[0] as i32 - 128,
            SampleWidth::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as i32,
            SampleWidth::I24 => {
                // Shift the top byte into place, then arithmetic-shift back down
                i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8
            }
            SampleWidth::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            SampleWidth::I64 => {
                let mut wide = [0u8; 8];
                wide.copy_from_slice(bytes);
                i64::from_le_bytes(wide) as i32
            }
        }
    }

    /// Encode `value` into exactly `self.bytes()` little-endian bytes
    #[inline]
    pub fn encode(self, value: i32, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.bytes());
        match self {
            SampleWidth::U8 => out[0] = value.wrapping_add(128) as u8,
            SampleWidth::I16 => out.copy_from_slice(&(value as i16).to_le_bytes()),
            SampleWidth::I24 => out.copy_from_slice(&value.to_le_bytes()[..3]),
            SampleWidth::I32 => out.copy_from_slice(&value.to_le_bytes()),
            SampleWidth::I64 => out.copy_from_slice(&(value as i64).to_le_bytes()),
        }
    }
}

// ============================================================================
// PCM Format
// ============================================================================

/// Immutable description of interleaved integer PCM data
///
/// # Example
/// ```
/// use wavebuf::engine::format::PcmFormat;
///
/// let format = PcmFormat::new(2, 44100.0, 16).unwrap();
/// assert_eq!(format.sample_size_bytes(), 2);
/// assert_eq!(format.frame_size_bytes(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FormatRecord", into = "FormatRecord")]
pub struct PcmFormat {
    channels: u16,
    sample_rate: f32,
    width: SampleWidth,
}

impl PcmFormat {
    /// Create a format descriptor
    ///
    /// The sample rate is not checked here: a buffer with an unknown rate can
    /// still be edited, and only the time-based metrics reject it.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - zero channels or an unsupported bit depth
    pub fn new(channels: u16, sample_rate: f32, bits_per_sample: u16) -> Result<Self> {
        Self::with_width(channels, sample_rate, SampleWidth::from_bits(bits_per_sample)?)
    }

    /// Create a format descriptor from an already-resolved width
    pub fn with_width(channels: u16, sample_rate: f32, width: SampleWidth) -> Result<Self> {
        if channels == 0 {
            return Err(WavebufError::config("channel count must be at least 1"));
        }
        Ok(Self {
            channels,
            sample_rate,
            width,
        })
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    pub fn bits_per_sample(&self) -> u16 {
        self.width.bits()
    }

    #[inline]
    pub fn sample_size_bytes(&self) -> usize {
        self.width.bytes()
    }

    #[inline]
    pub fn width(&self) -> SampleWidth {
        self.width
    }

    /// Bytes occupied by one frame (one sample from every channel)
    #[inline]
    pub fn frame_size_bytes(&self) -> usize {
        self.width.bytes() * self.channels as usize
    }

    /// The sample rate as `f64`, rejecting rates that cannot drive a clock
    pub fn checked_sample_rate(&self) -> Result<f64> {
        let rate = self.sample_rate as f64;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(WavebufError::config(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        Ok(rate)
    }

    /// Nominal bits per second a real-time player must sustain
    ///
    /// Frame size in bits times frames per second, computed in `f64` and
    /// rounded so high sample rates cannot overflow an intermediate.
    pub fn stream_speed_bits_per_second(&self) -> Result<u64> {
        let rate = self.checked_sample_rate()?;
        let frame_bits = self.width.bits() as f64 * self.channels as f64;
        Ok((frame_bits * rate).round() as u64)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON, applying the same validation as [`PcmFormat::new`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// On-disk shape of [`PcmFormat`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FormatRecord {
    channels: u16,
    sample_rate: f32,
    bits_per_sample: u16,
}

impl From<PcmFormat> for FormatRecord {
    fn from(format: PcmFormat) -> Self {
        FormatRecord {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.bits_per_sample(),
        }
    }
}

impl TryFrom<FormatRecord> for PcmFormat {
    type Error = WavebufError;

    fn try_from(record: FormatRecord) -> Result<Self> {
        PcmFormat::new(record.channels, record.sample_rate, record.bits_per_sample)
    }
}

// ============================================================================
// Tests
// ============================================================================
