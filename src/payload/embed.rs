//! LSB payload embedding
//!
//! A payload is stored one byte per sample, in the least significant byte of
//! consecutive flat samples starting at `offset`. A 4-byte little-endian
//! length header precedes the payload bytes. Only byte offset 0 of each
//! carrier sample is touched.

use log::trace;

use crate::engine::buffer::{PcmSamples, SampleBuffer};
use crate::error::{Result, WavebufError};

/// Samples consumed by the length header
pub const HEADER_LEN: usize = 4;

/// Number of payload bytes that fit in `samples` from flat index `offset`
pub fn payload_capacity<S: PcmSamples + ?Sized>(samples: &S, offset: usize) -> usize {
    samples
        .sample_count()
        .saturating_sub(offset)
        .saturating_sub(HEADER_LEN)
}

/// Embed `payload` into the LSBs of `buffer` starting at flat index `offset`
///
/// Capacity is checked before anything is written, so a rejected payload
/// leaves the buffer untouched.
///
/// # Errors
/// * `PayloadTooLarge` - header plus payload do not fit after `offset`
pub fn embed_payload(buffer: &mut SampleBuffer, offset: usize, payload: &[u8]) -> Result<()> {
    let needed = HEADER_LEN + payload.len();
    let available = buffer.sample_count().saturating_sub(offset);
    if needed > available {
        return Err(WavebufError::PayloadTooLarge { needed, available });
    }
    let len = u32::try_from(payload.len()).map_err(|_| WavebufError::PayloadTooLarge {
        needed,
        available: HEADER_LEN + u32::MAX as usize,
    })?;

    let header = len.to_le_bytes();
    for (i, &byte) in header.iter().chain(payload).enumerate() {
        buffer.set_lsb(offset + i, byte)?;
    }

    trace!("Embedded {} payload bytes at sample {}", payload.len(), offset);
    Ok(())
}

/// Extract a payload previously written by [`embed_payload`]
///
/// # Errors
/// * `IndexOutOfRange` - fewer than four samples after `offset`
/// * `CorruptPayload` - the header claims more bytes than the carrier holds
pub fn extract_payload<S: PcmSamples + ?Sized>(samples: &S, offset: usize) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_LEN];
    for (i, byte) in header.iter_mut().enumerate() {
        *byte = samples.get_lsb(offset + i)?;
    }

    let len = u32::from_le_bytes(header) as usize;
    let capacity = payload_capacity(samples, offset);
    if len > capacity {
        return Err(WavebufError::CorruptPayload {
            reason: format!(
                "header claims {} bytes but only {} fit after sample {}",
                len, capacity, offset
            ),
        });
    }

    let start = offset + HEADER_LEN;
    let payload = (start..start + len)
        .map(|index| samples.get_lsb(index))
        .collect::<Result<Vec<u8>>>()?;

    trace!("Extracted {} payload bytes from sample {}", len, offset);
    Ok(payload)
}
