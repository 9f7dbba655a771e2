//! Payload embedding
//!
//! Carries arbitrary bytes in the least significant byte of PCM samples,
//! leaving the higher-order bits of every sample as they were.

mod embed;
mod message;

pub use embed::{embed_payload, extract_payload, payload_capacity, HEADER_LEN};
pub use message::{Message, TextMessage};

use crate::engine::buffer::{PcmSamples, SampleBuffer};
use crate::error::Result;

/// Embed a [`Message`] at flat sample `offset`
pub fn embed_message<M: Message + ?Sized>(
    buffer: &mut SampleBuffer,
    offset: usize,
    message: &M,
) -> Result<()> {
    let bytes = message.to_bytes()?;
    embed_payload(buffer, offset, &bytes)
}

/// Extract a [`TextMessage`] embedded at flat sample `offset`
pub fn extract_text<S: PcmSamples + ?Sized>(samples: &S, offset: usize) -> Result<TextMessage> {
    let bytes = extract_payload(samples, offset)?;
    TextMessage::from_bytes(&bytes)
}
