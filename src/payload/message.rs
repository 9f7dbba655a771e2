//! Payload messages
//!
//! A [`Message`] is anything that can be flattened into payload bytes for
//! [`embed_payload`](super::embed_payload).

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Content that can be carried as an embedded payload
pub trait Message {
    /// Serialize the message into payload bytes
    fn to_bytes(&self) -> Result<Vec<u8>>;
}

/// Plain text, optionally tagged with the extension of the file it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
}

impl TextMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file_extension: None,
        }
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = Some(extension.into());
        self
    }

    /// Parse payload bytes produced by [`Message::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Message for TextMessage {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
