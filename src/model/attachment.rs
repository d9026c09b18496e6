//! Binary attachments held by upstream services.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::{Cursor, Read};

/// Metadata describing one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    /// Positive number, unique within one service's attachments
    #[serde(deserialize_with = "positive_number")]
    pub attachment_number: u32,

    /// Original file name
    pub filename: String,

    /// Display name
    pub name: String,

    /// MIME type (e.g., "image/jpeg")
    pub content_type: String,
}

impl AttachmentInfo {
    pub fn new(
        attachment_number: u32,
        filename: impl Into<String>,
        name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            attachment_number,
            filename: filename.into(),
            name: name.into(),
            content_type: content_type.into(),
        }
    }

    /// Attachment numbers start at 1.
    pub fn has_valid_number(&self) -> bool {
        self.attachment_number > 0
    }

    /// Heading written above the attachment's content.
    pub fn heading(&self) -> String {
        format!(
            "Attachment {}: {} ({})",
            self.attachment_number, self.name, self.filename
        )
    }
}

fn positive_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let number = u32::deserialize(deserializer)?;
    if number == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a positive attachment number",
        ));
    }
    Ok(number)
}

/// An attachment with its byte stream.
///
/// The stream is read to the end exactly once, during assembly.
pub struct Attachment {
    pub info: AttachmentInfo,
    pub data: Box<dyn Read + Send>,
}

impl Attachment {
    /// Create an attachment over any byte source.
    pub fn new(info: AttachmentInfo, data: impl Read + Send + 'static) -> Self {
        Self {
            info,
            data: Box::new(data),
        }
    }

    /// Create an attachment over bytes already in memory.
    pub fn from_bytes(info: AttachmentInfo, bytes: Vec<u8>) -> Self {
        Self::new(info, Cursor::new(bytes))
    }

    /// Drain the stream, consuming the attachment.
    pub fn read_all(self) -> std::io::Result<(AttachmentInfo, Vec<u8>)> {
        let Attachment { info, mut data } = self;
        let mut bytes = Vec::new();
        data.read_to_end(&mut bytes)?;
        Ok((info, bytes))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
