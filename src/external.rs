//! Boundaries to collaborators outside the engine.
//!
//! The engine never fetches data or converts documents itself. Callers
//! supply implementations of these traits; the CLI ships a filesystem
//! [`AttachmentStore`] and an HTTP [`WordConverter`].

use crate::error::Result;
use crate::model::{Attachment, AttachmentInfo};

/// Converts word-processor documents to PDF.
///
/// Called synchronously, once per attachment. Any error aborts the
/// assembly; implementations should not retry on the engine's behalf.
pub trait WordConverter: Send + Sync {
    /// Convert `bytes` (a document named `filename`) to PDF bytes.
    fn convert(&self, bytes: &[u8], filename: &str) -> Result<Vec<u8>>;
}

/// Source of attachment byte streams, keyed by service.
pub trait AttachmentStore {
    /// Attachments held by a service, in report order.
    fn list_attachments(&self, service_name: &str) -> Result<Vec<AttachmentInfo>>;

    /// Open one attachment's byte stream.
    fn get_attachment(&self, service_name: &str, info: &AttachmentInfo) -> Result<Attachment>;

    /// Open every attachment of a service.
    fn fetch_all(&self, service_name: &str) -> Result<Vec<Attachment>> {
        self.list_attachments(service_name)?
            .iter()
            .map(|info| self.get_attachment(service_name, info))
            .collect()
    }
}
