//! Data model for report requests.
//!
//! Upstream services return dynamically-shaped JSON, captured here as a
//! [`ContentNode`] tree. The normalizer turns that into a
//! [`NormalizedNode`] tree for display. Attachments and the subject's
//! identity travel alongside the content in a [`ReportRequest`].

mod attachment;
mod content;
mod report;

pub use attachment::{Attachment, AttachmentInfo};
pub use content::{ContentNode, NormalizedNode, Scalar, NO_DATA_HELD};
pub use report::{ReportRequest, ServiceSection, SubjectDetails};
