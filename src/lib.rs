//! # sarpdf
//!
//! Assembly engine for Subject Access Request (SAR) compliance reports.
//!
//! Content from many upstream services arrives as dynamically-shaped JSON
//! plus binary attachments. This crate turns it into one paginated PDF:
//!
//! - service content is normalized (humanized keys, "No data held" for
//!   absent values, readable dates) and rendered by a dedicated template
//!   or as an indented fallback block
//! - images are scaled to fit and centred; PDFs are embedded page by page;
//!   word-processor documents go through an external converter first
//! - covers and a table of contents are generated once the final page
//!   count is known, and everything is merged in report order
//!
//! ## Quick Start
//!
//! ```no_run
//! use sarpdf::{assemble_report, ContentNode, ReportOptions, ReportRequest, ServiceSection, SubjectDetails};
//!
//! fn main() -> sarpdf::Result<()> {
//!     let content = ContentNode::from_json_str(r#"{"offenderNo": "A1234BC", "alerts": []}"#)
//!         .expect("valid JSON");
//!     let request = ReportRequest::new(SubjectDetails::new("Joe Bloggs", "SAR-1"))
//!         .with_section(ServiceSection::new("prison-api", "Prison records").with_content(content));
//!
//!     let pdf = assemble_report(request, &ReportOptions::default())?;
//!     std::fs::write("report.pdf", pdf)?;
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod attachment;
pub mod detect;
pub mod error;
pub mod external;
pub mod geometry;
pub mod model;
pub mod normalize;
pub mod pdf;
pub mod render;

// Re-export commonly used types
pub use assemble::{AssembledReport, AssemblyStage, ReportAssembler};
pub use attachment::{AttachmentRenderer, RenderContext, RendererRegistry};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use external::{AttachmentStore, WordConverter};
pub use geometry::{apply_scale, center_position, scale_to_fit, Dimensions, Position, Transform};
pub use model::{
    Attachment, AttachmentInfo, ContentNode, NormalizedNode, ReportRequest, Scalar,
    ServiceSection, SubjectDetails, NO_DATA_HELD,
};
pub use normalize::{normalize, Normalizer};
pub use pdf::{embed_pdf, RenderedDocument, TextStyle};
pub use render::{render_fallback, PageSize, ReportOptions, ServiceTemplate, TemplateRegistry};

/// Assemble a report with the default renderers and no templates or
/// converter.
///
/// Use [`ReportAssembler`] to register templates or a word-processor
/// converter.
pub fn assemble_report(request: ReportRequest, options: &ReportOptions) -> Result<Vec<u8>> {
    ReportAssembler::new()
        .with_options(options.clone())
        .assemble(request)
}

/// Normalize content and render it as a fallback block.
///
/// This is what a service without a template shows in the report.
///
/// # Example
///
/// ```
/// use sarpdf::{preview_fallback, ContentNode};
///
/// let node = ContentNode::from_json_str(r#"{"testDataNumber": 99}"#).unwrap();
/// assert_eq!(preview_fallback(&node), "Test data number: 99");
/// ```
pub fn preview_fallback(content: &ContentNode) -> String {
    render_fallback(&normalize(content))
}
