//! Report assembly.
//!
//! A report is produced in two passes because the internal cover states
//! the final page count:
//!
//! 1. Render every service section, its attachments and the rear page
//!    into one body document, and record where each section starts.
//! 2. Measure the contents page, compute the total, then render the
//!    covers and the numbered contents.
//!
//! The parts are then copied into the output in this order: external
//! cover, internal cover, contents, content pages, rear page.
//!
//! # Example
//!
//! ```no_run
//! use sarpdf::assemble::ReportAssembler;
//! use sarpdf::model::{ContentNode, ReportRequest, ServiceSection, SubjectDetails};
//!
//! fn main() -> sarpdf::Result<()> {
//!     let request = ReportRequest::new(SubjectDetails::new("Joe Bloggs", "SAR-1"))
//!         .with_section(
//!             ServiceSection::new("prison-api", "Prison records")
//!                 .with_content(ContentNode::from_json_str(r#"{"offenderNo": "A1234BC"}"#).unwrap()),
//!         );
//!
//!     let bytes = ReportAssembler::new().assemble(request)?;
//!     std::fs::write("report.pdf", bytes)?;
//!     Ok(())
//! }
//! ```

mod front_matter;
mod stage;

pub use front_matter::{ContentsEntry, INTERNAL_MARKING, REPORT_TITLE};
pub use stage::AssemblyStage;

use crate::attachment::{RenderContext, RendererRegistry};
use crate::error::{Error, Result};
use crate::external::WordConverter;
use crate::model::{Attachment, ReportRequest, ServiceSection};
use crate::normalize::Normalizer;
use crate::pdf::RenderedDocument;
use crate::render::{render_fallback, ReportOptions, ServiceTemplate, TemplateRegistry};
use rayon::prelude::*;
use stage::StageTracker;
use std::sync::Arc;

/// A finished report with its page arithmetic.
#[derive(Debug, Clone)]
pub struct AssembledReport {
    /// The PDF
    pub bytes: Vec<u8>,

    /// Pages counted by the internal cover: internal cover, contents,
    /// content pages and rear page
    pub total_pages: usize,

    /// Service content and attachment pages
    pub content_pages: usize,

    /// Table of contents pages
    pub contents_pages: usize,
}

impl AssembledReport {
    /// Pages in the output, including the external cover.
    pub fn page_count(&self) -> usize {
        self.total_pages + 1
    }
}

/// Assembles report requests into PDFs.
///
/// Holds everything that is shared between assemblies: layout options,
/// the renderer table, service templates and the document converter.
/// One assembler can serve any number of requests, concurrently.
pub struct ReportAssembler {
    options: ReportOptions,
    renderers: RendererRegistry,
    templates: TemplateRegistry,
    converter: Option<Arc<dyn WordConverter>>,
    normalizer: Normalizer,
}

impl ReportAssembler {
    /// Create an assembler with default options and renderers, no
    /// templates and no converter.
    pub fn new() -> Self {
        Self {
            options: ReportOptions::default(),
            renderers: RendererRegistry::with_defaults(),
            templates: TemplateRegistry::new(),
            converter: None,
            normalizer: Normalizer::new(),
        }
    }

    /// Set layout options.
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the renderer table.
    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = renderers;
        self
    }

    /// Register a service template.
    pub fn with_template(mut self, template: Arc<dyn ServiceTemplate>) -> Self {
        self.templates.register(template);
        self
    }

    /// Replace all service templates.
    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Set the word-processor converter. Without one, word attachments
    /// fail the assembly.
    pub fn with_converter(mut self, converter: Arc<dyn WordConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Assemble one report into PDF bytes.
    pub fn assemble(&self, request: ReportRequest) -> Result<Vec<u8>> {
        self.assemble_with_summary(request).map(|report| report.bytes)
    }

    /// Assemble one report, returning the page arithmetic alongside the
    /// bytes.
    ///
    /// Any failure aborts the whole report; no partial output is returned.
    pub fn assemble_with_summary(&self, request: ReportRequest) -> Result<AssembledReport> {
        self.options.validate().map_err(Error::InvalidOptions)?;

        let ReportRequest { subject, sections } = request;
        let mut stage = StageTracker::new(&subject.sar_case_reference);
        let section_count = sections.len();

        let mut body = RenderedDocument::new(&self.options);
        let mut entries = Vec::with_capacity(section_count);
        for section in sections {
            entries.push(self.render_section(&mut body, section)?);
        }
        body.start_new_page()?;
        front_matter::rear_page(&mut body, &subject)?;
        let content_pages = body.page_count() - 1;
        stage.advance(AssemblyStage::ContentRendered);

        let contents_pages = front_matter::contents(&entries, None, &self.options)?.page_count();
        let total_pages = content_pages + 1 + contents_pages + 1;
        stage.advance(AssemblyStage::CountKnown);

        // pages are numbered from the internal cover
        let first_body_page = 1 + contents_pages + 1;
        let external = front_matter::external_cover(&subject, &self.options)?;
        let internal = front_matter::internal_cover(&subject, total_pages, &self.options)?;
        let contents = front_matter::contents(&entries, Some(first_body_page), &self.options)?;
        if contents.page_count() != contents_pages {
            return Err(Error::Render(format!(
                "contents grew from {} to {} pages once numbered",
                contents_pages,
                contents.page_count()
            )));
        }
        stage.advance(AssemblyStage::FrontMatterBuilt);

        let mut report = RenderedDocument::new(&self.options);
        for part in [external, internal, contents, body] {
            let at = report.page_count();
            report.merge(part, at)?;
        }
        stage.advance(AssemblyStage::Merged);

        let bytes = report.into_bytes()?;
        stage.advance(AssemblyStage::Done);
        debug_assert_eq!(stage.stage(), AssemblyStage::Done);

        log::info!(
            "Assembled report {}: {} services, {} pages ({} content, {} contents), {} bytes",
            subject.sar_case_reference,
            section_count,
            total_pages,
            content_pages,
            contents_pages,
            bytes.len()
        );

        Ok(AssembledReport {
            bytes,
            total_pages,
            content_pages,
            contents_pages,
        })
    }

    /// Assemble independent reports in parallel.
    ///
    /// Results are returned in request order; one failure does not affect
    /// the others.
    pub fn assemble_batch(&self, requests: Vec<ReportRequest>) -> Vec<Result<AssembledReport>> {
        requests
            .into_par_iter()
            .map(|request| self.assemble_with_summary(request))
            .collect()
    }

    fn render_section(&self, body: &mut RenderedDocument, section: ServiceSection) -> Result<ContentsEntry> {
        let ServiceSection {
            service_name,
            business_label,
            content,
            attachments,
        } = section;

        body.start_new_page()?;
        body.write_heading(&business_label)?;
        let entry = ContentsEntry {
            label: business_label,
            body_page: body.current_page_index(),
        };

        let normalized = self.normalizer.normalize_optional(content.as_ref());
        let block = match self.templates.get(&service_name) {
            Some(template) => template
                .render(&normalized)
                .map_err(|e| e.in_template(&service_name))?,
            None => render_fallback(&normalized),
        };
        body.write_block(&block)?;

        let ctx = RenderContext {
            page_size: self.options.page_dimensions(),
            image_max_proportion: self.options.image_max_proportion,
            converter: self.converter.as_deref(),
        };
        for attachment in attachments {
            self.render_attachment(&ctx, body, &service_name, attachment)?;
        }

        Ok(entry)
    }

    fn render_attachment(
        &self,
        ctx: &RenderContext<'_>,
        body: &mut RenderedDocument,
        service_name: &str,
        attachment: Attachment,
    ) -> Result<()> {
        let number = attachment.info.attachment_number;
        let filename = attachment.info.filename.clone();
        if !attachment.info.has_valid_number() {
            return Err(Error::Other("attachment numbers start at 1".into())
                .in_attachment(service_name, number, &filename));
        }

        body.start_new_page()?;
        body.write_heading(&attachment.info.heading())?;

        let (info, bytes) = attachment
            .read_all()
            .map_err(|e| Error::from(e).in_attachment(service_name, number, &filename))?;

        let renderer = self.renderers.resolve(&info.content_type);
        log::debug!(
            "Rendering attachment {} ({}) of {} with {} renderer",
            number,
            info.content_type,
            service_name,
            renderer.name()
        );

        renderer
            .render(ctx, body, &info, &bytes)
            .map_err(|e| e.in_attachment(service_name, number, &filename))
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("options", &self.options)
            .field("renderers", &self.renderers)
            .field("templates", &self.templates)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}
