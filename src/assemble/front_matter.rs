//! Covers, contents and rear page.

use crate::error::Result;
use crate::model::SubjectDetails;
use crate::normalize::DATE_FORMAT;
use crate::pdf::{RenderedDocument, TextStyle};
use crate::render::ReportOptions;
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "Subject Access Request Report";
pub const INTERNAL_MARKING: &str = "INTERNAL ONLY";

/// One line of the contents page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsEntry {
    pub label: String,
    /// Zero-based page within the content pages where the section starts
    pub body_page: usize,
}

/// The cover shown to the subject. Carries no page count.
pub fn external_cover(subject: &SubjectDetails, options: &ReportOptions) -> Result<RenderedDocument> {
    let mut doc = RenderedDocument::new(options);
    doc.add_vertical_space(4.0);
    doc.write_centered(REPORT_TITLE, TextStyle::Title)?;
    doc.add_vertical_space(2.0);
    write_identity(&mut doc, subject)?;
    doc.write_line(&format!(
        "Date range: {} to {}",
        subject.date_from.map_or_else(|| "Start of record".to_string(), display_date),
        display_date(subject.date_to.unwrap_or(options.report_date)),
    ))?;
    doc.write_line(&format!("Report date: {}", display_date(options.report_date)))?;
    Ok(doc)
}

/// The internal cover, stating the final page count.
pub fn internal_cover(
    subject: &SubjectDetails,
    total_pages: usize,
    options: &ReportOptions,
) -> Result<RenderedDocument> {
    let mut doc = RenderedDocument::new(options);
    doc.add_vertical_space(4.0);
    doc.write_centered(INTERNAL_MARKING, TextStyle::Title)?;
    doc.write_centered(REPORT_TITLE, TextStyle::Heading)?;
    doc.add_vertical_space(2.0);
    write_identity(&mut doc, subject)?;
    doc.write_line(&format!("Report date: {}", display_date(options.report_date)))?;
    doc.write_line(&format!("Total Pages: {}", total_pages))?;
    Ok(doc)
}

/// The table of contents.
///
/// With `first_body_page` unset the page numbers are left blank; the
/// layout is otherwise identical, which is what the measuring pass needs.
pub fn contents(
    entries: &[ContentsEntry],
    first_body_page: Option<usize>,
    options: &ReportOptions,
) -> Result<RenderedDocument> {
    let mut doc = RenderedDocument::new(options);
    doc.write_heading("Contents")?;
    doc.write_line(INTERNAL_MARKING)?;
    doc.add_vertical_space(1.0);
    for entry in entries {
        let number = first_body_page
            .map(|first| (first + entry.body_page).to_string())
            .unwrap_or_default();
        doc.write_row(&entry.label, &number, TextStyle::Body)?;
    }
    Ok(doc)
}

/// Write the rear page onto the current page of `doc`.
pub fn rear_page(doc: &mut RenderedDocument, subject: &SubjectDetails) -> Result<()> {
    doc.add_vertical_space(4.0);
    doc.write_centered(&format!("End of {}", REPORT_TITLE), TextStyle::Heading)?;
    doc.write_centered(
        &format!("SAR Case Reference Number: {}", subject.sar_case_reference),
        TextStyle::Body,
    )
}

fn write_identity(doc: &mut RenderedDocument, subject: &SubjectDetails) -> Result<()> {
    doc.write_line(&format!("Name: {}", subject.name))?;
    if let Some(id) = &subject.nomis_id {
        doc.write_line(&format!("NOMIS ID: {}", id))?;
    }
    if let Some(id) = &subject.ndelius_id {
        doc.write_line(&format!("nDelius ID: {}", id))?;
    }
    doc.write_line(&format!(
        "SAR Case Reference Number: {}",
        subject.sar_case_reference
    ))
}

fn display_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
