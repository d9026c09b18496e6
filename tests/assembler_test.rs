//! Integration tests for report assembly.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{make_pdf, make_png, page_texts, TrackedReader};
use sarpdf::error::Result;
use sarpdf::{
    Attachment, AttachmentInfo, ContentNode, Error, NormalizedNode, ReportAssembler,
    ReportOptions, ReportRequest, ServiceSection, ServiceTemplate, SubjectDetails, WordConverter,
};
use serde_json::json;

const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn assembler() -> ReportAssembler {
    ReportAssembler::new().with_options(ReportOptions::default().with_compression(false))
}

fn subject() -> SubjectDetails {
    SubjectDetails::new("Joe Bloggs", "SAR-1234")
        .with_nomis_id("A1234BC")
        .with_ndelius_id("X123456")
}

fn attachment(number: u32, filename: &str, content_type: &str, bytes: Vec<u8>) -> Attachment {
    Attachment::from_bytes(
        AttachmentInfo::new(number, filename, format!("File {}", number), content_type),
        bytes,
    )
}

/// Converter returning a fixed PDF and counting its calls.
struct FixedConverter {
    pdf: Vec<u8>,
    calls: AtomicUsize,
}

impl WordConverter for FixedConverter {
    fn convert(&self, _bytes: &[u8], _filename: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pdf.clone())
    }
}

struct UpperTemplate;

impl ServiceTemplate for UpperTemplate {
    fn service_name(&self) -> &str {
        "prison-api"
    }

    fn render(&self, content: &NormalizedNode) -> Result<String> {
        match content.get("Offender no") {
            Some(NormalizedNode::Scalar(number)) => Ok(format!("PRISONER {}", number)),
            _ => Err(Error::Render("no offender number".into())),
        }
    }
}

struct FailingTemplate;

impl ServiceTemplate for FailingTemplate {
    fn service_name(&self) -> &str {
        "broken-service"
    }

    fn render(&self, _content: &NormalizedNode) -> Result<String> {
        Err(Error::Render("missing field".into()))
    }
}

#[test]
fn test_total_pages_scenario() {
    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("prison-api", "Prison records")
            .with_content(ContentNode::from(json!({"offenderNo": "A1234BC"})))
            .with_attachment(attachment(1, "photo.png", "image/png", make_png(400, 300))),
    );

    let report = assembler().assemble_with_summary(request).unwrap();
    assert_eq!(report.content_pages, 2);
    assert_eq!(report.contents_pages, 1);
    assert_eq!(report.total_pages, 5);
    assert_eq!(report.page_count(), 6);

    let texts = page_texts(&report.bytes);
    assert_eq!(texts.len(), 6);
    assert!(texts[1].iter().any(|t| t == "Total Pages: 5"));
}

#[test]
fn test_merge_order() {
    let request = ReportRequest::new(subject())
        .with_section(
            ServiceSection::new("prison-api", "Prison records")
                .with_content(ContentNode::from(json!({"offenderNo": "A1234BC"}))),
        )
        .with_section(ServiceSection::new("probation-api", "Probation records"));

    let report = assembler().assemble_with_summary(request).unwrap();
    let texts = page_texts(&report.bytes);
    assert_eq!(texts.len(), 6);

    // external cover: no page count, no internal marking
    assert_eq!(texts[0][0], "Subject Access Request Report");
    assert!(texts[0].contains(&"Name: Joe Bloggs".to_string()));
    assert!(texts[0].contains(&"NOMIS ID: A1234BC".to_string()));
    assert!(!texts[0].iter().any(|t| t.starts_with("Total Pages")));
    assert!(!texts[0].iter().any(|t| t == "INTERNAL ONLY"));

    // internal cover
    assert_eq!(texts[1][0], "INTERNAL ONLY");
    assert!(texts[1].contains(&"Total Pages: 5".to_string()));
    assert!(texts[1].contains(&"nDelius ID: X123456".to_string()));

    // contents: numbered from the internal cover
    assert_eq!(texts[2][0], "Contents");
    assert_eq!(
        texts[2][2..],
        ["Prison records", "3", "Probation records", "4"]
    );

    // content pages
    assert_eq!(texts[3], vec!["Prison records", "Offender no: A1234BC"]);
    assert_eq!(texts[4], vec!["Probation records", "No data held"]);

    // rear page
    assert_eq!(texts[5][0], "End of Subject Access Request Report");
    assert_eq!(texts[5][1], "SAR Case Reference Number: SAR-1234");
}

#[test]
fn test_attachments_follow_their_section() {
    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("documents-api", "Documents")
            .with_attachment(attachment(1, "scan.pdf", "application/pdf", make_pdf(3)))
            .with_attachment(attachment(2, "notes.csv", "text/csv", b"a,b".to_vec())),
    );

    let report = assembler().assemble_with_summary(request).unwrap();
    // section page, pdf heading page, 3 embedded pages, csv placeholder page
    assert_eq!(report.content_pages, 6);

    let texts = page_texts(&report.bytes);
    let body = &texts[3..];
    assert_eq!(body[0], vec!["Documents", "No data held"]);
    assert_eq!(
        body[1],
        vec![
            "Attachment 1: File 1 (scan.pdf)",
            "The following 3 pages are reproduced from this attachment."
        ]
    );
    assert!(body[2].is_empty() && body[3].is_empty() && body[4].is_empty());
    assert_eq!(body[5][0], "Attachment 2: File 2 (notes.csv)");
    assert_eq!(
        body[5][1],
        "This attachment cannot be shown in this report. Content type 'text/csv' is not supported."
    );
    assert_eq!(body[6][0], "End of Subject Access Request Report");
}

#[test]
fn test_word_attachment_is_converted_once() {
    let converter = Arc::new(FixedConverter {
        pdf: make_pdf(2),
        calls: AtomicUsize::new(0),
    });
    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("documents-api", "Documents")
            .with_attachment(attachment(1, "letter.docx", DOCX, b"PK\x03\x04".to_vec())),
    );

    let report = assembler()
        .with_converter(converter.clone())
        .assemble_with_summary(request)
        .unwrap();

    assert_eq!(converter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.content_pages, 4);
}

#[test]
fn test_word_without_converter_fails_with_context() {
    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("documents-api", "Documents")
            .with_attachment(attachment(7, "letter.docx", DOCX, b"PK".to_vec())),
    );

    match assembler().assemble(request) {
        Err(Error::Attachment {
            service,
            number,
            filename,
            source,
        }) => {
            assert_eq!(service, "documents-api");
            assert_eq!(number, 7);
            assert_eq!(filename, "letter.docx");
            assert!(matches!(*source, Error::Conversion(_)));
        }
        other => panic!("expected attachment error, got {:?}", other),
    }
}

#[test]
fn test_corrupt_attachment_aborts_and_releases_streams() {
    let pending = TrackedReader::new(make_png(10, 10));
    let exhausted = pending.exhausted.clone();
    let dropped = pending.dropped.clone();

    let request = ReportRequest::new(subject())
        .with_section(
            ServiceSection::new("prison-api", "Prison records")
                .with_attachment(attachment(1, "broken.pdf", "application/pdf", b"%PDF-1.4 garbage".to_vec())),
        )
        .with_section(ServiceSection::new("later-api", "Later").with_attachment(Attachment::new(
            AttachmentInfo::new(1, "photo.png", "Photo", "image/png"),
            pending,
        )));

    let err = assembler().assemble(request).unwrap_err();
    match &err {
        Error::Attachment {
            service,
            number,
            filename,
            ..
        } => {
            assert_eq!(service, "prison-api");
            assert_eq!(*number, 1);
            assert_eq!(filename, "broken.pdf");
        }
        other => panic!("expected attachment error, got {:?}", other),
    }
    assert!(err.to_string().contains("broken.pdf"));

    assert!(!exhausted.load(Ordering::SeqCst));
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_streams_are_read_to_the_end() {
    let reader = TrackedReader::new(make_png(10, 10));
    let exhausted = reader.exhausted.clone();
    let dropped = reader.dropped.clone();

    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("prison-api", "Prison records").with_attachment(Attachment::new(
            AttachmentInfo::new(1, "photo.png", "Photo", "image/png"),
            reader,
        )),
    );

    assembler().assemble(request).unwrap();
    assert!(exhausted.load(Ordering::SeqCst));
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_template_replaces_fallback() {
    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("Prison-API", "Prison records")
            .with_content(ContentNode::from(json!({"offenderNo": "A1234BC"}))),
    );

    let report = assembler()
        .with_template(Arc::new(UpperTemplate))
        .assemble_with_summary(request)
        .unwrap();
    let texts = page_texts(&report.bytes);
    assert_eq!(texts[3], vec!["Prison records", "PRISONER A1234BC"]);
}

#[test]
fn test_template_failure_names_service() {
    let request = ReportRequest::new(subject())
        .with_section(ServiceSection::new("broken-service", "Broken"));

    let err = assembler()
        .with_template(Arc::new(FailingTemplate))
        .assemble(request)
        .unwrap_err();
    assert!(matches!(&err, Error::Template { service, .. } if service == "broken-service"));
}

#[test]
fn test_long_contents_spill_onto_more_pages() {
    let mut request = ReportRequest::new(subject());
    for i in 0..80 {
        request = request.with_section(ServiceSection::new(format!("svc-{}", i), format!("Service {}", i)));
    }

    let report = assembler().assemble_with_summary(request).unwrap();
    assert_eq!(report.content_pages, 80);
    assert!(report.contents_pages >= 2);
    assert_eq!(report.total_pages, 80 + 1 + report.contents_pages + 1);

    let texts = page_texts(&report.bytes);
    assert_eq!(texts.len(), report.page_count());
    let internal_cover = &texts[1];
    assert!(internal_cover.contains(&format!("Total Pages: {}", report.total_pages)));

    // the first section starts right after the contents
    let first_body = 1 + report.contents_pages + 1;
    assert_eq!(texts[2][2..4], ["Service 0".to_string(), first_body.to_string()]);
    assert_eq!(texts[first_body][0], "Service 0");
}

#[test]
fn test_batch_keeps_request_order() {
    let good = |reference: &str, sections: usize| {
        let mut request = ReportRequest::new(SubjectDetails::new("Joe", reference));
        for i in 0..sections {
            request = request.with_section(ServiceSection::new(format!("s{}", i), format!("S{}", i)));
        }
        request
    };
    let bad = ReportRequest::new(SubjectDetails::new("Joe", "SAR-BAD")).with_section(
        ServiceSection::new("s", "S")
            .with_attachment(attachment(1, "x.png", "image/png", b"not an image".to_vec())),
    );

    let results = assembler().assemble_batch(vec![good("SAR-A", 1), bad, good("SAR-C", 3)]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().content_pages, 1);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().content_pages, 3);
}

#[test]
fn test_compressed_output_loads() {
    let request = ReportRequest::new(subject())
        .with_section(ServiceSection::new("prison-api", "Prison records"));
    let bytes = sarpdf::assemble_report(request, &ReportOptions::default()).unwrap();

    assert!(sarpdf::is_pdf_bytes(&bytes));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 5);
}

#[test]
fn test_report_written_to_disk_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");

    let request = ReportRequest::new(subject()).with_section(
        ServiceSection::new("documents-api", "Documents")
            .with_attachment(attachment(1, "scan.pdf", "application/pdf", make_pdf(2))),
    );
    let report = ReportAssembler::new().assemble_with_summary(request).unwrap();
    std::fs::write(&path, &report.bytes).unwrap();

    let doc = lopdf::Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), report.page_count());
}
