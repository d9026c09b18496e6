//! Integration tests for embedding external PDF pages.

mod common;

use lopdf::content::Content;
use lopdf::{Document, Object};
use sarpdf::{embed_pdf, Dimensions, RenderedDocument, ReportOptions, Transform};

fn options() -> ReportOptions {
    ReportOptions::default().with_compression(false)
}

/// A target with an attachment heading already on its open page.
fn target() -> RenderedDocument {
    let mut doc = RenderedDocument::new(&options());
    doc.write_heading("Attachment 1: Scan (scan.pdf)").unwrap();
    doc
}

/// Text shown inside the form XObjects drawn on each page.
fn form_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let Ok(resources) = page.get(b"Resources").and_then(Object::as_dict) else {
                return Vec::new();
            };
            let Ok(xobjects) = resources.get(b"XObject").and_then(Object::as_dict) else {
                return Vec::new();
            };

            let mut texts = Vec::new();
            for (_, value) in xobjects.iter() {
                let stream = doc
                    .get_object(value.as_reference().unwrap())
                    .and_then(Object::as_stream)
                    .unwrap();
                let bytes = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                for op in Content::decode(&bytes).unwrap().operations {
                    if op.operator == "Tj" {
                        if let Some(Object::String(s, _)) = op.operands.first() {
                            texts.push(String::from_utf8_lossy(s).into_owned());
                        }
                    }
                }
            }
            texts
        })
        .collect()
}

#[test]
fn test_page_count_is_conserved() {
    for n in [0usize, 1, 5, 50] {
        let mut doc = target();
        let appended = embed_pdf(&common::make_pdf(n), &mut doc, Dimensions::a4()).unwrap();

        assert_eq!(appended as usize, n);
        assert_eq!(doc.page_count(), 1 + n, "embedding {} pages", n);
    }
}

#[test]
fn test_describe_line_precedes_pages() {
    let cases = [
        (0, "This attachment contains no pages."),
        (1, "The following page is reproduced from this attachment."),
        (5, "The following 5 pages are reproduced from this attachment."),
    ];
    for (n, expected) in cases {
        let mut doc = target();
        embed_pdf(&common::make_pdf(n), &mut doc, Dimensions::a4()).unwrap();
        let texts = doc.page_texts().unwrap();
        assert_eq!(texts[0], vec!["Attachment 1: Scan (scan.pdf)", expected]);
    }
}

#[test]
fn test_source_content_is_preserved_in_order() {
    let mut doc = target();
    embed_pdf(&common::make_pdf(5), &mut doc, Dimensions::a4()).unwrap();
    let bytes = doc.into_bytes().unwrap();

    let forms = form_texts(&bytes);
    assert_eq!(forms.len(), 6);
    assert!(forms[0].is_empty());
    for (i, texts) in forms.iter().skip(1).enumerate() {
        assert_eq!(texts, &vec![format!("Source page {}", i + 1)]);
    }
}

#[test]
fn test_pages_are_scaled_to_fit_and_centred() {
    let sizes = [(612.0, 792.0), (1190.0, 842.0), (200.0, 300.0)];
    let mut doc = target();
    embed_pdf(&common::make_pdf_with_sizes(&sizes), &mut doc, Dimensions::a4()).unwrap();
    let bytes = doc.into_bytes().unwrap();
    let matrices = common::page_matrices(&bytes);

    for (i, &(w, h)) in sizes.iter().enumerate() {
        let expected = Transform::fit_centered(Dimensions::new(w, h), Dimensions::a4()).matrix();
        let actual = matrices[i + 1][0];
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 0.01, "page {}: {:?} vs {:?}", i, actual, expected);
        }

        // uniform scale, no rotation or skew
        assert!((actual[0] - actual[3]).abs() < 0.001);
        assert_eq!(actual[1], 0.0);
        assert_eq!(actual[2], 0.0);

        let drawn = Dimensions::new(w * actual[0], h * actual[3]);
        assert!(drawn.width <= Dimensions::a4().width + 0.01);
        assert!(drawn.height <= Dimensions::a4().height + 0.01);
    }
}

#[test]
fn test_offset_media_box_is_embedded() {
    let mut doc = target();
    let pdf = common::make_pdf_with_boxes(&[[100.0, 200.0, 712.0, 992.0]]);
    embed_pdf(&pdf, &mut doc, Dimensions::a4()).unwrap();
    let bytes = doc.into_bytes().unwrap();

    let saved = Document::load_mem(&bytes).unwrap();
    let pages = saved.get_pages();
    let page = saved.get_dictionary(pages[&2]).unwrap();
    let xobjects = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|r| r.get(b"XObject"))
        .and_then(Object::as_dict)
        .unwrap();
    let (_, form_ref) = xobjects.iter().next().unwrap();
    let form = saved
        .get_object(form_ref.as_reference().unwrap())
        .and_then(Object::as_stream)
        .unwrap();

    let matrix = form.dict.get(b"Matrix").and_then(Object::as_array).unwrap();
    let translate: Vec<f32> = matrix[4..]
        .iter()
        .map(|v| match v {
            Object::Real(r) => *r,
            Object::Integer(i) => *i as f32,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(translate, vec![-100.0, -200.0]);

    // same size as Letter, so placed like a Letter page
    let expected = Transform::fit_centered(Dimensions::letter(), Dimensions::a4()).matrix();
    let actual = common::page_matrices(&bytes)[1][0];
    assert!((actual[4] - expected[4]).abs() < 0.01);
    assert!((actual[5] - expected[5]).abs() < 0.01);
}

#[test]
fn test_non_pdf_is_rejected_without_pages() {
    let mut doc = target();
    assert!(embed_pdf(b"GIF89a", &mut doc, Dimensions::a4()).is_err());
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_shared_resources_are_copied_once() {
    let mut doc = target();
    embed_pdf(&common::make_pdf(50), &mut doc, Dimensions::a4()).unwrap();
    let saved = Document::load_mem(&doc.into_bytes().unwrap()).unwrap();

    // the report's own fonts carry an Encoding; the source font does not
    let source_fonts = saved
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| {
            dict.get(b"Type").and_then(Object::as_name).ok() == Some(b"Font".as_slice())
                && dict.get(b"BaseFont").and_then(Object::as_name).ok()
                    == Some(b"Helvetica".as_slice())
                && dict.get(b"Encoding").is_err()
        })
        .count();
    assert_eq!(source_fonts, 1);

    // every form points at the same resource dictionary
    let pages = saved.get_pages();
    let mut resource_refs = std::collections::HashSet::new();
    for &page_id in pages.values().skip(1) {
        let xobjects = saved
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Resources"))
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"XObject"))
            .and_then(Object::as_dict)
            .unwrap();
        for (_, form_ref) in xobjects.iter() {
            let form = saved
                .get_object(form_ref.as_reference().unwrap())
                .and_then(Object::as_stream)
                .unwrap();
            resource_refs.insert(form.dict.get(b"Resources").and_then(Object::as_reference).unwrap());
        }
    }
    assert_eq!(resource_refs.len(), 1);
}

#[test]
fn test_describe_line_opens_a_page_on_a_fresh_target() {
    // without a heading, the describe line needs a page of its own
    for n in [0usize, 1, 5] {
        let mut doc = RenderedDocument::new(&options());
        let appended = embed_pdf(&common::make_pdf(n), &mut doc, Dimensions::a4()).unwrap();
        assert_eq!(appended as usize, n);
        assert_eq!(doc.page_count(), 1 + n);
        assert_eq!(doc.page_texts().unwrap()[0].len(), 1);
    }
}
