//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A PDF with one page per MediaBox in `boxes`, each showing "Source page N".
pub fn make_pdf_with_boxes(boxes: &[[f32; 4]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for (i, media_box) in boxes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 72.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Source page {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>(),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF with one zero-origin page per `(width, height)`.
pub fn make_pdf_with_sizes(sizes: &[(f32, f32)]) -> Vec<u8> {
    let boxes: Vec<[f32; 4]> = sizes.iter().map(|&(w, h)| [0.0, 0.0, w, h]).collect();
    make_pdf_with_boxes(&boxes)
}

/// A PDF of `pages` US Letter pages.
pub fn make_pdf(pages: usize) -> Vec<u8> {
    make_pdf_with_sizes(&vec![(612.0, 792.0); pages])
}

/// A solid-colour PNG.
pub fn make_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// A fully transparent white PNG.
pub fn make_transparent_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 0]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Text shown on each page of a saved PDF, as one string per `Tj`.
pub fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(bytes.iter().map(|&b| b as char).collect())
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// The `cm` matrices drawn on each page of a saved PDF.
pub fn page_matrices(pdf: &[u8]) -> Vec<Vec<[f32; 6]>> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "cm")
                .map(|op| {
                    let mut m = [0.0; 6];
                    for (slot, operand) in m.iter_mut().zip(&op.operands) {
                        *slot = match operand {
                            Object::Integer(i) => *i as f32,
                            Object::Real(r) => *r,
                            other => panic!("unexpected cm operand {:?}", other),
                        };
                    }
                    m
                })
                .collect()
        })
        .collect()
}

/// A byte stream that records whether it was read to the end and dropped.
pub struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    pub exhausted: Arc<AtomicBool>,
    pub dropped: Arc<AtomicBool>,
}

impl TrackedReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(bytes),
            exhausted: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            self.exhausted.store(true, Ordering::SeqCst);
        }
        Ok(n)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}
