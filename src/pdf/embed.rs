//! Embedding of external PDF pages.
//!
//! Each source page becomes a Form XObject that is scaled to fit the
//! report page, centred, and drawn on a page of its own. Page content is
//! copied, not rasterized.

use super::copy::ObjectCopier;
use super::document::RenderedDocument;
use crate::detect::detect_format_from_bytes;
use crate::error::Result;
use crate::geometry::{Dimensions, Transform};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Depth limit when walking `Parent` links for inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// Embed every page of `pdf_bytes` into `target`, one page each.
///
/// A line describing how many pages follow is written to the current page
/// first, opening one if `target` has none. Callers that want exactly N new
/// pages write a heading before embedding. Returns the number of pages
/// appended after that line.
///
/// Objects shared between source pages, such as fonts and resource
/// dictionaries, are copied into `target` once.
pub fn embed_pdf(pdf_bytes: &[u8], target: &mut RenderedDocument, page_size: Dimensions) -> Result<u32> {
    let format = detect_format_from_bytes(pdf_bytes)?;
    let source = Document::load_mem(pdf_bytes)?;
    let pages = source.get_pages();
    log::debug!("Embedding {} pages from {}", pages.len(), format);

    target.write_line(&describe_following(pages.len()))?;

    let mut forms = Vec::with_capacity(pages.len());
    {
        let mut copier = ObjectCopier::new(&source, target.document_mut());
        for (&number, &page_id) in &pages {
            let media_box = PageBox::of_page(&source, page_id).unwrap_or_else(|| {
                log::warn!("Page {} has no usable MediaBox, assuming US Letter", number);
                PageBox::from_dimensions(Dimensions::letter())
            });
            if inherited(&source, page_id, b"Rotate")
                .and_then(|r| r.as_i64().ok())
                .is_some_and(|r| r % 360 != 0)
            {
                log::debug!("Page {} rotation ignored", number);
            }

            let resources = inherited(&source, page_id, b"Resources")
                .map(|r| copier.copy_object(r))
                .transpose()?;
            forms.push((media_box, form_xobject(&source, page_id, &media_box, resources)?));
        }
        log::debug!("Copied {} shared objects", copier.copied_count());
    }

    for (media_box, form) in forms {
        let form_id = target.add_xobject(form);
        let transform = Transform::fit_centered(media_box.dimensions(), page_size);
        target.append_xobject_page(form_id, transform.matrix())?;
    }

    Ok(pages.len() as u32)
}

fn describe_following(pages: usize) -> String {
    match pages {
        0 => "This attachment contains no pages.".to_string(),
        1 => "The following page is reproduced from this attachment.".to_string(),
        n => format!("The following {} pages are reproduced from this attachment.", n),
    }
}

/// A page rectangle, normalized so that `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    pub fn from_dimensions(d: Dimensions) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: d.width,
            y1: d.height,
        }
    }

    /// Read a page's MediaBox, following page tree inheritance.
    pub fn of_page(doc: &Document, page_id: ObjectId) -> Option<Self> {
        let array = resolve(doc, inherited(doc, page_id, b"MediaBox")?)
            .as_array()
            .ok()?;
        let values: Vec<f32> = array
            .iter()
            .filter_map(|v| number(resolve(doc, v)))
            .collect();
        let &[a, b, c, d] = values.as_slice() else {
            return None;
        };

        let page_box = Self {
            x0: a.min(c),
            y0: b.min(d),
            x1: a.max(c),
            y1: b.max(d),
        };
        page_box.dimensions().is_valid().then_some(page_box)
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.x1 - self.x0, self.y1 - self.y0)
    }
}

/// Wrap a source page as a Form XObject, with `resources` already copied
/// into the target document.
///
/// The form's matrix moves the MediaBox origin to `(0, 0)`, so drawing it
/// with a plain scale-and-translate places the page's lower-left corner
/// at the translation.
fn form_xobject(
    source: &Document,
    page_id: ObjectId,
    media_box: &PageBox,
    resources: Option<Object>,
) -> Result<Stream> {
    let content = source.get_page_content(page_id)?;

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1,
        "BBox" => vec![
            Object::Real(media_box.x0),
            Object::Real(media_box.y0),
            Object::Real(media_box.x1),
            Object::Real(media_box.y1),
        ],
        "Matrix" => vec![
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(1),
            Object::Real(-media_box.x0),
            Object::Real(-media_box.y0),
        ],
    };
    if let Some(resources) = resources {
        dict.set("Resources", resources);
    }

    Ok(Stream::new(dict, content))
}

/// Look up a page attribute, walking up the page tree when absent.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        id = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
