//! The page accumulator used by every rendering stage.

use super::copy::ObjectCopier;
use crate::error::Result;
use crate::geometry::Dimensions;
use crate::render::text::{chars_per_line, encode_win_ansi, estimate_width, wrap_text};
use crate::render::ReportOptions;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Minimum width of the right-hand column of [`RenderedDocument::write_row`].
pub const RIGHT_COLUMN_MIN_CHARS: usize = 6;

/// Text styles available to writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Regular body text
    Body,
    /// Bold section heading
    Heading,
    /// Large bold title
    Title,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    page: Dimensions,
    margin: f32,
    font_size: f32,
    heading_font_size: f32,
    title_font_size: f32,
    line_spacing: f32,
    compress: bool,
}

impl Layout {
    fn font(&self, style: TextStyle) -> (&'static str, f32) {
        match style {
            TextStyle::Body => (REGULAR_FONT, self.font_size),
            TextStyle::Heading => (BOLD_FONT, self.heading_font_size),
            TextStyle::Title => (BOLD_FONT, self.title_font_size),
        }
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.line_spacing
    }

    fn top(&self) -> f32 {
        self.page.height - self.margin
    }

    fn text_width(&self) -> f32 {
        self.page.width - 2.0 * self.margin
    }
}

impl From<&ReportOptions> for Layout {
    fn from(options: &ReportOptions) -> Self {
        Self {
            page: options.page_dimensions(),
            margin: options.margin,
            font_size: options.font_size,
            heading_font_size: options.heading_font_size,
            title_font_size: options.title_font_size,
            line_spacing: options.line_spacing,
            compress: options.compress,
        }
    }
}

/// The page currently being written.
struct PageBuilder {
    operations: Vec<Operation>,
    xobjects: Dictionary,
    cursor_y: f32,
}

impl PageBuilder {
    fn new(top: f32) -> Self {
        Self {
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            cursor_y: top,
        }
    }

    fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A PDF under construction.
///
/// Pages are appended in strict order. Text writers flow onto a new page
/// when the current one is full; [`page_count`](Self::page_count) is
/// accurate at any point, counting the open page.
pub struct RenderedDocument {
    doc: Document,
    pages_id: ObjectId,
    regular_font: ObjectId,
    bold_font: ObjectId,
    page_ids: Vec<ObjectId>,
    current: Option<PageBuilder>,
    layout: Layout,
    xobject_count: usize,
}

impl RenderedDocument {
    /// Create an empty document laid out with `options`.
    pub fn new(options: &ReportOptions) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let regular_font = doc.add_object(standard_font("Helvetica"));
        let bold_font = doc.add_object(standard_font("Helvetica-Bold"));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self {
            doc,
            pages_id,
            regular_font,
            bold_font,
            page_ids: Vec::new(),
            current: None,
            layout: Layout::from(options),
            xobject_count: 0,
        }
    }

    /// Size of every page this document appends.
    pub fn page_size(&self) -> Dimensions {
        self.layout.page
    }

    /// Number of pages, including the page being written.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.current.is_some())
    }

    /// Zero-based index of the page that text is currently written to.
    pub fn current_page_index(&self) -> usize {
        self.page_ids.len()
    }

    /// Finish the current page and open a blank one.
    ///
    /// Does nothing if the current page has nothing on it yet.
    pub fn start_new_page(&mut self) -> Result<()> {
        if matches!(&self.current, Some(page) if page.is_empty()) {
            return Ok(());
        }
        self.flush_page()?;
        self.current = Some(PageBuilder::new(self.layout.top()));
        Ok(())
    }

    /// Write body text, wrapping and breaking pages as needed.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_styled(text, TextStyle::Body)
    }

    pub fn write_heading(&mut self, text: &str) -> Result<()> {
        self.write_styled(text, TextStyle::Heading)
    }

    pub fn write_title(&mut self, text: &str) -> Result<()> {
        self.write_styled(text, TextStyle::Title)
    }

    /// Write a multi-line block, one body line per `\n`-separated line.
    pub fn write_block(&mut self, block: &str) -> Result<()> {
        for line in block.split('\n') {
            self.write_line(line)?;
        }
        Ok(())
    }

    pub fn write_styled(&mut self, text: &str, style: TextStyle) -> Result<()> {
        let (_, size) = self.layout.font(style);
        let max_chars = chars_per_line(self.layout.text_width(), size);
        for line in wrap_text(text, max_chars) {
            let x = self.layout.margin;
            self.place_text(&line, style, x)?;
        }
        Ok(())
    }

    /// Write text centred between the page edges.
    pub fn write_centered(&mut self, text: &str, style: TextStyle) -> Result<()> {
        let (_, size) = self.layout.font(style);
        let max_chars = chars_per_line(self.layout.text_width(), size);
        for line in wrap_text(text, max_chars) {
            let width = estimate_width(&line, size);
            let x = ((self.layout.page.width - width) / 2.0).max(self.layout.margin);
            self.place_text(&line, style, x)?;
        }
        Ok(())
    }

    /// Write `left` at the margin and `right` flush against the right
    /// margin on the same line.
    ///
    /// The right column is at least [`RIGHT_COLUMN_MIN_CHARS`] wide, so
    /// rows whose right text fits in it wrap identically whatever it says.
    pub fn write_row(&mut self, left: &str, right: &str, style: TextStyle) -> Result<()> {
        let (font, size) = self.layout.font(style);
        let right_width = estimate_width(right, size);
        let reserved = right_width.max(estimate_width("0", size) * RIGHT_COLUMN_MIN_CHARS as f32);
        let gap = size * 2.0;
        let left_width = (self.layout.text_width() - reserved - gap).max(size);
        let lines = wrap_text(left, chars_per_line(left_width, size));

        for (i, line) in lines.iter().enumerate() {
            let y = self.place_text(line, style, self.layout.margin)?;
            if i == 0 && !right.is_empty() {
                let x = self.layout.page.width - self.layout.margin - right_width;
                self.page_mut()
                    .operations
                    .extend(text_operations(font, size, x, y, right));
            }
        }
        Ok(())
    }

    /// Leave `lines` empty body lines, opening a page if none is open.
    pub fn add_vertical_space(&mut self, lines: f32) {
        let step = self.layout.line_height(self.layout.font_size) * lines;
        let margin = self.layout.margin;
        let page = self.page_mut();
        page.cursor_y = (page.cursor_y - step).max(margin);
    }

    /// Add an XObject (image or form) to the document without drawing it.
    pub fn add_xobject(&mut self, stream: Stream) -> ObjectId {
        self.doc.add_object(stream)
    }

    /// Draw an XObject on the current page with the `cm` matrix `matrix`.
    ///
    /// Text written afterwards continues below `bottom`.
    pub fn draw_xobject(&mut self, id: ObjectId, matrix: [f32; 6], bottom: f32) -> Result<()> {
        let name = self.next_xobject_name();
        let gap = self.layout.line_height(self.layout.font_size);
        let page = self.page_mut();
        page.xobjects.set(name.clone(), id);
        page.operations.extend(xobject_operations(&name, matrix));
        page.cursor_y = page.cursor_y.min(bottom - gap);
        Ok(())
    }

    /// Append a page holding only the XObject `id`, drawn with `matrix`.
    ///
    /// The page is finished immediately; later text starts on a new page.
    pub fn append_xobject_page(&mut self, id: ObjectId, matrix: [f32; 6]) -> Result<()> {
        self.flush_page()?;
        let name = self.next_xobject_name();
        let mut page = PageBuilder::new(self.layout.top());
        page.xobjects.set(name.clone(), id);
        page.operations.extend(xobject_operations(&name, matrix));
        self.current = Some(page);
        self.flush_page()
    }

    /// Copy all pages of `other` into this document before page `index`.
    ///
    /// Pages are copied object by object, not re-rendered. An index past
    /// the end appends. Returns the number of pages inserted.
    pub fn merge(&mut self, mut other: RenderedDocument, index: usize) -> Result<usize> {
        self.flush_page()?;
        other.flush_page()?;

        let copied = {
            let mut copier = ObjectCopier::new(&other.doc, &mut self.doc);
            other
                .page_ids
                .iter()
                .map(|&id| copier.copy_reference(id))
                .collect::<Result<Vec<_>>>()?
        };

        for id in &copied {
            if let Some(Object::Dictionary(page)) = self.doc.objects.get_mut(id) {
                page.set("Parent", self.pages_id);
            }
        }

        let index = index.min(self.page_ids.len());
        self.page_ids.splice(index..index, copied.iter().copied());
        Ok(copied.len())
    }

    /// Mutable access to the underlying document, for copying objects in.
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Finish the document and return the lopdf model.
    pub fn into_document(mut self) -> Result<Document> {
        self.flush_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => self.page_ids.len() as i64,
                "Kids" => kids,
            }),
        );

        if self.layout.compress {
            self.doc.compress();
        }
        Ok(self.doc)
    }

    /// Finish the document and serialize it.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.into_document()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Text lines drawn on each page, in order. Intended for previews and
    /// inspection; the open page is included.
    pub fn page_texts(&self) -> Result<Vec<Vec<String>>> {
        let mut pages = Vec::with_capacity(self.page_count());
        for &id in &self.page_ids {
            let content = self.doc.get_page_content(id)?;
            pages.push(collect_text(&Content::decode(&content)?.operations));
        }
        if let Some(page) = &self.current {
            pages.push(collect_text(&page.operations));
        }
        Ok(pages)
    }

    fn page_mut(&mut self) -> &mut PageBuilder {
        let top = self.layout.top();
        self.current.get_or_insert_with(|| PageBuilder::new(top))
    }

    fn next_xobject_name(&mut self) -> String {
        self.xobject_count += 1;
        format!("X{}", self.xobject_count)
    }

    /// Place one already-wrapped line, returning its baseline.
    fn place_text(&mut self, line: &str, style: TextStyle, x: f32) -> Result<f32> {
        let (font, size) = self.layout.font(style);
        let height = self.layout.line_height(size);

        let needs_break = matches!(
            &self.current,
            Some(page) if !page.is_empty() && page.cursor_y - height < self.layout.margin
        );
        if needs_break {
            self.flush_page()?;
        }

        let page = self.page_mut();
        let baseline = page.cursor_y - size;
        page.cursor_y -= height;
        page.operations
            .extend(text_operations(font, size, x, baseline, line));
        Ok(baseline)
    }

    /// Close the open page, if any, and append it to the page list.
    fn flush_page(&mut self) -> Result<()> {
        let Some(page) = self.current.take() else {
            return Ok(());
        };

        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut resources = dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => self.regular_font,
                BOLD_FONT => self.bold_font,
            },
        };
        if !page.xobjects.is_empty() {
            resources.set("XObject", page.xobjects);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(self.layout.page.width),
                Object::Real(self.layout.page.height),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }
}

impl std::fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("pages", &self.page_count())
            .field("page_size", &self.layout.page)
            .finish()
    }
}

fn standard_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_operations(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn xobject_operations(name: &str, matrix: [f32; 6]) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("cm", matrix.iter().map(|&v| v.into()).collect()),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn collect_text(operations: &[Operation]) -> Vec<String> {
    operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
            _ => None,
        })
        .collect()
}
