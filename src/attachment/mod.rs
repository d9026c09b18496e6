//! Attachment renderers.
//!
//! Each attachment is dispatched on its content type to one of a fixed
//! set of strategies:
//!
//! | Renderer           | Content types                          |
//! |--------------------|----------------------------------------|
//! | `Image`            | PNG, JPEG, GIF, BMP, TIFF              |
//! | `SinglePassPdf`    | `application/pdf`                      |
//! | `MultiPassWordDoc` | `.docx` and `.doc`                     |
//! | `Default`          | anything else (placeholder line)       |
//!
//! The [`RendererRegistry`] maps content types to renderers and is built
//! once per assembler.

mod image;
mod word;

pub use self::image::image_placement;

use crate::error::Result;
use crate::external::WordConverter;
use crate::geometry::Dimensions;
use crate::model::AttachmentInfo;
use crate::pdf::{embed_pdf, RenderedDocument};
use std::collections::HashMap;

const IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/bmp",
    "image/tiff",
];
const PDF_TYPES: &[&str] = &["application/pdf"];
const WORD_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// What a renderer needs besides the attachment itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub page_size: Dimensions,
    pub image_max_proportion: f32,
    pub converter: Option<&'a dyn WordConverter>,
}

/// Strategy for drawing one attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentRenderer {
    /// Decode a raster image and centre it on the current page
    Image,
    /// Embed every page of a PDF
    SinglePassPdf,
    /// Convert a word-processor document to PDF, then embed it
    MultiPassWordDoc,
    /// Write a placeholder line naming the unsupported type
    Default,
}

impl AttachmentRenderer {
    pub const ALL: [AttachmentRenderer; 4] = [
        AttachmentRenderer::Image,
        AttachmentRenderer::SinglePassPdf,
        AttachmentRenderer::MultiPassWordDoc,
        AttachmentRenderer::Default,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttachmentRenderer::Image => "image",
            AttachmentRenderer::SinglePassPdf => "pdf",
            AttachmentRenderer::MultiPassWordDoc => "word",
            AttachmentRenderer::Default => "default",
        }
    }

    /// Content types this renderer is registered for by default.
    pub fn supported_content_types(&self) -> &'static [&'static str] {
        match self {
            AttachmentRenderer::Image => IMAGE_TYPES,
            AttachmentRenderer::SinglePassPdf => PDF_TYPES,
            AttachmentRenderer::MultiPassWordDoc => WORD_TYPES,
            AttachmentRenderer::Default => &[],
        }
    }

    /// Draw an attachment's bytes into `target`.
    pub fn render(
        self,
        ctx: &RenderContext<'_>,
        target: &mut RenderedDocument,
        info: &AttachmentInfo,
        bytes: &[u8],
    ) -> Result<()> {
        match self {
            AttachmentRenderer::Image => self::image::render_image(ctx, target, bytes),
            AttachmentRenderer::SinglePassPdf => {
                embed_pdf(bytes, target, ctx.page_size)?;
                Ok(())
            }
            AttachmentRenderer::MultiPassWordDoc => word::render_word(ctx, target, info, bytes),
            AttachmentRenderer::Default => {
                log::warn!(
                    "No renderer for {} ({}), writing placeholder",
                    info.content_type,
                    info.filename
                );
                target.write_line(&format!(
                    "This attachment cannot be shown in this report. Content type '{}' is not supported.",
                    info.content_type
                ))
            }
        }
    }
}

/// Registry mapping content types to renderers.
///
/// Lookups ignore case and media-type parameters, so
/// `Image/PNG; charset=binary` resolves like `image/png`.
#[derive(Debug, Clone)]
pub struct RendererRegistry {
    by_content_type: HashMap<String, AttachmentRenderer>,
}

impl RendererRegistry {
    /// Create a new empty registry. Everything resolves to `Default`.
    pub fn new() -> Self {
        Self {
            by_content_type: HashMap::new(),
        }
    }

    /// Create a registry with every renderer's declared content types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for renderer in AttachmentRenderer::ALL {
            for content_type in renderer.supported_content_types() {
                registry.register(content_type, renderer);
            }
        }
        registry
    }

    /// Route a content type to a renderer.
    pub fn register(&mut self, content_type: &str, renderer: AttachmentRenderer) {
        self.by_content_type
            .insert(media_type(content_type), renderer);
    }

    /// Renderer for a content type, falling back to `Default`.
    pub fn resolve(&self, content_type: &str) -> AttachmentRenderer {
        self.by_content_type
            .get(&media_type(content_type))
            .copied()
            .unwrap_or(AttachmentRenderer::Default)
    }

    /// Check if a content type has a dedicated renderer.
    pub fn supports(&self, content_type: &str) -> bool {
        self.by_content_type.contains_key(&media_type(content_type))
    }

    /// Get all registered content types.
    pub fn supported_content_types(&self) -> Vec<&str> {
        self.by_content_type.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::render::ReportOptions;

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            page_size: Dimensions::a4(),
            image_max_proportion: 0.75,
            converter: None,
        }
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = RendererRegistry::with_defaults();
        assert_eq!(registry.resolve("image/png"), AttachmentRenderer::Image);
        assert_eq!(registry.resolve("application/pdf"), AttachmentRenderer::SinglePassPdf);
        assert_eq!(registry.resolve("application/msword"), AttachmentRenderer::MultiPassWordDoc);
        assert_eq!(registry.resolve("text/csv"), AttachmentRenderer::Default);
    }

    #[test]
    fn test_resolve_ignores_case_and_parameters() {
        let registry = RendererRegistry::with_defaults();
        assert_eq!(registry.resolve(" Image/JPEG; q=0.9"), AttachmentRenderer::Image);
        assert!(registry.supports("APPLICATION/PDF"));
        assert!(!registry.supports("text/plain"));
    }

    #[test]
    fn test_register_override() {
        let mut registry = RendererRegistry::new();
        assert_eq!(registry.resolve("image/png"), AttachmentRenderer::Default);
        registry.register("image/webp", AttachmentRenderer::Image);
        assert_eq!(registry.resolve("image/webp"), AttachmentRenderer::Image);
        assert_eq!(registry.supported_content_types(), vec!["image/webp"]);
    }

    #[test]
    fn test_every_declared_type_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for renderer in AttachmentRenderer::ALL {
            for content_type in renderer.supported_content_types() {
                assert!(seen.insert(*content_type), "duplicate {}", content_type);
            }
        }
    }

    #[test]
    fn test_default_writes_placeholder() {
        let mut target = RenderedDocument::new(&ReportOptions::default());
        let info = AttachmentInfo::new(1, "notes.csv", "Notes", "text/csv");
        AttachmentRenderer::Default
            .render(&ctx(), &mut target, &info, b"a,b")
            .unwrap();
        let texts = target.page_texts().unwrap();
        assert!(texts[0][0].contains("'text/csv' is not supported"));
    }

    #[test]
    fn test_word_without_converter_fails() {
        let mut target = RenderedDocument::new(&ReportOptions::default());
        let info = AttachmentInfo::new(1, "letter.docx", "Letter", WORD_TYPES[0]);
        let result = AttachmentRenderer::MultiPassWordDoc.render(&ctx(), &mut target, &info, b"PK");
        assert!(matches!(result, Err(Error::Conversion(_))));
    }

    #[test]
    fn test_corrupt_image_fails() {
        let mut target = RenderedDocument::new(&ReportOptions::default());
        let info = AttachmentInfo::new(1, "x.png", "X", "image/png");
        let result = AttachmentRenderer::Image.render(&ctx(), &mut target, &info, b"\x89PNG broken");
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }
}
