//! Word-processor attachments, converted to PDF by an external service.

use super::RenderContext;
use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};
use crate::model::AttachmentInfo;
use crate::pdf::{embed_pdf, RenderedDocument};

pub(super) fn render_word(
    ctx: &RenderContext<'_>,
    target: &mut RenderedDocument,
    info: &AttachmentInfo,
    bytes: &[u8],
) -> Result<()> {
    let converter = ctx
        .converter
        .ok_or_else(|| Error::Conversion("no document converter configured".into()))?;

    let pdf = converter.convert(bytes, &info.filename)?;
    if !is_pdf_bytes(&pdf) {
        return Err(Error::Conversion(format!(
            "converter returned {} bytes that are not a PDF",
            pdf.len()
        )));
    }

    log::debug!("Converted {} to {} PDF bytes", info.filename, pdf.len());
    embed_pdf(&pdf, target, ctx.page_size)?;
    Ok(())
}
