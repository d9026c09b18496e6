//! Raster image attachments.

use super::RenderContext;
use crate::error::{Error, Result};
use crate::geometry::{apply_scale, center_position, scale_to_fit, Dimensions, Position};
use crate::pdf::RenderedDocument;
use ::image::DynamicImage;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Stream};
use std::io::Write;

/// Size and position of an image on a page.
///
/// The image is scaled to fit `proportion` of the page on both axes, then
/// centred on the whole page. Pixels are taken as points.
pub fn image_placement(natural: Dimensions, page: Dimensions, proportion: f32) -> (Dimensions, Position) {
    let bound = page.scaled_by(proportion);
    let scaled = apply_scale(natural, scale_to_fit(natural, bound));
    (scaled, center_position(scaled, page))
}

pub(super) fn render_image(ctx: &RenderContext<'_>, target: &mut RenderedDocument, bytes: &[u8]) -> Result<()> {
    let decoded = ::image::load_from_memory(bytes)?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(Error::ImageDecode("image has no pixels".into()));
    }

    let (rgb, alpha) = split_alpha(&decoded);

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    if let Some(alpha) = alpha {
        let smask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        )
        .with_compression(false);
        dict.set("SMask", target.add_xobject(smask));
    }

    let stream = Stream::new(dict, deflate(&rgb)?).with_compression(false);
    let id = target.add_xobject(stream);

    let natural = Dimensions::new(width as f32, height as f32);
    let (size, position) = image_placement(natural, ctx.page_size, ctx.image_max_proportion);
    log::debug!(
        "Placing {}x{} image at {:.1}x{:.1}",
        width,
        height,
        size.width,
        size.height
    );

    // the image XObject is a unit square, so the matrix carries the size
    target.draw_xobject(
        id,
        [size.width, 0.0, 0.0, size.height, position.x, position.y],
        position.y,
    )
}

/// Colour samples as packed RGB, plus the alpha plane when the image has one.
fn split_alpha(decoded: &DynamicImage) -> (Vec<u8>, Option<Vec<u8>>) {
    if !decoded.color().has_alpha() {
        return (decoded.to_rgb8().into_raw(), None);
    }

    let rgba = decoded.to_rgba8();
    let pixels = rgba.as_raw();
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(pixels.len() / 4);
    for px in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }
    (rgb, Some(alpha))
}

fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
