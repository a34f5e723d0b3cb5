// Uploaded pictures: square crop, circular mask, inline PNG.

use std::fmt::Display;
use std::io::Cursor;

use base64::{engine::general_purpose, Engine};
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};

use crate::board::*;

/// An image embedded in the data file, without any external reference.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InlineImage {
    pub mime: &'static str,
    /// Base64 of the encoded image.
    pub payload: String,
}

impl Display for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

/// Crops the image to a square anchored at the top-left corner, with the
/// side of the shorter dimension, and keeps only the inscribed circle.
///
/// Pixels whose center lies inside the circle become fully opaque, the
/// others fully transparent. For a side of 4 or more, the corners are always
/// transparent.
pub fn circle_crop(img: &RgbaImage) -> RgbaImage {
    let side = img.width().min(img.height());
    let mut out = imageops::crop_imm(img, 0, 0, side, side).to_image();
    let r = side as f64 / 2.0;
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - r;
        let dy = y as f64 + 0.5 - r;
        px[3] = if dx * dx + dy * dy <= r * r { 255 } else { 0 };
    }
    out
}

/// Decodes an uploaded picture and turns it into an inline circular PNG.
pub fn normalize(bytes: &[u8]) -> BoardResult<InlineImage> {
    let decoded = image::load_from_memory(bytes).context(ImageDecodeSnafu {})?;
    debug!(
        "normalize: decoded {}x{} image",
        decoded.width(),
        decoded.height()
    );
    let masked = circle_crop(&decoded.to_rgba8());

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(masked)
        .write_to(&mut buf, ImageFormat::Png)
        .context(ImageEncodeSnafu {})?;
    Ok(InlineImage {
        mime: "image/png",
        payload: general_purpose::STANDARD.encode(buf.into_inner()),
    })
}
