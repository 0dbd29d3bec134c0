//! Reads the system clipboard into paste items.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use petsight_core::ClipboardItem;
use pipeline_logging::{pipeline_debug, pipeline_warn};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
    #[error("clipboard image has inconsistent size {width}x{height}")]
    BadImage { width: usize, height: usize },
    #[error("cannot encode clipboard image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Snapshot of the clipboard as a list of typed items, text first.
pub(crate) fn read_clipboard() -> Result<Vec<ClipboardItem>, ClipboardError> {
    let mut clipboard = arboard::Clipboard::new()?;
    let mut items = Vec::new();

    match clipboard.get_text() {
        Ok(text) => items.push(ClipboardItem::new("text/plain", text.into_bytes())),
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(err) => pipeline_warn!("Failed to read clipboard text: {}", err),
    }

    match clipboard.get_image() {
        Ok(image) => {
            let png = encode_rgba_as_png(image.width, image.height, image.bytes.into_owned())?;
            items.push(ClipboardItem::new("image/png", png));
        }
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(err) => pipeline_warn!("Failed to read clipboard image: {}", err),
    }

    pipeline_debug!("clipboard holds {} item(s)", items.len());
    Ok(items)
}

/// arboard hands out raw RGBA; the pipeline wants an encoded file.
fn encode_rgba_as_png(
    width: usize,
    height: usize,
    rgba: Vec<u8>,
) -> Result<Vec<u8>, ClipboardError> {
    let bad_image = || ClipboardError::BadImage { width, height };
    let w = u32::try_from(width).map_err(|_| bad_image())?;
    let h = u32::try_from(height).map_err(|_| bad_image())?;
    let buffer = RgbaImage::from_raw(w, h, rgba).ok_or_else(bad_image)?;

    let mut out = Cursor::new(Vec::new());
    buffer.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
