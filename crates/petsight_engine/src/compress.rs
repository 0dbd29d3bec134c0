use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use pipeline_logging::{pipeline_debug, pipeline_warn};

use crate::CompressError;

/// Qualities tried, in order, before the image is shrunk further.
const QUALITY_LADDER: [u8; 6] = [92, 80, 70, 60, 50, 40];
/// Factor applied to both edges when no quality fits the size budget.
const SHRINK_FACTOR: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct CompressSettings {
    pub max_size_bytes: u64,
    pub max_width_or_height: u32,
    /// Run on tokio's blocking pool instead of the engine task.
    pub use_background_thread: bool,
    pub max_iterations: u32,
    pub resize_filter: FilterType,
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,
            max_width_or_height: 1920,
            use_background_thread: true,
            max_iterations: 10,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// Encoded output of a [`Compressor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

pub trait Compressor: Send + Sync {
    fn compress(&self, bytes: &[u8], settings: &CompressSettings)
        -> Result<EncodedImage, CompressError>;
}

/// Re-encodes any decodable image as JPEG within the size and dimension ceiling.
///
/// The ceiling is best effort: every shrink round gets the full quality
/// ladder, and after `max_iterations` shrinks the smallest encoding at the
/// final size is returned even if it is still over budget.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCompressor;

impl Compressor for JpegCompressor {
    fn compress(
        &self,
        bytes: &[u8],
        settings: &CompressSettings,
    ) -> Result<EncodedImage, CompressError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|err| CompressError::Decode(err.to_string()))?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(CompressError::EmptyImage);
        }

        let mut rgb = flatten_onto_white(decoded);
        let (target_w, target_h) = fit_within(width, height, settings.max_width_or_height);
        if (target_w, target_h) != (width, height) {
            rgb = image::imageops::resize(&rgb, target_w, target_h, settings.resize_filter);
        }
        pipeline_debug!(
            "compressing {}x{} -> {}x{} (budget {} bytes)",
            width,
            height,
            target_w,
            target_h,
            settings.max_size_bytes
        );

        let mut shrinks = 0;
        loop {
            let mut smallest: Option<Vec<u8>> = None;
            for quality in QUALITY_LADDER {
                let encoded = encode_jpeg(&rgb, quality)?;
                if encoded.len() as u64 <= settings.max_size_bytes {
                    pipeline_debug!(
                        "fits at quality {} after {} shrinks: {} bytes",
                        quality,
                        shrinks,
                        encoded.len()
                    );
                    return Ok(jpeg(encoded, &rgb));
                }
                if smallest.as_ref().map_or(true, |best| encoded.len() < best.len()) {
                    smallest = Some(encoded);
                }
            }

            let next_w = ((rgb.width() as f64) * SHRINK_FACTOR).floor() as u32;
            let next_h = ((rgb.height() as f64) * SHRINK_FACTOR).floor() as u32;
            if shrinks >= settings.max_iterations || next_w == 0 || next_h == 0 {
                let bytes = match smallest {
                    Some(bytes) => bytes,
                    None => encode_jpeg(&rgb, QUALITY_LADDER[QUALITY_LADDER.len() - 1])?,
                };
                pipeline_warn!(
                    "could not reach {} bytes, returning {} bytes at {}x{}",
                    settings.max_size_bytes,
                    bytes.len(),
                    rgb.width(),
                    rgb.height()
                );
                return Ok(jpeg(bytes, &rgb));
            }
            rgb = image::imageops::resize(&rgb, next_w, next_h, settings.resize_filter);
            shrinks += 1;
        }
    }
}

fn jpeg(bytes: Vec<u8>, image: &RgbImage) -> EncodedImage {
    EncodedImage {
        bytes,
        mime_type: "image/jpeg",
        width: image.width(),
        height: image.height(),
    }
}

/// Largest size with the same aspect ratio whose long edge is at most `max_edge`.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_edge || max_edge == 0 {
        return (width, height);
    }
    let scale = max_edge as f64 / long_edge as f64;
    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, max_edge);
    (scaled(width), scaled(height))
}

fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CompressError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(image)
        .map_err(|err| CompressError::Encode(err.to_string()))?;
    Ok(out)
}
